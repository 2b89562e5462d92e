// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{fmt, result};

/// A result of a function that may return a `DrfError`.
pub type Result<T> = result::Result<T, DrfError>;

// Macro to create an error enum with From converters for each input error class
macro_rules! define_errcodes {
    [ $typename:ident => $( $name:ident $(: $class:ty)? ),+ ] => {
        #[derive(Debug)]
        pub enum $typename {
            $(
                $name $( ($class) )?,
            )+
        }

        impl fmt::Display for $typename {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                match *self {
                    $(
                        $typename::$name(ref err) => fmt::Display::fmt(err, f),
                    )+
                }
            }
        }

        impl std::error::Error for $typename {}

        $( $(
            impl From<$class> for $typename {
                fn from(e: $class) -> Self {
                    $typename::$name(e)
                }
            } )?
        )+
    };
}

define_errcodes![
    DrfError =>
    Io: std::io::Error,
    Regex: regex::Error,
    DrfErr: String
];

#[cfg(feature = "hdf5")]
impl From<hdf5::Error> for DrfError {
    fn from(e: hdf5::Error) -> Self {
        DrfError::DrfErr(format!("hdf5: {}", e))
    }
}
