// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Low-level HDF5 access, kept behind a trait so the reader can be tested
//! without libhdf5.
use crate::error::Result;
#[cfg(test)]
use mockall::automock;
use std::path::Path;

#[cfg(feature = "hdf5")]
mod hdf5_files;

/// Value of a root-group attribute in a properties file
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// One row of `rf_data_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Global sample index at the start of a contiguous run
    pub global: u64,
    /// Row of `rf_data` where that run starts
    pub local: u64,
}

#[cfg_attr(test, automock)]
pub trait H5Access {
    /// All root-group attributes of a properties file
    fn read_attributes(&self, path: &Path) -> Result<Vec<(String, AttrValue)>>;
    /// Contents of the `rf_data_index` dataset of a data file
    fn read_index(&self, path: &Path) -> Result<Vec<IndexEntry>>;
    /// Number of rows in the `rf_data` dataset of a data file
    fn data_len(&self, path: &Path) -> Result<u64>;
}

/// `H5Access` on real files
#[derive(Debug, Default, Clone, Copy)]
pub struct Hdf5Files;

#[cfg(not(feature = "hdf5"))]
mod unsupported {
    use super::{AttrValue, H5Access, Hdf5Files, IndexEntry};
    use crate::error::DrfError::DrfErr;
    use crate::error::Result;
    use std::path::Path;

    fn no_backend(path: &Path) -> crate::error::DrfError {
        DrfErr(format!(
            "cannot open {}: built without the `hdf5` feature (rebuild with `--features hdf5`)",
            path.display()
        ))
    }

    impl H5Access for Hdf5Files {
        fn read_attributes(&self, path: &Path) -> Result<Vec<(String, AttrValue)>> {
            Err(no_backend(path))
        }
        fn read_index(&self, path: &Path) -> Result<Vec<IndexEntry>> {
            Err(no_backend(path))
        }
        fn data_len(&self, path: &Path) -> Result<u64> {
            Err(no_backend(path))
        }
    }
}

#[cfg(all(test, not(feature = "hdf5")))]
mod tests {
    use super::{H5Access, Hdf5Files};
    use std::path::Path;

    #[test]
    fn test_no_backend_names_the_feature() {
        let path = Path::new("ch0/drf_properties.h5");
        for err in [
            Hdf5Files.read_attributes(path).unwrap_err(),
            Hdf5Files.read_index(path).unwrap_err(),
            Hdf5Files.data_len(path).unwrap_err(),
        ] {
            let msg = err.to_string();
            assert!(msg.contains("ch0/drf_properties.h5"));
            assert!(msg.contains("--features hdf5"));
        }
    }
}
