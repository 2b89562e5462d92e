// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # drf-inspect
//! Reads the layout and sample index of Digital RF datasets and reports, per
//! dataset, the channels found, the bounds of the first channel and its
//! continuous blocks.
//!
//! HDF5 decoding needs the `hdf5` cargo feature (and libhdf5). Without it the
//! directory walk still works but every file access fails with an error.

mod blocks;
pub mod error;
pub mod h5;
pub mod listing;
pub mod properties;
mod reader;
pub mod runner;

#[cfg(test)]
use mockall::automock;

pub use blocks::{Bounds, ContinuousBlocks};
use error::Result;
pub use properties::ChannelProperties;
pub use reader::DigitalRfReader;

/// Queries a Digital RF reader answers
#[cfg_attr(test, automock)]
pub trait RfReader {
    /// Channel names, sorted
    fn get_channels(&self) -> Vec<String>;
    fn get_properties(&self, channel: &str) -> Result<ChannelProperties>;
    /// First and last recorded sample of `channel`
    fn get_bounds(&self, channel: &str) -> Result<Bounds>;
    /// Gap-free runs of `channel` between `start` and `end`, both inclusive
    fn get_continuous_blocks(&self, start: u64, end: u64, channel: &str) -> Result<ContinuousBlocks>;
}
