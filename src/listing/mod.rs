// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Filesystem layout of a Digital RF dataset
//!
//! ```text
//! <top level dir>/
//!     <channel>/
//!         drf_properties.h5
//!         2024-11-05T14-00-00/
//!             rf@1730815200.000.h5
//!             rf@1730815201.000.h5
//! ```
//! Channels may be nested below the top level directory; the channel name is
//! the relative path with `/` separators.
pub mod constants;
pub use constants::*;

use crate::error::DrfError::DrfErr;
use crate::error::Result;
use log::{debug, warn};
use regex::Regex;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};


/// A channel directory found under the top level directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDir {
    pub name: String,
    pub path: PathBuf,
    pub properties_file: PathBuf,
}

/// One `rf@<secs>.<ms>.h5` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    pub path: PathBuf,
    /// Start of the file's cadence window, in unix milliseconds
    pub start_ms: u64,
}

impl DataFile {
    /// Range of global sample indices this file may hold, given the sample
    /// rate `num / den` and the file cadence. A zero cadence means unknown and
    /// gives an unbounded window.
    pub fn sample_window(&self, num: u64, den: u64, cadence_ms: u64) -> Range<u64> {
        if cadence_ms == 0 || den == 0 {
            return 0..u64::MAX;
        }
        let first = ms_to_sample(self.start_ms, num, den);
        let last = ms_to_sample(self.start_ms.saturating_add(cadence_ms), num, den);
        first..last
    }
}

/// First sample at or after `ms`
fn ms_to_sample(ms: u64, num: u64, den: u64) -> u64 {
    let n = ms as u128 * num as u128;
    let d = den as u128 * 1000;
    let sample = (n + d - 1) / d;
    u64::try_from(sample).unwrap_or(u64::MAX)
}

/// Returns the properties file inside `dir`, if `dir` is a channel directory
pub fn properties_file(dir: &Path) -> Option<PathBuf> {
    PROPERTIES_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Compiled name patterns for walking a dataset
#[derive(Debug)]
pub struct Layout {
    subdir: Regex,
    rf_file: Regex,
}

impl Layout {
    pub fn new() -> Result<Layout> {
        Ok(Layout {
            subdir: Regex::new(SUBDIR_PATTERN)?,
            rf_file: Regex::new(RF_FILE_PATTERN)?,
        })
    }

    /// Finds every channel directory below `top`, sorted by name.
    pub fn find_channels(&self, top: &Path) -> Result<Vec<ChannelDir>> {
        if properties_file(top).is_some() {
            return Err(DrfErr(format!(
                "{} is a channel directory, but a top-level directory containing channel directories is required",
                top.display()
            )));
        }
        let mut channels = Vec::new();
        self.walk(top, top, &mut channels)?;
        channels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(channels)
    }

    fn walk(&self, top: &Path, dir: &Path, channels: &mut Vec<ChannelDir>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            match properties_file(&path) {
                Some(properties_file) => {
                    let name = channel_name(top, &path)?;
                    debug!("found channel {} at {}", name, path.display());
                    channels.push(ChannelDir {
                        name,
                        path,
                        properties_file,
                    });
                }
                // data subdirectories only live inside channels
                None if self.is_subdir(&path) => {}
                // a linked channel is still a channel, but links are never walked
                None if entry.file_type()?.is_symlink() => {
                    debug!("not following symlink {}", path.display());
                }
                None => self.walk(top, &path, channels)?,
            }
        }
        Ok(())
    }

    fn is_subdir(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| self.subdir.is_match(n))
    }

    /// Lists the data files of a channel, sorted by path (which is also time order).
    pub fn list_data_files(&self, channel_dir: &Path) -> Result<Vec<DataFile>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(channel_dir)? {
            let subdir = entry?.path();
            if !subdir.is_dir() || !self.is_subdir(&subdir) {
                continue;
            }
            for entry in fs::read_dir(&subdir)? {
                let path = entry?.path();
                if !path.is_file() {
                    continue;
                }
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                match self.parse_rf_name(name) {
                    Some(start_ms) => files.push(DataFile { path, start_ms }),
                    None if name.starts_with(RF_FILE_PREFIX) && name.ends_with(H5_SUFFIX) => {
                        warn!("skipping data file with unparsable name {}", path.display());
                    }
                    None => {}
                }
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("{} data files in {}", files.len(), channel_dir.display());
        Ok(files)
    }

    /// Unix milliseconds encoded in a data file name
    pub fn parse_rf_name(&self, name: &str) -> Option<u64> {
        let caps = self.rf_file.captures(name)?;
        let secs: u64 = caps[1].parse().ok()?;
        let millis: u64 = caps[2].parse().ok()?;
        secs.checked_mul(1000)?.checked_add(millis)
    }
}

fn channel_name(top: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(top).map_err(|_| {
        DrfErr(format!(
            "{} is not below {}",
            path.display(),
            top.display()
        ))
    })?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}
