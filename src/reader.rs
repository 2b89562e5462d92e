// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::blocks::{file_blocks, Bounds, ContinuousBlocks};
use crate::error::DrfError::DrfErr;
use crate::error::Result;
use crate::h5::{H5Access, Hdf5Files, IndexEntry};
use crate::listing::{ChannelDir, DataFile, Layout};
use crate::properties::ChannelProperties;
use crate::RfReader;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};


const FILE_SCHEME: &str = "file://";
const REMOTE_SCHEMES: [&str; 3] = ["http://", "https://", "ftp://"];

#[derive(Debug)]
struct Channel {
    dir: ChannelDir,
    properties: ChannelProperties,
}

/// Read access to one Digital RF top-level directory
#[derive(Debug)]
pub struct DigitalRfReader<A: H5Access = Hdf5Files> {
    top_level_dir: PathBuf,
    layout: Layout,
    channels: BTreeMap<String, Channel>,
    h5: A,
}

impl DigitalRfReader<Hdf5Files> {
    /// Opens a top-level directory (a plain path or a `file://` URL).
    pub fn open<P: AsRef<Path>>(directory: P) -> Result<Self> {
        Self::open_with(directory, Hdf5Files)
    }
}

impl<A: H5Access> DigitalRfReader<A> {
    pub fn open_with<P: AsRef<Path>>(directory: P, h5: A) -> Result<Self> {
        let top_level_dir = resolve_dir(directory.as_ref())?;
        info!("opening {}", top_level_dir.display());

        let layout = Layout::new()?;
        let mut channels = BTreeMap::new();
        for dir in layout.find_channels(&top_level_dir)? {
            let attrs = h5.read_attributes(&dir.properties_file)?;
            let properties = ChannelProperties::from_attributes(&dir.properties_file, attrs)?;
            info!(
                "channel {}: {} samples/s, {} subchannel(s), version {}",
                dir.name,
                properties.sample_rate(),
                properties.num_subchannels,
                properties.version.as_deref().unwrap_or("unknown")
            );
            channels.insert(dir.name.clone(), Channel { dir, properties });
        }

        Ok(DigitalRfReader {
            top_level_dir,
            layout,
            channels,
            h5,
        })
    }

    pub fn top_level_dir(&self) -> &Path {
        &self.top_level_dir
    }

    fn channel(&self, name: &str) -> Result<&Channel> {
        self.channels
            .get(name)
            .ok_or_else(|| DrfErr(format!("No channel found named {}", name)))
    }

    fn data_files(&self, channel: &Channel) -> Result<Vec<DataFile>> {
        self.layout.list_data_files(&channel.dir.path)
    }

    fn read_index(&self, file: &DataFile) -> Result<Vec<IndexEntry>> {
        let index = self.h5.read_index(&file.path)?;
        if index.is_empty() {
            return Err(DrfErr(format!(
                "empty rf_data_index in {}",
                file.path.display()
            )));
        }
        Ok(index)
    }
}

impl<A: H5Access> RfReader for DigitalRfReader<A> {
    fn get_channels(&self) -> Vec<String> {
        // BTreeMap keys are already sorted
        self.channels.keys().cloned().collect()
    }

    fn get_properties(&self, channel: &str) -> Result<ChannelProperties> {
        Ok(self.channel(channel)?.properties.clone())
    }

    fn get_bounds(&self, channel: &str) -> Result<Bounds> {
        let chan = self.channel(channel)?;
        let files = self.data_files(chan)?;
        let (first, last) = match (files.first(), files.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(DrfErr(format!(
                    "No data files found for channel {}",
                    channel
                )))
            }
        };

        let first_index = self.read_index(first)?;
        let start = first_index[0].global;

        let last_index = if last.path == first.path {
            first_index
        } else {
            self.read_index(last)?
        };
        let row = last_index[last_index.len() - 1];
        let data_len = self.h5.data_len(&last.path)?;
        if data_len <= row.local {
            return Err(DrfErr(format!(
                "malformed rf_data_index in {}: last run starts at row {} of {}",
                last.path.display(),
                row.local,
                data_len
            )));
        }
        let end = row.global + (data_len - (row.local + 1));
        if end < start {
            return Err(DrfErr(format!(
                "channel {} ends ({}) before it starts ({})",
                channel, end, start
            )));
        }
        debug!("bounds of {}: {} {}", channel, start, end);
        Ok(Bounds { start, end })
    }

    fn get_continuous_blocks(&self, start: u64, end: u64, channel: &str) -> Result<ContinuousBlocks> {
        if start > end {
            return Err(DrfErr(format!(
                "start sample {} is after end sample {}",
                start, end
            )));
        }
        let chan = self.channel(channel)?;
        let props = &chan.properties;

        let mut blocks = ContinuousBlocks::new();
        for file in self.data_files(chan)? {
            let window = file.sample_window(
                props.sample_rate_numerator,
                props.sample_rate_denominator,
                props.file_cadence_millisecs,
            );
            if window.end <= start || window.start > end {
                continue;
            }
            debug!("reading index of {}", file.path.display());
            let index = self.read_index(&file)?;
            let data_len = self.h5.data_len(&file.path)?;
            for (block_start, block_len) in file_blocks(&index, data_len, &file.path)? {
                let block_end = block_start + block_len - 1;
                if block_end < start || block_start > end {
                    continue;
                }
                let clipped_start = block_start.max(start);
                let clipped_end = block_end.min(end);
                blocks.insert(clipped_start, clipped_end - clipped_start + 1);
            }
        }
        Ok(blocks)
    }
}

fn resolve_dir(directory: &Path) -> Result<PathBuf> {
    let raw = directory.to_string_lossy();
    if raw.is_empty() {
        return Err(DrfErr("Malformed input directory: empty path".to_string()));
    }
    if let Some(scheme) = REMOTE_SCHEMES.iter().find(|s| raw.starts_with(**s)) {
        return Err(DrfErr(format!(
            "access mode {} not implemented",
            scheme.trim_end_matches("://")
        )));
    }
    let local = match raw.strip_prefix(FILE_SCHEME) {
        Some(rest) => PathBuf::from(rest),
        None => directory.to_path_buf(),
    };
    let abs = fs::canonicalize(&local)
        .map_err(|e| DrfErr(format!("Problem opening directory {}: {}", local.display(), e)))?;
    if !abs.is_dir() {
        return Err(DrfErr(format!("{} is not a directory", abs.display())));
    }
    Ok(abs)
}
