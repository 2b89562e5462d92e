// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runs the open, channels, bounds, continuous blocks sequence over a list
//! of datasets and prints what was found.
use crate::error::DrfError::DrfErr;
use crate::error::Result;
use crate::{Bounds, ContinuousBlocks, DigitalRfReader, RfReader};
use log::{info, warn};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};


const RULE: &str = "----------------------";

/// Datasets run when none are given on the command line
pub const EXAMPLE_DATASETS: [(&str, &str); 3] = [
    ("Test 1: basic example", "example_digital_rf"),
    ("Test 2: real data, no subchannels", "drfexamples/hprec_channels"),
    ("Test 3: real data, yes subchannels", "drfexamples/hprec_subchannels"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub title: String,
    pub dir: PathBuf,
}

impl Dataset {
    pub fn new<T: Into<String>, P: Into<PathBuf>>(title: T, dir: P) -> Self {
        Dataset {
            title: title.into(),
            dir: dir.into(),
        }
    }

    pub fn examples() -> Vec<Dataset> {
        EXAMPLE_DATASETS
            .iter()
            .map(|(title, dir)| Dataset::new(*title, *dir))
            .collect()
    }
}

/// Everything printed for one dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetReport {
    pub title: String,
    pub channels: Vec<String>,
    pub bounds: Bounds,
    pub blocks: ContinuousBlocks,
}

impl fmt::Display for DatasetReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "got channels: {}", channel_list(&self.channels))?;
        writeln!(f, "got bounds: {} {}", self.bounds.start, self.bounds.end)?;
        writeln!(f, "got data arr:")?;
        writeln!(f, "{}", self.blocks)?;
        writeln!(f)
    }
}

/// Channel names as a bracketed, single-quoted list: `['ch0', 'ch1']`
fn channel_list(channels: &[String]) -> String {
    let quoted: Vec<String> = channels.iter().map(|c| format!("'{}'", c)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Queries the first channel of `reader`.
pub fn inspect<R: RfReader>(title: &str, reader: &R) -> Result<DatasetReport> {
    let channels = reader.get_channels();
    let first = channels
        .first()
        .ok_or_else(|| DrfErr(format!("{}: no channels found", title)))?
        .clone();

    match reader.get_properties(&first) {
        Ok(props) => info!("{}: sample rate {} Hz", first, props.sample_rate()),
        Err(e) => warn!("{}: no properties: {}", first, e),
    }

    let bounds = reader.get_bounds(&first)?;
    let blocks = reader.get_continuous_blocks(bounds.start, bounds.end, &first)?;
    Ok(DatasetReport {
        title: title.to_string(),
        channels,
        bounds,
        blocks,
    })
}

/// Runs every dataset in order, opening each one with `open`. A report is
/// written only once its dataset has been fully queried; the first error
/// stops the run.
pub fn run_with<R, F, W>(datasets: &[Dataset], mut open: F, out: &mut W) -> Result<()>
where
    R: RfReader,
    F: FnMut(&Path) -> Result<R>,
    W: Write,
{
    for dataset in datasets {
        info!("{}: {}", dataset.title, dataset.dir.display());
        let reader = open(&dataset.dir)?;
        let report = inspect(&dataset.title, &reader)?;
        write!(out, "{}", report)?;
        out.flush()?;
    }
    Ok(())
}

pub fn run<W: Write>(datasets: &[Dataset], out: &mut W) -> Result<()> {
    run_with(datasets, |dir: &Path| DigitalRfReader::open(dir), out)
}
