// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel properties as stored in `drf_properties.h5` (or `metadata.h5`)
use crate::error::DrfError::DrfErr;
use crate::error::Result;
use crate::h5::AttrValue;
use crate::listing::*;
use log::{info, warn};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;


#[derive(Debug, Clone, PartialEq)]
pub struct ChannelProperties {
    pub sample_rate_numerator: u64,
    pub sample_rate_denominator: u64,
    pub subdir_cadence_secs: u64,
    /// Zero when the properties file does not say
    pub file_cadence_millisecs: u64,
    pub is_complex: bool,
    pub is_continuous: bool,
    pub num_subchannels: u64,
    pub epoch: Option<String>,
    pub time_description: Option<String>,
    pub version: Option<String>,
}

impl ChannelProperties {
    /// Samples per second
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate_numerator as f64 / self.sample_rate_denominator as f64
    }

    /// Builds properties from the root attributes of `path`, enforcing the
    /// supported version range.
    pub fn from_attributes(path: &Path, attrs: Vec<(String, AttrValue)>) -> Result<Self> {
        let attrs: HashMap<String, AttrValue> = attrs.into_iter().collect();
        let ctx = |msg: String| DrfErr(format!("{}: {}", path.display(), msg));

        let version = text(&attrs, ATTR_VERSION);
        if let Some(version) = &version {
            if compare_versions(MIN_VERSION, version) == Ordering::Greater {
                return Err(ctx(format!(
                    "Digital RF version {} is less than the required version {}",
                    version, MIN_VERSION
                )));
            }
            if compare_versions(version, MAX_VERSION) == Ordering::Greater {
                warn!(
                    "{}: Digital RF version {} is newer than the newest supported version {}",
                    path.display(),
                    version,
                    MAX_VERSION
                );
            }
        }

        let (num, den) = match (
            attrs.get(ATTR_SAMPLE_RATE_NUMERATOR),
            attrs.get(ATTR_SAMPLE_RATE_DENOMINATOR),
            attrs.get(ATTR_SAMPLES_PER_SECOND),
        ) {
            (Some(num), Some(den), _) => (
                unsigned(num).ok_or_else(|| ctx(format!("bad {}", ATTR_SAMPLE_RATE_NUMERATOR)))?,
                unsigned(den).ok_or_else(|| ctx(format!("bad {}", ATTR_SAMPLE_RATE_DENOMINATOR)))?,
            ),
            (_, _, Some(sps)) => {
                info!("{}: old style properties file", path.display());
                sps_to_ratio(sps).ok_or_else(|| ctx(format!("bad {}", ATTR_SAMPLES_PER_SECOND)))?
            }
            _ => return Err(ctx("no sample rate attributes".to_string())),
        };
        if num == 0 || den == 0 {
            return Err(ctx(format!("invalid sample rate {}/{}", num, den)));
        }

        Ok(ChannelProperties {
            sample_rate_numerator: num,
            sample_rate_denominator: den,
            subdir_cadence_secs: int(&attrs, ATTR_SUBDIR_CADENCE).unwrap_or(0),
            file_cadence_millisecs: int(&attrs, ATTR_FILE_CADENCE).unwrap_or(0),
            is_complex: int(&attrs, ATTR_IS_COMPLEX).map_or(false, |v| v != 0),
            is_continuous: int(&attrs, ATTR_IS_CONTINUOUS).map_or(false, |v| v != 0),
            num_subchannels: int(&attrs, ATTR_NUM_SUBCHANNELS).unwrap_or(1),
            epoch: text(&attrs, ATTR_EPOCH),
            time_description: text(&attrs, ATTR_TIME_DESCRIPTION),
            version,
        })
    }
}

fn unsigned(value: &AttrValue) -> Option<u64> {
    match *value {
        AttrValue::Int(v) => u64::try_from(v).ok(),
        AttrValue::Float(v) if v >= 0.0 && v.fract() == 0.0 => Some(v as u64),
        _ => None,
    }
}

fn int(attrs: &HashMap<String, AttrValue>, name: &str) -> Option<u64> {
    attrs.get(name).and_then(unsigned)
}

fn text(attrs: &HashMap<String, AttrValue>, name: &str) -> Option<String> {
    match attrs.get(name) {
        Some(AttrValue::Text(s)) => Some(s.clone()),
        _ => None,
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Exact ratio for a `samples_per_second` value, trying decimal denominators up to 1e9
pub(crate) fn sps_to_ratio(sps: &AttrValue) -> Option<(u64, u64)> {
    let sps = match *sps {
        AttrValue::Int(v) => return u64::try_from(v).ok().map(|v| (v, 1)),
        AttrValue::Float(v) if v.is_finite() && v > 0.0 => v,
        _ => return None,
    };
    let mut den: u64 = 1;
    while den <= 1_000_000_000 {
        let scaled = sps * den as f64;
        if (scaled - scaled.round()).abs() < 1e-6 && scaled < u64::MAX as f64 {
            let num = scaled.round() as u64;
            let g = gcd(num, den);
            return Some((num / g, den / g));
        }
        den *= 10;
    }
    None
}

/// Compares dotted `major.minor.bugfix` versions; missing or non-numeric parts count as 0.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    fn parts(v: &str) -> [u32; 3] {
        let mut out = [0; 3];
        for (slot, part) in out.iter_mut().zip(v.trim().split('.')) {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            *slot = digits.parse().unwrap_or(0);
        }
        out
    }
    parts(a).cmp(&parts(b))
}
