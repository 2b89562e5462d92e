// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Properties file written by Digital RF 2.x
pub const PROPERTIES_FILE: &str = "drf_properties.h5";
/// Properties file written by older releases
pub const OLD_PROPERTIES_FILE: &str = "metadata.h5";
/// Checked in order, the first one present wins
pub const PROPERTIES_FILES: [&str; 2] = [PROPERTIES_FILE, OLD_PROPERTIES_FILE];

/// Hourly (or whatever the subdir cadence is) data directories, e.g. `2024-11-05T14-00-00`
pub const SUBDIR_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2}$";
/// Data files, e.g. `rf@1730815200.000.h5`; captures unix seconds and milliseconds
pub const RF_FILE_PATTERN: &str = r"^rf@(\d+)\.(\d{3})\.h5$";
pub const RF_FILE_PREFIX: &str = "rf@";
pub const H5_SUFFIX: &str = ".h5";

pub const INDEX_DATASET: &str = "rf_data_index";
pub const DATA_DATASET: &str = "rf_data";

pub const MIN_VERSION: &str = "2.0";
pub const MAX_VERSION: &str = "2.6.11";

// Properties file attribute names
pub const ATTR_SAMPLE_RATE_NUMERATOR: &str = "sample_rate_numerator";
pub const ATTR_SAMPLE_RATE_DENOMINATOR: &str = "sample_rate_denominator";
pub const ATTR_SAMPLES_PER_SECOND: &str = "samples_per_second";
pub const ATTR_SUBDIR_CADENCE: &str = "subdir_cadence_secs";
pub const ATTR_FILE_CADENCE: &str = "file_cadence_millisecs";
pub const ATTR_IS_COMPLEX: &str = "is_complex";
pub const ATTR_IS_CONTINUOUS: &str = "is_continuous";
pub const ATTR_NUM_SUBCHANNELS: &str = "num_subchannels";
pub const ATTR_EPOCH: &str = "epoch";
pub const ATTR_TIME_DESCRIPTION: &str = "digital_rf_time_description";
pub const ATTR_VERSION: &str = "digital_rf_version";
