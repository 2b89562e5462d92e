// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs;
use std::path::{Path, PathBuf};

use hdf5::types::{FixedAscii, VarLenUnicode};
use hdf5::File;
use tempfile::{tempdir, TempDir};

use crate::h5::{AttrValue, H5Access, Hdf5Files, IndexEntry};
use crate::{Bounds, DigitalRfReader, RfReader};

// 100 samples/s starting at unix 1730815200
const S: u64 = 173_081_520_000;

/// Properties written the way h5py leaves them: unsigned, signed, bool,
/// float, fixed and variable length strings, some scalar, some 1-element.
fn write_properties(path: &Path) -> hdf5::Result<()> {
    let file = File::create(path)?;
    file.new_attr::<u64>()
        .shape(1)
        .create("sample_rate_numerator")?
        .write_raw(&[100u64])?;
    file.new_attr::<u64>()
        .shape(1)
        .create("sample_rate_denominator")?
        .write_raw(&[1u64])?;
    file.new_attr::<f64>()
        .shape(1)
        .create("samples_per_second")?
        .write_raw(&[100.0f64])?;
    file.new_attr::<i64>()
        .shape(())
        .create("subdir_cadence_secs")?
        .write_scalar(&3600i64)?;
    file.new_attr::<i64>()
        .shape(())
        .create("file_cadence_millisecs")?
        .write_scalar(&1000i64)?;
    file.new_attr::<bool>()
        .shape(())
        .create("is_complex")?
        .write_scalar(&true)?;
    file.new_attr::<i32>()
        .shape(1)
        .create("num_subchannels")?
        .write_raw(&[2i32])?;
    let epoch = FixedAscii::<32>::from_ascii(b"1970-01-01T00:00:00Z").unwrap();
    file.new_attr::<FixedAscii<32>>()
        .shape(())
        .create("epoch")?
        .write_scalar(&epoch)?;
    let version: VarLenUnicode = "2.6.8".parse().unwrap();
    file.new_attr::<VarLenUnicode>()
        .shape(())
        .create("digital_rf_version")?
        .write_scalar(&version)?;
    Ok(())
}

/// Runs S..S+40 and S+60..S+100 over 80 rows of complex samples
fn write_data_file(path: &Path, index_shape: &[usize]) -> hdf5::Result<()> {
    let file = File::create(path)?;
    file.new_dataset::<u64>()
        .shape(index_shape.to_vec())
        .create("rf_data_index")?
        .write_raw(&[S, 0, S + 60, 40])?;
    file.new_dataset::<f32>()
        .shape((80, 2))
        .create("rf_data")?
        .write_raw(&vec![0.0f32; 160])?;
    Ok(())
}

fn layout(index_shape: &[usize]) -> (TempDir, PathBuf, PathBuf) {
    let top = tempdir().unwrap();
    let channel = top.path().join("ch0");
    let subdir = channel.join("2024-11-05T14-00-00");
    fs::create_dir_all(&subdir).unwrap();
    let properties = channel.join("drf_properties.h5");
    let data = subdir.join("rf@1730815200.000.h5");
    write_properties(&properties).unwrap();
    write_data_file(&data, index_shape).unwrap();
    (top, properties, data)
}

fn attr<'a>(attrs: &'a [(String, AttrValue)], name: &str) -> &'a AttrValue {
    &attrs.iter().find(|(n, _)| n == name).unwrap().1
}

#[test]
fn test_read_attributes_converts_types() {
    let (_top, properties, _) = layout(&[2, 2]);
    let attrs = Hdf5Files.read_attributes(&properties).unwrap();
    assert_eq!(attrs.len(), 9);
    assert_eq!(attr(&attrs, "sample_rate_numerator"), &AttrValue::Int(100));
    assert_eq!(attr(&attrs, "samples_per_second"), &AttrValue::Float(100.0));
    assert_eq!(attr(&attrs, "subdir_cadence_secs"), &AttrValue::Int(3600));
    assert_eq!(attr(&attrs, "is_complex"), &AttrValue::Int(1));
    assert_eq!(attr(&attrs, "num_subchannels"), &AttrValue::Int(2));
    assert_eq!(
        attr(&attrs, "epoch"),
        &AttrValue::Text("1970-01-01T00:00:00Z".to_string())
    );
    assert_eq!(
        attr(&attrs, "digital_rf_version"),
        &AttrValue::Text("2.6.8".to_string())
    );
}

#[test]
fn test_read_index_and_data_len() {
    let (_top, _, data) = layout(&[2, 2]);
    assert_eq!(
        Hdf5Files.read_index(&data).unwrap(),
        vec![
            IndexEntry { global: S, local: 0 },
            IndexEntry { global: S + 60, local: 40 },
        ]
    );
    assert_eq!(Hdf5Files.data_len(&data).unwrap(), 80);
}

#[test]
fn test_flat_index_is_rejected() {
    let (_top, _, data) = layout(&[4]);
    let err = Hdf5Files.read_index(&data).unwrap_err();
    assert!(err.to_string().contains("expected (N, 2)"));
}

#[test]
fn test_missing_file_and_dataset() {
    let (top, properties, _) = layout(&[2, 2]);
    let err = Hdf5Files
        .read_index(&top.path().join("rf@0.000.h5"))
        .unwrap_err();
    assert!(err.to_string().contains("problem opening file"));
    let err = Hdf5Files.data_len(&properties).unwrap_err();
    assert!(err.to_string().contains("unable to get rf_data"));
}

#[test]
fn test_reader_on_real_files() {
    let (top, _, _) = layout(&[2, 2]);
    let reader = DigitalRfReader::open(top.path()).unwrap();
    assert_eq!(reader.get_channels(), vec!["ch0"]);

    let props = reader.get_properties("ch0").unwrap();
    assert_eq!(props.sample_rate(), 100.0);
    assert!(props.is_complex);
    assert_eq!(props.num_subchannels, 2);
    assert_eq!(props.epoch.as_deref(), Some("1970-01-01T00:00:00Z"));

    let bounds = reader.get_bounds("ch0").unwrap();
    assert_eq!(bounds, Bounds { start: S, end: S + 99 });
    let blocks = reader
        .get_continuous_blocks(bounds.start, bounds.end, "ch0")
        .unwrap();
    assert_eq!(
        blocks.iter().collect::<Vec<_>>(),
        vec![(&S, &40), (&(S + 60), &40)]
    );
}
