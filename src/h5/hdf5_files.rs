// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{AttrValue, H5Access, Hdf5Files, IndexEntry};
use crate::error::DrfError::DrfErr;
use crate::error::Result;
use crate::listing::{DATA_DATASET, INDEX_DATASET};
use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{Attribute, File};
use log::debug;
use std::path::Path;

#[cfg(test)]
mod hdf5_files_test;

// Upper bound for fixed-length string attributes
const MAX_STR: usize = 1024;

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| DrfErr(format!("problem opening file {}: {}", path.display(), e)))
}

fn first<T>(values: Vec<T>) -> Option<T> {
    values.into_iter().next()
}

// Scalars and one element arrays are both accepted; h5py writes either.
fn read_attr(attr: &Attribute) -> Result<Option<AttrValue>> {
    let value = match attr.dtype()?.to_descriptor()? {
        TypeDescriptor::Integer(_) => first(attr.read_raw::<i64>()?).map(AttrValue::Int),
        TypeDescriptor::Unsigned(_) => match first(attr.read_raw::<u64>()?) {
            Some(v) => Some(AttrValue::Int(i64::try_from(v).map_err(|_| {
                DrfErr(format!("attribute {} out of range: {}", attr.name(), v))
            })?)),
            None => None,
        },
        TypeDescriptor::Boolean => {
            first(attr.read_raw::<bool>()?).map(|b| AttrValue::Int(b as i64))
        }
        TypeDescriptor::Float(_) => first(attr.read_raw::<f64>()?).map(AttrValue::Float),
        TypeDescriptor::FixedAscii(_) => first(attr.read_raw::<FixedAscii<MAX_STR>>()?)
            .map(|s| AttrValue::Text(s.as_str().to_owned())),
        TypeDescriptor::FixedUnicode(_) => first(attr.read_raw::<FixedUnicode<MAX_STR>>()?)
            .map(|s| AttrValue::Text(s.as_str().to_owned())),
        TypeDescriptor::VarLenAscii => first(attr.read_raw::<VarLenAscii>()?)
            .map(|s| AttrValue::Text(s.as_str().to_owned())),
        TypeDescriptor::VarLenUnicode => first(attr.read_raw::<VarLenUnicode>()?)
            .map(|s| AttrValue::Text(s.as_str().to_owned())),
        other => {
            debug!("ignoring attribute {} of type {:?}", attr.name(), other);
            None
        }
    };
    Ok(value)
}

impl H5Access for Hdf5Files {
    fn read_attributes(&self, path: &Path) -> Result<Vec<(String, AttrValue)>> {
        let file = open(path)?;
        let mut attrs = Vec::new();
        for name in file.attr_names()? {
            let attr = file.attr(&name)?;
            let value = read_attr(&attr)
                .map_err(|e| DrfErr(format!("problem reading attribute {}: {}", name, e)))?;
            if let Some(value) = value {
                attrs.push((name, value));
            }
        }
        Ok(attrs)
    }

    fn read_index(&self, path: &Path) -> Result<Vec<IndexEntry>> {
        let file = open(path)?;
        let dataset = file
            .dataset(INDEX_DATASET)
            .map_err(|e| DrfErr(format!("unable to get {} in {}: {}", INDEX_DATASET, path.display(), e)))?;
        let shape = dataset.shape();
        if shape.len() != 2 || shape[1] != 2 {
            return Err(DrfErr(format!(
                "{} in {} has shape {:?}, expected (N, 2)",
                INDEX_DATASET,
                path.display(),
                shape
            )));
        }
        let raw = dataset.read_raw::<u64>()?;
        Ok(raw
            .chunks_exact(2)
            .map(|row| IndexEntry {
                global: row[0],
                local: row[1],
            })
            .collect())
    }

    fn data_len(&self, path: &Path) -> Result<u64> {
        let file = open(path)?;
        let dataset = file
            .dataset(DATA_DATASET)
            .map_err(|e| DrfErr(format!("unable to get {} in {}: {}", DATA_DATASET, path.display(), e)))?;
        match dataset.shape().first() {
            Some(&rows) => Ok(rows as u64),
            None => Err(DrfErr(format!(
                "unable to read {} shape in {}",
                DATA_DATASET,
                path.display()
            ))),
        }
    }
}
