use crate::constants::CSV_HEADER;
use crate::error::Result;
use crate::types::{Dataset, MatchRecord};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// `DT` column encoding: `YYYY-MM-DD HH:MM:SS`.
pub mod csv_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Write the dataset as CSV, header first, in dataset order.
pub fn write_csv_to<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for record in dataset {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the dataset to `path`, creating parent directories as needed.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_csv_to(dataset, file)?;
    debug!("Wrote {} records to {}", dataset.len(), path.display());
    Ok(())
}

pub fn read_csv_from<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records = rdr
        .deserialize::<MatchRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Dataset::from_records(records))
}

pub fn read_csv(path: &Path) -> Result<Dataset> {
    read_csv_from(File::open(path)?)
}
