//! Shadowgram CSV export

use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::{io, path::Path};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write the CSV file")]
    Csv(#[from] csv::Error),
    #[error("Failed to flush the CSV file")]
    Io(#[from] io::Error),
}
type Result<T> = std::result::Result<T, ExportError>;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Record {
    #[serde(rename = "X (mm)")]
    pub x: f64,
    #[serde(rename = "Y (mm)")]
    pub y: f64,
    #[serde(rename = "Visible")]
    pub visible: bool,
}

impl Pattern {
    /// Writes all the points, visible or not, as CSV records
    pub fn to_writer<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for ((&x, &y), &visible) in self.x.iter().zip(self.y.iter()).zip(self.visible.iter()) {
            wtr.serialize(Record { x, y, visible })?;
        }
        wtr.flush()?;
        Ok(())
    }
    /// Saves the points to a CSV file
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        log::info!("Writing {:?}...", path.as_ref());
        let file = std::fs::File::create(path)?;
        self.to_writer(file)
    }
}
