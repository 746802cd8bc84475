//! Accident records from the federal highway police (PRF) open dataset
//!
//! A store is built once per uploaded archive and never mutated afterwards;
//! a new upload replaces the whole store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::highway_label;
use crate::error::LoadError;
use crate::models::Coordinates;

pub mod loader;

pub use loader::{Delimiter, TextEncoding};

/// One accident row with validated coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccidentRecord {
    /// Federal highway number (116 for BR-116)
    pub highway: u16,
    pub coordinates: Coordinates,
    /// Kilometer marker as written in the dataset
    pub km: Option<String>,
    pub municipality: Option<String>,
    pub accident_type: Option<String>,
    pub cause: Option<String>,
    pub weather_condition: Option<String>,
    pub road_type: Option<String>,
    pub fatalities: u32,
    pub severe_injuries: u32,
    pub minor_injuries: u32,
    pub injuries: u32,
}

/// Overview of a loaded dataset
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DatasetSummary {
    pub source_file: Option<String>,
    pub records: usize,
    pub skipped_rows: usize,
    /// Record count per highway, ordered by highway number
    pub highways: Vec<HighwayCount>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct HighwayCount {
    pub highway: String,
    pub records: usize,
}

/// Read-only accident records indexed by highway
#[derive(Debug, Default)]
pub struct AccidentStore {
    by_highway: HashMap<u16, Vec<AccidentRecord>>,
    total: usize,
    skipped_rows: usize,
    source_file: Option<String>,
}

impl AccidentStore {
    /// Load a zip archive holding exactly one `.csv` or `.xlsx` file
    pub fn load(archive: &[u8]) -> Result<Self, LoadError> {
        let loaded = loader::load_archive(archive)?;
        let mut store = Self::from_records(loaded.records);
        store.skipped_rows += loaded.skipped_rows;
        store.source_file = Some(loaded.file_name);

        info!(
            "Loaded {} accident records on {} highways from {} ({} rows skipped)",
            store.total,
            store.by_highway.len(),
            store.source_file.as_deref().unwrap_or("archive"),
            store.skipped_rows
        );
        Ok(store)
    }

    /// Build a store from records; records with invalid coordinates are dropped
    pub fn from_records(records: impl IntoIterator<Item = AccidentRecord>) -> Self {
        let mut store = Self::default();
        for record in records {
            if !record.coordinates.is_valid() {
                store.skipped_rows += 1;
                continue;
            }
            store.total += 1;
            store
                .by_highway
                .entry(record.highway)
                .or_default()
                .push(record);
        }
        store
    }

    /// Records on a highway; unknown highways yield an empty slice
    #[must_use]
    pub fn by_highway(&self, highway: u16) -> &[AccidentRecord] {
        self.by_highway
            .get(&highway)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Rows excluded at load time for unusable highway or coordinates
    #[must_use]
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    #[must_use]
    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    #[must_use]
    pub fn summary(&self) -> DatasetSummary {
        let mut highways: Vec<(u16, usize)> = self
            .by_highway
            .iter()
            .map(|(highway, records)| (*highway, records.len()))
            .collect();
        highways.sort_unstable();

        DatasetSummary {
            source_file: self.source_file.clone(),
            records: self.total,
            skipped_rows: self.skipped_rows,
            highways: highways
                .into_iter()
                .map(|(highway, records)| HighwayCount {
                    highway: highway_label(highway),
                    records,
                })
                .collect(),
        }
    }
}
