//! Archive extraction and tabular parsing for accident datasets
//!
//! Delimited text is decoded by trying every encoding/delimiter pair in a
//! fixed order; the first pair that decodes, parses with a consistent column
//! count and exposes the required columns wins.

use std::borrow::Cow;
use std::io::{Cursor, Read};

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use super::AccidentRecord;
use crate::error::LoadError;
use crate::models::{Coordinates, place::parse_decimal};

/// Candidate character encodings, in the order they are attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Iso8859_1,
    Windows1252,
    Utf8WithSignature,
}

impl TextEncoding {
    pub const CANDIDATES: [TextEncoding; 5] = [
        TextEncoding::Utf8,
        TextEncoding::Latin1,
        TextEncoding::Iso8859_1,
        TextEncoding::Windows1252,
        TextEncoding::Utf8WithSignature,
    ];

    /// WHATWG label; `latin1` and `iso-8859-1` both resolve to windows-1252
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 | TextEncoding::Utf8WithSignature => "utf-8",
            TextEncoding::Latin1 => "latin1",
            TextEncoding::Iso8859_1 => "iso-8859-1",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }

    /// Strict decode; `None` on any malformed sequence
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        let bytes = match self {
            TextEncoding::Utf8WithSignature => bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes),
            _ => bytes,
        };
        let encoding = Encoding::for_label(self.label().as_bytes()).unwrap_or(UTF_8);
        encoding.decode_without_bom_handling_and_without_replacement(bytes)
    }
}

/// Candidate field delimiters, in the order they are attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Semicolon,
    Comma,
}

impl Delimiter {
    pub const CANDIDATES: [Delimiter; 2] = [Delimiter::Semicolon, Delimiter::Comma];

    #[must_use]
    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Semicolon => b';',
            Delimiter::Comma => b',',
        }
    }
}

/// Raw table with normalized (trimmed, lowercase) headers
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Result of reading an archive
#[derive(Debug)]
pub struct LoadedDataset {
    pub file_name: String,
    pub records: Vec<AccidentRecord>,
    pub skipped_rows: usize,
}

const REQUIRED: [&str; 3] = ["br", "latitude", "longitude"];

const LATITUDE: &[&str] = &["latitude", "lat"];
const LONGITUDE: &[&str] = &["longitude", "lon", "lng"];
const HIGHWAY: &[&str] = &["br"];
const KM: &[&str] = &["km"];
const MUNICIPALITY: &[&str] = &["municipio"];
const ACCIDENT_TYPE: &[&str] = &["tipo_acidente"];
const CAUSE: &[&str] = &["causa_acidente"];
const WEATHER: &[&str] = &["condicao_metereologica", "condicao_meteorologica"];
const ROAD_TYPE: &[&str] = &["tipo_pista"];
const FATALITIES: &[&str] = &["mortos"];
const SEVERE_INJURIES: &[&str] = &["feridos_graves"];
const MINOR_INJURIES: &[&str] = &["feridos_leves"];
const INJURIES: &[&str] = &["feridos"];

/// Extract the single tabular file from a zip archive and parse its records
pub fn load_archive(bytes: &[u8]) -> Result<LoadedDataset, LoadError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| LoadError::InvalidArchive(e.to_string()))?;

    let candidates: Vec<String> = archive
        .file_names()
        .filter(|name| is_tabular_entry(name))
        .map(str::to_string)
        .collect();

    let file_name = match candidates.as_slice() {
        [] => return Err(LoadError::NoTabularFile),
        [single] => single.clone(),
        _ => return Err(LoadError::MultipleTabularFiles(candidates)),
    };
    debug!("Reading accident data from {}", file_name);

    let mut contents = Vec::new();
    archive
        .by_name(&file_name)
        .map_err(|e| LoadError::InvalidArchive(e.to_string()))?
        .read_to_end(&mut contents)
        .map_err(|e| LoadError::InvalidArchive(e.to_string()))?;

    let table = if file_name.to_lowercase().ends_with(".xlsx") {
        parse_spreadsheet(contents)?
    } else {
        parse_delimited_text(&contents)?
    };

    let (records, skipped_rows) = records_from_table(&table)?;
    Ok(LoadedDataset {
        file_name,
        records,
        skipped_rows,
    })
}

fn is_tabular_entry(name: &str) -> bool {
    if name.ends_with('/') || name.starts_with("__MACOSX/") {
        return false;
    }
    let base = name.rsplit('/').next().unwrap_or(name);
    if base.starts_with('.') {
        return false;
    }
    let lower = base.to_lowercase();
    lower.ends_with(".csv") || lower.ends_with(".xlsx")
}

/// Decode delimited text without knowing its encoding or delimiter
pub fn parse_delimited_text(bytes: &[u8]) -> Result<Table, LoadError> {
    let mut closest_missing: Option<Vec<String>> = None;

    for encoding in TextEncoding::CANDIDATES {
        let Some(text) = encoding.decode(bytes) else {
            debug!("Data is not valid {}", encoding.label());
            continue;
        };

        for delimiter in Delimiter::CANDIDATES {
            let Some(table) = parse_with_delimiter(&text, delimiter) else {
                continue;
            };

            let missing = missing_columns(&table.headers);
            if missing.is_empty() {
                debug!(
                    "Parsed {} rows as {} with {:?} delimiter",
                    table.rows.len(),
                    encoding.label(),
                    delimiter
                );
                return Ok(table);
            }

            if closest_missing
                .as_ref()
                .is_none_or(|previous| missing.len() < previous.len())
            {
                closest_missing = Some(missing);
            }
        }
    }

    match closest_missing {
        Some(missing) => Err(LoadError::MissingColumns(missing)),
        None => Err(LoadError::UndecodableFormat),
    }
}

fn parse_with_delimiter(text: &str, delimiter: Delimiter) -> Option<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers().ok()?.iter().map(normalize_header).collect();
    // A single column means the delimiter never occurred
    if headers.len() < 2 {
        return None;
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.ok()?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Some(Table { headers, rows })
}

/// Read the first worksheet of an `.xlsx` file
pub fn parse_spreadsheet(contents: Vec<u8>) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(contents))
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Spreadsheet("workbook has no sheets".to_string()))?
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|cell| normalize_header(&cell_text(cell))).collect())
        .unwrap_or_default();

    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let rows = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(Table { headers, rows })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(text) => text.clone(),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn missing_columns(headers: &[String]) -> Vec<String> {
    REQUIRED
        .iter()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .map(|column| (*column).to_string())
        .collect()
}

/// Positions of the known columns within a table
struct ColumnIndex {
    highway: usize,
    latitude: usize,
    longitude: usize,
    km: Option<usize>,
    municipality: Option<usize>,
    accident_type: Option<usize>,
    cause: Option<usize>,
    weather: Option<usize>,
    road_type: Option<usize>,
    fatalities: Option<usize>,
    severe_injuries: Option<usize>,
    minor_injuries: Option<usize>,
    injuries: Option<usize>,
}

impl ColumnIndex {
    fn new(headers: &[String]) -> Result<Self, LoadError> {
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| headers.iter().position(|header| header == alias))
        };

        match (find(HIGHWAY), find(LATITUDE), find(LONGITUDE)) {
            (Some(highway), Some(latitude), Some(longitude)) => Ok(Self {
                highway,
                latitude,
                longitude,
                km: find(KM),
                municipality: find(MUNICIPALITY),
                accident_type: find(ACCIDENT_TYPE),
                cause: find(CAUSE),
                weather: find(WEATHER),
                road_type: find(ROAD_TYPE),
                fatalities: find(FATALITIES),
                severe_injuries: find(SEVERE_INJURIES),
                minor_injuries: find(MINOR_INJURIES),
                injuries: find(INJURIES),
            }),
            _ => Err(LoadError::MissingColumns(missing_columns(headers))),
        }
    }
}

/// Convert table rows into records, counting rows that had to be dropped
pub fn records_from_table(table: &Table) -> Result<(Vec<AccidentRecord>, usize), LoadError> {
    let columns = ColumnIndex::new(&table.headers)?;
    let mut records = Vec::with_capacity(table.rows.len());
    let mut skipped = 0;

    for row in &table.rows {
        match record_from_row(&columns, row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(
            "Skipped {} accident rows with missing highway or invalid coordinates",
            skipped
        );
    }
    Ok((records, skipped))
}

fn record_from_row(columns: &ColumnIndex, row: &[String]) -> Option<AccidentRecord> {
    let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or("");
    let text = |index: Option<usize>| {
        index
            .map(cell)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    let count = |index: Option<usize>| index.map(cell).and_then(parse_count).unwrap_or(0);

    let highway = parse_highway(cell(columns.highway))?;
    let coordinates = Coordinates::parse(cell(columns.latitude), cell(columns.longitude))?;

    Some(AccidentRecord {
        highway,
        coordinates,
        km: text(columns.km),
        municipality: text(columns.municipality),
        accident_type: text(columns.accident_type),
        cause: text(columns.cause),
        weather_condition: text(columns.weather),
        road_type: text(columns.road_type),
        fatalities: count(columns.fatalities),
        severe_injuries: count(columns.severe_injuries),
        minor_injuries: count(columns.minor_injuries),
        injuries: count(columns.injuries),
    })
}

/// Highway numbers may come through as "116" or "116.0"
fn parse_highway(raw: &str) -> Option<u16> {
    let value = parse_decimal(raw)?;
    (value.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&value)).then_some(value as u16)
}

fn parse_count(raw: &str) -> Option<u32> {
    let value = parse_decimal(raw)?;
    (value.is_finite() && value >= 0.0).then(|| value.min(f64::from(u32::MAX)) as u32)
}
