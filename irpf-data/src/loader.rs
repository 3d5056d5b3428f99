use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use irpf_core::{Bracket, BracketSchedule, Region, ScheduleError, TaxTables};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Schedule key for the state schedule in rate files.
const STATE_KEY: &str = "state";

/// Errors that can occur when loading rate files.
#[derive(Debug, Error)]
pub enum RateFileError {
    #[error("failed to read rate file: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("schedule '{region}' in rate file is invalid: {error}")]
    InvalidSchedule {
        region: String,
        error: ScheduleError,
    },

    #[error("unknown schedule key '{0}' in rate file (expected 'state' or a region key)")]
    UnknownRegion(String),
}

impl From<csv::Error> for RateFileError {
    fn from(err: csv::Error) -> Self {
        RateFileError::CsvParse(err.to_string())
    }
}

/// A single row from a rate CSV file.
///
/// The file carries one row per band:
/// - `region`: `state` for the state schedule, or a region key such as
///   `madrid` or `castilla_leon`
/// - `lower`: lower bound of the band
/// - `upper`: upper bound of the band, empty for the unbounded top band
/// - `rate`: marginal rate as a decimal (e.g. 0.19 for 19%)
///
/// Rows belonging to one schedule must appear in ascending band order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateRecord {
    pub region: String,
    pub lower: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket schedules from CSV rate files.
///
/// A rate file only carries schedules. Allowances, contribution
/// figures and the flat-regime parameters keep their built-in values;
/// each schedule named in the file replaces the built-in one.
pub struct RateFileLoader;

impl RateFileLoader {
    /// Parses rate records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a
    /// file or a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RateRecord>, RateFileError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RateRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Merges parsed records over an existing table set.
    ///
    /// Records are grouped by their schedule key, each group is
    /// validated as a complete schedule, and valid groups replace the
    /// matching schedule in `tables`. Unknown schedule keys are an
    /// error: silently dropping a misspelt region would leave its
    /// built-in schedule in force.
    pub fn merge(mut tables: TaxTables, records: &[RateRecord]) -> Result<TaxTables, RateFileError> {
        let mut groups: BTreeMap<&str, Vec<Bracket>> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.region.as_str())
                .or_default()
                .push(Bracket::new(record.lower, record.upper, record.rate));
        }

        for (key, brackets) in groups {
            let schedule =
                BracketSchedule::new(brackets).map_err(|error| RateFileError::InvalidSchedule {
                    region: key.to_string(),
                    error,
                })?;

            if key == STATE_KEY {
                tables.state = schedule;
            } else {
                match Region::parse(key) {
                    Some(region) => {
                        tables.regional.insert(region, schedule);
                    }
                    None => return Err(RateFileError::UnknownRegion(key.to_string())),
                }
            }
        }

        Ok(tables)
    }

    /// Reads a rate file and merges it over the 2024 defaults.
    pub fn load(path: &Path) -> Result<TaxTables, RateFileError> {
        let file = File::open(path)?;
        let records = Self::parse(file)?;
        Self::merge(TaxTables::year_2024(), &records)
    }
}
