//! Integration tests running the engine on tables loaded from a rate
//! file.

use std::path::Path;

use irpf_core::{Region, TaxEngine, TaxRequest, TaxTables};
use irpf_data::RateFileLoader;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const RATES_2024_CSV: &str = include_str!("../test-data/rates_2024.csv");

#[test]
fn test_parsed_rate_file_matches_builtin_2024_schedules() {
    let records = RateFileLoader::parse(RATES_2024_CSV.as_bytes()).expect("Failed to parse CSV");
    let loaded =
        RateFileLoader::merge(TaxTables::year_2024(), &records).expect("Failed to merge records");
    let builtin = TaxTables::year_2024();

    // The fixture carries the published 2024 figures, so the loaded
    // schedules must agree with the built-in ones.
    assert_eq!(loaded.state, builtin.state);
    assert_eq!(
        loaded.regional_schedule(Region::Madrid),
        builtin.regional_schedule(Region::Madrid)
    );
    assert_eq!(
        loaded.regional_schedule(Region::CanaryIslands),
        builtin.regional_schedule(Region::CanaryIslands)
    );
}

#[test]
fn test_engine_runs_on_loaded_tables() {
    let records = RateFileLoader::parse(RATES_2024_CSV.as_bytes()).expect("Failed to parse CSV");
    let tables =
        RateFileLoader::merge(TaxTables::year_2024(), &records).expect("Failed to merge records");

    let request = TaxRequest::employee(dec!(60000), dec!(0.0635), Region::Madrid);
    let result = TaxEngine::new(&tables).compute(&request).expect("compute failed");

    assert_eq!(result.state_tax, dec!(14438.30));
    assert_eq!(result.regional_tax, dec!(5398.30));
    assert_eq!(result.net_income, dec!(36353.40));
}

#[test]
fn test_load_reads_the_file_from_disk() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data/rates_2024.csv");

    let tables = RateFileLoader::load(&path).expect("Failed to load rate file");

    assert_eq!(tables.state.brackets().len(), 6);
    assert_eq!(tables.validate(), Ok(()));
}

#[test]
fn test_load_surfaces_missing_files_as_io_errors() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data/no_such_file.csv");

    let result = RateFileLoader::load(&path);

    assert!(matches!(result, Err(irpf_data::RateFileError::Io(_))));
}
