//! Subcommand implementations.

mod compute;
mod rates;

pub use compute::ComputeCommand;
pub use rates::RatesCommand;

use std::path::Path;

use anyhow::Context;

use irpf_core::{Region, TaxTables};
use irpf_data::RateFileLoader;

/// The builtin 2024 tables, or the builtin tables with every schedule in
/// the given rate file swapped in.
fn load_tables(tables: Option<&Path>) -> anyhow::Result<TaxTables> {
    match tables {
        Some(path) => RateFileLoader::load(path)
            .with_context(|| format!("failed to load rate file {}", path.display())),
        None => Ok(TaxTables::year_2024()),
    }
}

/// Value parser for `--region` flags. Strict: misspelled regions are
/// rejected rather than silently falling back to the state schedule.
fn parse_region(value: &str) -> Result<Region, String> {
    Region::parse(value).ok_or_else(|| {
        let known = Region::ALL.map(|region| region.as_str()).join(", ");
        format!("unknown region '{value}' (expected one of: {known})")
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_region_accepts_every_known_key() {
        for region in Region::ALL {
            assert_eq!(parse_region(region.as_str()), Ok(region));
        }
    }

    #[test]
    fn test_parse_region_rejects_unknown_key() {
        let err = parse_region("mordor").unwrap_err();
        assert!(err.contains("unknown region 'mordor'"));
        assert!(err.contains("madrid"));
    }

    #[test]
    fn test_load_tables_defaults_to_builtin_year() {
        let tables = load_tables(None).expect("builtin tables");
        assert_eq!(tables.year, 2024);
    }

    #[test]
    fn test_load_tables_reports_missing_file() {
        let err = load_tables(Some(Path::new("does-not-exist.csv"))).unwrap_err();
        assert!(err.to_string().contains("does-not-exist.csv"));
    }
}
