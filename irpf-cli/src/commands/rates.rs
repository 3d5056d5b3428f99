//! The `rates` subcommand.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use irpf_core::{Bracket, BracketSchedule, Region, TaxTables};

use super::{load_tables, parse_region};
use crate::report;

/// Print the bracket schedules the estimator applies.
#[derive(Args, Debug)]
pub struct RatesCommand {
    /// Only show this region's schedule.
    #[arg(long, value_parser = parse_region)]
    region: Option<Region>,

    /// Rate file replacing the builtin 2024 bracket schedules.
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Emit the schedules as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

impl RatesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let tables = load_tables(self.tables.as_deref())?;

        if self.json {
            return print_json(&tables, self.region);
        }

        match self.region {
            Some(region) => {
                let schedule = tables.regional_schedule(region);
                if schedule.is_empty() {
                    println!("no regional schedule for {}", region.display_name());
                } else {
                    print_schedule(&regional_title(region), schedule);
                }
            }
            None => {
                print_schedule("State schedule", &tables.state);
                for region in Region::ALL {
                    let schedule = tables.regional_schedule(region);
                    if !schedule.is_empty() {
                        print_schedule(&regional_title(region), schedule);
                    }
                }
            }
        }

        Ok(())
    }
}

fn regional_title(region: Region) -> String {
    format!("{} regional schedule", region.display_name())
}

fn print_schedule(title: &str, schedule: &BracketSchedule) {
    let rows: Vec<RateRow> = schedule.brackets().iter().map(RateRow::from_bracket).collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();

    println!("\n{title}:");
    println!("{table}");
}

#[derive(Debug, Tabled)]
struct RateRow {
    #[tabled(rename = "Bracket")]
    bracket: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

impl RateRow {
    fn from_bracket(bracket: &Bracket) -> Self {
        Self {
            bracket: report::format_bracket_range(bracket),
            rate: report::format_percentage(bracket.rate),
        }
    }
}

#[derive(Debug, Serialize)]
struct SchedulesData<'a> {
    year: i32,
    state: &'a BracketSchedule,
    regional: BTreeMap<&'static str, &'a BracketSchedule>,
}

fn print_json(tables: &TaxTables, region: Option<Region>) -> anyhow::Result<()> {
    let regional: BTreeMap<&'static str, &BracketSchedule> = match region {
        Some(region) => [(region.as_str(), tables.regional_schedule(region))]
            .into_iter()
            .collect(),
        None => Region::ALL
            .iter()
            .map(|region| (region.as_str(), tables.regional_schedule(*region)))
            .filter(|(_, schedule)| !schedule.is_empty())
            .collect(),
    };

    let data = SchedulesData {
        year: tables.year,
        state: &tables.state,
        regional,
    };
    println!("{}", serde_json::to_string_pretty(&data)?);

    Ok(())
}
