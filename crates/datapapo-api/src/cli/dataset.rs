//! `papo inspect` -- load a CSV and print its profile.

use std::path::Path;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table as DisplayTable};
use console::style;

use datapapo_core::dataset::profile::profile;
use datapapo_types::dataset::DatasetProfile;

use crate::state::AppState;

/// Load and profile a CSV, printing either a styled summary or JSON.
pub fn inspect(_state: &AppState, file: &Path, json: bool) -> anyhow::Result<()> {
    let loaded = datapapo_infra::csv::load_path(file)?;
    let dataset_profile = profile(&loaded.table);

    if json {
        println!("{}", serde_json::to_string_pretty(&dataset_profile)?);
        return Ok(());
    }

    print_profile(&dataset_profile);
    Ok(())
}

/// Print the profile summary: counts plus a per-column table.
pub fn print_profile(dataset_profile: &DatasetProfile) {
    println!();
    println!(
        "  {} {}",
        style(&dataset_profile.source).cyan().bold(),
        style(format!(
            "{} linhas × {} colunas, {} duplicadas",
            dataset_profile.row_count,
            dataset_profile.column_count,
            dataset_profile.duplicate_rows
        ))
        .dim()
    );
    println!();

    let mut table = DisplayTable::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        "coluna", "tipo", "nulos", "distintos", "mín", "máx", "média", "desvio",
    ]);

    for col in &dataset_profile.columns {
        let (mean, std_dev) = match &col.numeric {
            Some(stats) => (format!("{:.2}", stats.mean), format!("{:.2}", stats.std_dev)),
            None => ("-".to_string(), "-".to_string()),
        };
        table.add_row(vec![
            Cell::new(&col.name),
            Cell::new(col.column_type.to_string()),
            Cell::new(col.null_count),
            Cell::new(col.distinct_count),
            Cell::new(col.min_value.as_deref().unwrap_or("-")),
            Cell::new(col.max_value.as_deref().unwrap_or("-")),
            Cell::new(mean),
            Cell::new(std_dev),
        ]);
    }

    println!("{table}");
    println!();
}

/// Print the first rows of a profile as a preview table.
pub fn print_preview(dataset_profile: &DatasetProfile, rows: usize) {
    let mut table = DisplayTable::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(dataset_profile.columns.iter().map(|c| c.name.as_str()));

    for row in dataset_profile.head.iter().take(rows) {
        table.add_row(row.iter().map(|v| Cell::new(v)));
    }

    println!("{table}");
}
