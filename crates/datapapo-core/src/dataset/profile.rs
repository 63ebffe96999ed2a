//! Dataset profiling: the precomputed context the analysis agent sees.
//!
//! Mirrors the first-contact ritual of exploratory data analysis:
//! structure and types, null counts, duplicate rows, descriptive
//! statistics, and a head sample. The profile is also rendered as a
//! Markdown context block for the system prompt.

use std::collections::HashSet;

use datapapo_types::dataset::{
    ColumnProfile, ColumnType, DatasetProfile, NumericStats, SAMPLE_ROWS, SAMPLE_VALUES,
};

use super::table::{Cell, Column, Table};

/// Profile a table into the summary shown to the agent.
pub fn profile(table: &Table) -> DatasetProfile {
    let columns = table.columns().iter().map(profile_column).collect();

    DatasetProfile {
        source: table.source().to_string(),
        row_count: table.row_count(),
        column_count: table.column_count(),
        duplicate_rows: count_duplicate_rows(table),
        columns,
        head: table.head(SAMPLE_ROWS),
    }
}

fn profile_column(column: &Column) -> ColumnProfile {
    let column_type = column.inferred_type();
    let null_count = column.null_count();

    let mut distinct: HashSet<String> = HashSet::new();
    let mut sample_values = Vec::new();
    for cell in &column.cells {
        if cell.is_null() {
            continue;
        }
        let display = cell.to_string();
        if sample_values.len() < SAMPLE_VALUES && !sample_values.contains(&display) {
            sample_values.push(display.clone());
        }
        distinct.insert(display);
    }

    let numeric = match column_type {
        ColumnType::Int | ColumnType::Float => numeric_stats(&column.cells),
        _ => None,
    };

    let (min_value, max_value) = match &numeric {
        Some(stats) => (
            Some(format_number(stats.min)),
            Some(format_number(stats.max)),
        ),
        None => lexicographic_bounds(&column.cells),
    };

    ColumnProfile {
        name: column.name.clone(),
        column_type,
        null_count,
        distinct_count: distinct.len(),
        min_value,
        max_value,
        numeric,
        sample_values,
    }
}

/// Mean, population standard deviation, and bounds over non-null cells.
fn numeric_stats(cells: &[Cell]) -> Option<NumericStats> {
    let values: Vec<f64> = cells.iter().filter_map(|c| c.as_f64()).collect();
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(NumericStats {
        min,
        max,
        mean,
        std_dev: variance.sqrt(),
    })
}

fn lexicographic_bounds(cells: &[Cell]) -> (Option<String>, Option<String>) {
    let mut min: Option<String> = None;
    let mut max: Option<String> = None;
    for cell in cells {
        if cell.is_null() {
            continue;
        }
        let display = cell.to_string();
        if min.as_ref().is_none_or(|m| display < *m) {
            min = Some(display.clone());
        }
        if max.as_ref().is_none_or(|m| display > *m) {
            max = Some(display);
        }
    }
    (min, max)
}

fn count_duplicate_rows(table: &Table) -> usize {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut duplicates = 0;
    for idx in 0..table.row_count() {
        if !seen.insert(table.row(idx)) {
            duplicates += 1;
        }
    }
    duplicates
}

/// Trim trailing zeros so "42" stays "42" and "12.50" becomes "12.5".
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{value:.4}");
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Render the profile as the Markdown context block injected into the
/// system prompt. Headings are in Portuguese to match the protocol.
pub fn to_prompt_context(profile: &DatasetProfile) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Arquivo: {}\nLinhas: {} | Colunas: {} | Linhas duplicadas: {}\n\n",
        profile.source, profile.row_count, profile.column_count, profile.duplicate_rows
    ));

    out.push_str("## Estrutura das colunas\n\n");
    out.push_str("| coluna | tipo | nulos | distintos | mín | máx | média | desvio padrão |\n");
    out.push_str("|---|---|---|---|---|---|---|---|\n");
    for col in &profile.columns {
        let (mean, std_dev) = match &col.numeric {
            Some(stats) => (format_number(stats.mean), format_number(stats.std_dev)),
            None => ("-".to_string(), "-".to_string()),
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            col.name,
            col.column_type,
            col.null_count,
            col.distinct_count,
            col.min_value.as_deref().unwrap_or("-"),
            col.max_value.as_deref().unwrap_or("-"),
            mean,
            std_dev,
        ));
    }

    if !profile.head.is_empty() {
        out.push_str("\n## Amostra (primeiras linhas)\n\n");
        let names: Vec<&str> = profile.columns.iter().map(|c| c.name.as_str()).collect();
        out.push_str(&format!("| {} |\n", names.join(" | ")));
        out.push_str(&format!("|{}\n", "---|".repeat(names.len())));
        for row in &profile.head {
            out.push_str(&format!("| {} |\n", row.join(" | ")));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn sample_table() -> Table {
        Table::from_records(
            "vendas.csv",
            to_strings(&["idade", "cidade"]),
            vec![
                to_strings(&["20", "Recife"]),
                to_strings(&["30", "Natal"]),
                to_strings(&["40", "Recife"]),
                to_strings(&["", "Recife"]),
                to_strings(&["20", "Recife"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_profile_counts() {
        let p = profile(&sample_table());
        assert_eq!(p.row_count, 5);
        assert_eq!(p.column_count, 2);
        assert_eq!(p.duplicate_rows, 1); // row "20,Recife" appears twice
        assert_eq!(p.columns[0].null_count, 1);
        assert_eq!(p.columns[0].distinct_count, 3);
        assert_eq!(p.columns[1].distinct_count, 2);
    }

    #[test]
    fn test_numeric_stats() {
        let p = profile(&sample_table());
        let stats = p.columns[0].numeric.as_ref().unwrap();
        assert!((stats.min - 20.0).abs() < f64::EPSILON);
        assert!((stats.max - 40.0).abs() < f64::EPSILON);
        assert!((stats.mean - 27.5).abs() < f64::EPSILON);
        // Population std dev of [20, 30, 40, 20]
        assert!((stats.std_dev - 8.291561975888499).abs() < 1e-9);
        assert_eq!(p.columns[0].min_value.as_deref(), Some("20"));
        assert_eq!(p.columns[0].max_value.as_deref(), Some("40"));
    }

    #[test]
    fn test_text_column_lexicographic_bounds() {
        let p = profile(&sample_table());
        assert!(p.columns[1].numeric.is_none());
        assert_eq!(p.columns[1].min_value.as_deref(), Some("Natal"));
        assert_eq!(p.columns[1].max_value.as_deref(), Some("Recife"));
    }

    #[test]
    fn test_sample_values_are_distinct_and_bounded() {
        let p = profile(&sample_table());
        assert_eq!(p.columns[1].sample_values, vec!["Recife", "Natal"]);
        assert!(p.columns[0].sample_values.len() <= SAMPLE_VALUES);
    }

    #[test]
    fn test_all_null_column_has_no_stats() {
        let table = Table::from_records(
            "t.csv",
            to_strings(&["vazia"]),
            vec![to_strings(&[""]), to_strings(&[""])],
        )
        .unwrap();
        let p = profile(&table);
        assert_eq!(p.columns[0].column_type, ColumnType::Text);
        assert!(p.columns[0].numeric.is_none());
        assert!(p.columns[0].min_value.is_none());
        assert_eq!(p.columns[0].distinct_count, 0);
    }

    #[test]
    fn test_prompt_context_contains_structure_and_sample() {
        let p = profile(&sample_table());
        let context = to_prompt_context(&p);
        assert!(context.contains("Arquivo: vendas.csv"));
        assert!(context.contains("Linhas: 5 | Colunas: 2"));
        assert!(context.contains("## Estrutura das colunas"));
        assert!(context.contains("| idade | int | 1 | 3 |"));
        assert!(context.contains("## Amostra (primeiras linhas)"));
        assert!(context.contains("| 20 | Recife |"));
    }

    #[test]
    fn test_format_number_trims_zeros() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(8.2916), "8.2916");
    }
}
