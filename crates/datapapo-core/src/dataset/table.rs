//! Column-major typed table built from parsed CSV records.
//!
//! Cells are typed on ingestion: empty fields become nulls, numeric and
//! boolean literals are parsed, everything else stays text. A column's
//! type is the dominant type of its non-null cells.

use std::fmt;

use datapapo_types::dataset::ColumnType;
use datapapo_types::error::DatasetError;

/// A single typed value in a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    /// Parse a raw CSV field into a typed cell.
    ///
    /// Empty or whitespace-only fields are null. Integers are tried before
    /// floats; floats also accept a single decimal comma (common in
    /// Brazilian exports, e.g. "12,5").
    pub fn parse(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Cell::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Cell::Float(f);
        }
        if let Some(f) = parse_decimal_comma(trimmed) {
            return Cell::Float(f);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "true" => return Cell::Bool(true),
            "false" => return Cell::Bool(false),
            _ => {}
        }
        Cell::Text(trimmed.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, ""),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Parse a number written with a decimal comma ("12,5" -> 12.5).
///
/// Only a single comma is accepted; "1,234,5" stays text.
fn parse_decimal_comma(s: &str) -> Option<f64> {
    if s.matches(',').count() != 1 {
        return None;
    }
    let candidate = s.replacen(',', ".", 1);
    // Require at least one digit on each side so ",5" and "5," stay text.
    let (left, right) = candidate.split_once('.')?;
    let left_digits = left.trim_start_matches('-');
    if left_digits.is_empty() || right.is_empty() {
        return None;
    }
    candidate.parse::<f64>().ok()
}

/// A named column of typed cells.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    /// Infer the dominant type of this column.
    ///
    /// All-null columns are text. Any text cell makes the column text.
    /// Ints mixed with floats widen to float. Bools mixed with anything
    /// else fall back to text.
    pub fn inferred_type(&self) -> ColumnType {
        let mut ints = 0usize;
        let mut floats = 0usize;
        let mut bools = 0usize;
        let mut texts = 0usize;
        for cell in &self.cells {
            match cell {
                Cell::Null => {}
                Cell::Int(_) => ints += 1,
                Cell::Float(_) => floats += 1,
                Cell::Bool(_) => bools += 1,
                Cell::Text(_) => texts += 1,
            }
        }
        let non_null = ints + floats + bools + texts;
        if non_null == 0 || texts > 0 {
            return ColumnType::Text;
        }
        if bools > 0 {
            return if bools == non_null {
                ColumnType::Bool
            } else {
                ColumnType::Text
            };
        }
        if floats > 0 { ColumnType::Float } else { ColumnType::Int }
    }

    /// Count of null cells.
    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }
}

/// An immutable, column-major typed table.
///
/// Replacing the dataset is a whole-object swap on the session; the table
/// itself is never mutated after construction.
#[derive(Debug, Clone)]
pub struct Table {
    source: String,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a typed table from a header row and string records.
    ///
    /// Header names are deduplicated with numeric suffixes. Short records
    /// are padded with nulls; long records are truncated to the header
    /// width.
    pub fn from_records(
        source: impl Into<String>,
        headers: Vec<String>,
        records: Vec<Vec<String>>,
    ) -> Result<Table, DatasetError> {
        if headers.is_empty() {
            return Err(DatasetError::Empty);
        }

        let names = dedup_headers(headers);
        let width = names.len();
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column {
                name,
                cells: Vec::with_capacity(records.len()),
            })
            .collect();

        for record in &records {
            for (idx, column) in columns.iter_mut().enumerate().take(width) {
                let cell = record.get(idx).map(|raw| Cell::parse(raw)).unwrap_or(Cell::Null);
                column.cells.push(cell);
            }
        }

        Ok(Table {
            source: source.into(),
            row_count: records.len(),
            columns,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The first `n` rows as display strings, row-major.
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        let rows = n.min(self.row_count);
        (0..rows)
            .map(|r| self.columns.iter().map(|c| c.cells[r].to_string()).collect())
            .collect()
    }

    /// One full row as display strings.
    pub fn row(&self, index: usize) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.cells[index].to_string())
            .collect()
    }
}

/// Deduplicate header names by appending "_2", "_3", ... to repeats.
///
/// Blank headers become "coluna_{n}" (1-based position).
fn dedup_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| {
            let base = {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    format!("coluna_{}", idx + 1)
                } else {
                    trimmed.to_string()
                }
            };
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{base}_{count}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cell_parse_types() {
        assert_eq!(Cell::parse(""), Cell::Null);
        assert_eq!(Cell::parse("   "), Cell::Null);
        assert_eq!(Cell::parse("42"), Cell::Int(42));
        assert_eq!(Cell::parse("-7"), Cell::Int(-7));
        assert_eq!(Cell::parse("3.25"), Cell::Float(3.25));
        assert_eq!(Cell::parse("12,5"), Cell::Float(12.5));
        assert_eq!(Cell::parse("TRUE"), Cell::Bool(true));
        assert_eq!(Cell::parse("false"), Cell::Bool(false));
        assert_eq!(Cell::parse("Recife"), Cell::Text("Recife".to_string()));
    }

    #[test]
    fn test_cell_parse_decimal_comma_edge_cases() {
        // Thousands-style values with multiple commas stay text.
        assert_eq!(Cell::parse("1,234,5"), Cell::Text("1,234,5".to_string()));
        assert_eq!(Cell::parse(",5"), Cell::Text(",5".to_string()));
        assert_eq!(Cell::parse("5,"), Cell::Text("5,".to_string()));
        assert_eq!(Cell::parse("-2,75"), Cell::Float(-2.75));
    }

    #[test]
    fn test_cell_as_f64() {
        assert_eq!(Cell::Int(4).as_f64(), Some(4.0));
        assert_eq!(Cell::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Cell::Text("x".to_string()).as_f64(), None);
        assert_eq!(Cell::Null.as_f64(), None);
    }

    #[test]
    fn test_column_type_inference() {
        let ints = Column {
            name: "a".to_string(),
            cells: vec![Cell::Int(1), Cell::Null, Cell::Int(2)],
        };
        assert_eq!(ints.inferred_type(), ColumnType::Int);

        let widened = Column {
            name: "b".to_string(),
            cells: vec![Cell::Int(1), Cell::Float(2.5)],
        };
        assert_eq!(widened.inferred_type(), ColumnType::Float);

        let mixed = Column {
            name: "c".to_string(),
            cells: vec![Cell::Int(1), Cell::Text("x".to_string())],
        };
        assert_eq!(mixed.inferred_type(), ColumnType::Text);

        let all_null = Column {
            name: "d".to_string(),
            cells: vec![Cell::Null, Cell::Null],
        };
        assert_eq!(all_null.inferred_type(), ColumnType::Text);

        let bools = Column {
            name: "e".to_string(),
            cells: vec![Cell::Bool(true), Cell::Bool(false)],
        };
        assert_eq!(bools.inferred_type(), ColumnType::Bool);
    }

    #[test]
    fn test_from_records_pads_and_truncates() {
        let table = Table::from_records(
            "t.csv",
            to_strings(&["a", "b"]),
            vec![
                to_strings(&["1"]),
                to_strings(&["2", "x", "extra"]),
            ],
        )
        .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        // Short row padded with null
        assert!(table.columns()[1].cells[0].is_null());
        // Long row truncated
        assert_eq!(table.columns()[1].cells[1], Cell::Text("x".to_string()));
    }

    #[test]
    fn test_from_records_empty_headers_is_error() {
        let err = Table::from_records("t.csv", vec![], vec![]).unwrap_err();
        assert!(matches!(err, DatasetError::Empty));
    }

    #[test]
    fn test_header_only_table() {
        let table = Table::from_records("t.csv", to_strings(&["a", "b"]), vec![]).unwrap();
        assert_eq!(table.row_count(), 0);
        assert!(table.head(5).is_empty());
    }

    #[test]
    fn test_dedup_headers() {
        let names = dedup_headers(to_strings(&["id", "valor", "id", "", "id"]));
        assert_eq!(names, vec!["id", "valor", "id_2", "coluna_4", "id_3"]);
    }

    #[test]
    fn test_head_renders_display_strings() {
        let table = Table::from_records(
            "t.csv",
            to_strings(&["idade", "cidade"]),
            vec![to_strings(&["34", "Recife"]), to_strings(&["", "Natal"])],
        )
        .unwrap();
        let head = table.head(10);
        assert_eq!(head.len(), 2);
        assert_eq!(head[0], vec!["34", "Recife"]);
        assert_eq!(head[1], vec!["", "Natal"]);
    }
}
