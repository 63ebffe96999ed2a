//! CSV ingestion with encoding fallback and delimiter sniffing.
//!
//! Bytes are decoded as UTF-8 first; invalid UTF-8 falls back to
//! Windows-1252 (the usual encoding of legacy Brazilian/Excel exports).
//! The field delimiter is sniffed over the first lines before parsing.

use std::path::Path;

use datapapo_core::dataset::table::Table;
use datapapo_types::error::DatasetError;

/// Outcome of decoding raw bytes, noting whether the fallback fired.
pub struct DecodedText {
    pub content: String,
    /// True when UTF-8 decoding failed and Windows-1252 was used instead.
    pub used_fallback: bool,
}

/// Decode file bytes to text, falling back to Windows-1252 on invalid UTF-8.
pub fn decode_bytes(bytes: Vec<u8>) -> DecodedText {
    match String::from_utf8(bytes) {
        Ok(content) => DecodedText {
            content,
            used_fallback: false,
        },
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            DecodedText {
                content: decoded.into_owned(),
                used_fallback: true,
            }
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line.
/// The delimiter that produces the most consistent field count (>1 field)
/// wins; higher field counts break ties.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Result of loading a CSV: the typed table plus decode diagnostics.
#[derive(Debug)]
pub struct LoadedCsv {
    pub table: Table,
    /// True when the Windows-1252 fallback was used.
    pub used_encoding_fallback: bool,
    pub delimiter: u8,
}

/// Load a CSV from raw bytes into a typed table.
///
/// `source` names the upload (file name) and is carried into the profile.
pub fn load_bytes(source: &str, bytes: Vec<u8>) -> Result<LoadedCsv, DatasetError> {
    let decoded = decode_bytes(bytes);
    if decoded.used_fallback {
        tracing::warn!(source, "UTF-8 decoding failed, using Windows-1252 fallback");
    }
    if decoded.content.trim().is_empty() {
        return Err(DatasetError::Empty);
    }

    let delimiter = sniff_delimiter(&decoded.content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(decoded.content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DatasetError::Read(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DatasetError::Parse {
            record: idx + 1,
            message: e.to_string(),
        })?;
        records.push(record.iter().map(|f| f.to_string()).collect());
    }

    let table = Table::from_records(source, headers, records)?;

    Ok(LoadedCsv {
        table,
        used_encoding_fallback: decoded.used_fallback,
        delimiter,
    })
}

/// Load a CSV file from disk into a typed table.
pub fn load_path(path: &Path) -> Result<LoadedCsv, DatasetError> {
    let bytes = std::fs::read(path).map_err(|e| DatasetError::Read(e.to_string()))?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    load_bytes(&source, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datapapo_types::dataset::ColumnType;

    #[test]
    fn test_decode_valid_utf8() {
        let decoded = decode_bytes("idade,cidade\n34,São Paulo\n".as_bytes().to_vec());
        assert!(!decoded.used_fallback);
        assert!(decoded.content.contains("São Paulo"));
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        // "São" in Windows-1252: S=0x53, ã=0xE3, o=0x6F -- invalid as UTF-8.
        let bytes = vec![0x53, 0xE3, 0x6F];
        let decoded = decode_bytes(bytes);
        assert!(decoded.used_fallback);
        assert_eq!(decoded.content, "São");
    }

    #[test]
    fn test_sniff_comma() {
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3\n"), b',');
    }

    #[test]
    fn test_sniff_semicolon() {
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3\n1;2;3\n"), b';');
    }

    #[test]
    fn test_sniff_tab() {
        assert_eq!(sniff_delimiter("a\tb\n1\t2\n"), b'\t');
    }

    #[test]
    fn test_sniff_empty_defaults_to_comma() {
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn test_load_bytes_builds_typed_table() {
        let csv = "idade,cidade\n34,Recife\n51,Natal\n,Recife\n";
        let loaded = load_bytes("clientes.csv", csv.as_bytes().to_vec()).unwrap();

        assert_eq!(loaded.table.row_count(), 3);
        assert_eq!(loaded.table.column_count(), 2);
        assert_eq!(loaded.table.columns()[0].inferred_type(), ColumnType::Int);
        assert_eq!(loaded.table.columns()[0].null_count(), 1);
        assert_eq!(loaded.delimiter, b',');
        assert!(!loaded.used_encoding_fallback);
    }

    #[test]
    fn test_load_bytes_semicolon_with_decimal_comma() {
        let csv = "produto;preco\ncafé;12,50\nleite;4,25\n";
        let loaded = load_bytes("precos.csv", csv.as_bytes().to_vec()).unwrap();

        assert_eq!(loaded.delimiter, b';');
        assert_eq!(loaded.table.columns()[1].inferred_type(), ColumnType::Float);
    }

    #[test]
    fn test_load_bytes_empty_is_error() {
        let err = load_bytes("vazio.csv", b"  \n".to_vec()).unwrap_err();
        assert!(matches!(err, DatasetError::Empty));
    }

    #[test]
    fn test_load_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendas.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let loaded = load_path(&path).unwrap();
        assert_eq!(loaded.table.source(), "vendas.csv");
        assert_eq!(loaded.table.row_count(), 1);
    }

    #[test]
    fn test_load_path_missing_file_is_read_error() {
        let err = load_path(Path::new("/nonexistent/x.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Read(_)));
    }
}
