//! Chart block extraction from assistant replies.
//!
//! The analysis protocol instructs the model to emit at most one fenced
//! ```chart block containing a JSON [`ChartSpec`]. This module pulls that
//! block out of the reply text so front-ends can render the chart and show
//! the prose without the raw JSON.
//!
//! Malformed or unrenderable specs degrade to text-only: the reply is
//! returned untouched and a warning is logged.

use tracing::warn;

use datapapo_types::chart::ChartSpec;

/// Extract a chart spec from a reply, returning the display text and the
/// parsed chart.
///
/// Only the first ```chart block is considered. When the block parses into
/// a renderable [`ChartSpec`], the block is stripped from the text;
/// otherwise the text is returned unchanged and `None` is returned.
pub fn extract_chart(text: &str) -> (String, Option<ChartSpec>) {
    let Some(block) = find_chart_block(text) else {
        return (text.to_string(), None);
    };

    match serde_json::from_str::<ChartSpec>(&block.json) {
        Ok(spec) if spec.is_renderable() => {
            let stripped = strip_range(text, block.start, block.end);
            (stripped, Some(spec))
        }
        Ok(_) => {
            warn!("chart block has misaligned categories/series, keeping text as-is");
            (text.to_string(), None)
        }
        Err(e) => {
            warn!(error = %e, "chart block is not valid JSON, keeping text as-is");
            (text.to_string(), None)
        }
    }
}

struct ChartBlock {
    /// Byte offset of the opening fence line.
    start: usize,
    /// Byte offset one past the closing fence line (including its newline).
    end: usize,
    json: String,
}

fn find_chart_block(text: &str) -> Option<ChartBlock> {
    let mut offset = 0;
    let mut open: Option<(usize, usize)> = None; // (fence start, content start)
    let mut json = String::new();

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end();
        match open {
            None => {
                if trimmed.trim() == "```chart" {
                    open = Some((offset, offset + line.len()));
                }
            }
            Some((start, _)) => {
                if trimmed.trim() == "```" {
                    return Some(ChartBlock {
                        start,
                        end: offset + line.len(),
                        json,
                    });
                }
                json.push_str(line);
            }
        }
        offset += line.len();
    }

    // Unclosed block at end of text: treat everything after the fence as JSON.
    if let Some((start, _)) = open {
        if !json.trim().is_empty() {
            return Some(ChartBlock {
                start,
                end: text.len(),
                json,
            });
        }
    }
    None
}

/// Remove a byte range and collapse the blank lines it leaves behind.
fn strip_range(text: &str, start: usize, end: usize) -> String {
    let mut result = String::with_capacity(text.len());
    result.push_str(&text[..start]);
    result.push_str(&text[end..]);

    // Collapse 3+ consecutive newlines introduced by the removal.
    let mut collapsed = String::with_capacity(result.len());
    let mut newlines = 0;
    for ch in result.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                collapsed.push(ch);
            }
        } else {
            newlines = 0;
            collapsed.push(ch);
        }
    }
    collapsed.trim_end().to_string()
}
