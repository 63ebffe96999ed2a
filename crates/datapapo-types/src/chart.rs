//! Chart specification types for Datapapo.
//!
//! The analysis agent cannot draw: instead it emits a declarative
//! [`ChartSpec`] inside a fenced ```chart block. Front-ends render the
//! spec themselves (glyph chart in the terminal, JSON passthrough over
//! HTTP). The spec is deliberately small -- four chart kinds, one
//! category axis, one or more numeric series.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of chart the agent is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    Histogram,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Line => write!(f, "line"),
            ChartKind::Scatter => write!(f, "scatter"),
            ChartKind::Histogram => write!(f, "histogram"),
        }
    }
}

/// One named numeric series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// A declarative chart produced by the analysis agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    /// Category labels along the x axis, aligned with series values.
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartSpec {
    /// Whether the spec is internally consistent enough to render:
    /// at least one series, and every series aligned with the categories.
    pub fn is_renderable(&self) -> bool {
        !self.series.is_empty()
            && !self.categories.is_empty()
            && self
                .series
                .iter()
                .all(|s| s.values.len() == self.categories.len())
    }
}
