use serde::{Deserialize, Serialize};

/// Table-level settings from the `[table]` section of table.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    /// Payload columns to show, in order. If empty, `gt show` uses every
    /// payload key it finds, in first-seen order.
    #[serde(default)]
    pub columns: Vec<String>,
}

/// Order-key maintenance settings from the `[order]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfig {
    /// `gt check` warns when adjacent keys are closer than this. Default 1e-9.
    #[serde(default = "default_min_gap")]
    pub min_gap: f64,
    /// Spacing between keys after `gt normalize`. Default 1.0.
    #[serde(default = "default_normalize_step")]
    pub normalize_step: f64,
}

impl Default for OrderConfig {
    fn default() -> Self {
        OrderConfig {
            min_gap: default_min_gap(),
            normalize_step: default_normalize_step(),
        }
    }
}

/// Adjacent keys closer than this have lost most of their midpoint headroom.
fn default_min_gap() -> f64 {
    1e-9
}

fn default_normalize_step() -> f64 {
    1.0
}
