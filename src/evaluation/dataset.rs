//! CSV datasets of generated test questions.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const DEFAULT_DATASET_DIR: &str = "generated_questions";
pub const ROUTER_FUNCTIONS_FILE: &str = "test_router_functions.csv";
pub const ROUTER_PARAMETERS_FILE: &str = "test_router_parameters.csv";
pub const HARD_QUESTIONS_FILE: &str = "test_hard_agent_questions.csv";

/// A question and the tool the router should pick for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterFunctionCase {
    pub expected_output: String,
    pub question: String,
}

/// A question and the arguments the router should extract, stored as a JSON string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterParameterCase {
    pub question: String,
    pub parameters: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardQuestion {
    pub questions: String,
}

/// Read every row of a headed CSV file
pub fn read_csv<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write `rows` with a header line, creating parent directories as needed
pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Wrote dataset");
    Ok(())
}
