//! JSON input loading: assessments and historical snapshots.

use crate::core::{AssessmentInput, HistoricalSnapshot};
use crate::errors::HealthError;
use crate::history::{InMemoryStore, SnapshotStore};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A file may hold one assessment or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Box<AssessmentInput>),
    Many(Vec<AssessmentInput>),
}

/// Read assessments from a JSON file. A single object is treated as a
/// batch of one.
pub fn read_assessments(path: &Path) -> Result<Vec<AssessmentInput>, HealthError> {
    let contents = fs::read_to_string(path).map_err(|e| HealthError::io(path, e))?;
    let parsed: OneOrMany =
        serde_json::from_str(&contents).map_err(|e| HealthError::parse(path, e.to_string()))?;
    Ok(match parsed {
        OneOrMany::One(input) => vec![*input],
        OneOrMany::Many(inputs) => inputs,
    })
}

/// Load a history file into an in-memory store. A missing file is an empty
/// history, not an error: first runs have nothing to load.
pub fn read_history(path: &Path) -> Result<InMemoryStore, HealthError> {
    if !path.exists() {
        return Ok(InMemoryStore::new());
    }
    let contents = fs::read_to_string(path).map_err(|e| HealthError::io(path, e))?;
    let snapshots: Vec<HistoricalSnapshot> =
        serde_json::from_str(&contents).map_err(|e| HealthError::parse(path, e.to_string()))?;
    let mut store = InMemoryStore::new();
    for snapshot in snapshots {
        store.append_snapshot(snapshot);
    }
    Ok(store)
}

/// Persist a store back to its JSON file.
pub fn write_history(path: &Path, store: &InMemoryStore) -> Result<(), HealthError> {
    let snapshots: Vec<HistoricalSnapshot> = store
        .entity_ids()
        .iter()
        .flat_map(|id| store.get_history(id))
        .collect();
    let json = serde_json::to_string_pretty(&snapshots)
        .map_err(|e| HealthError::parse(path, e.to_string()))?;
    fs::write(path, json).map_err(|e| HealthError::io(path, e))?;
    Ok(())
}
