//! Reading and writing graph documents, record files and vocabulary files.

use crate::reference::read_csv_records;
use crate::vocabulary::Vocabulary;
use medkg_core::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Load a graph document without validating it as a graph.
pub fn read_document(path: &Path, role: GraphRole) -> Result<GraphDocument> {
    let json = std::fs::read_to_string(path)?;
    Ok(GraphDocument::from_json_str(role, &json)?)
}

/// Load and validate a graph.
pub fn read_graph(path: &Path, role: GraphRole) -> Result<KnowledgeGraph> {
    let doc = read_document(path, role)?;
    let graph = KnowledgeGraph::from_document(role, &doc)?;
    debug!(path = %path.display(), nodes = graph.node_count(), links = graph.link_count(), "read graph");
    Ok(graph)
}

pub fn write_document(path: &Path, doc: &GraphDocument) -> Result<()> {
    write_json(path, doc)
}

/// Patient records from a `.csv` file with a header row, or a JSON array of row objects.
pub fn read_records(path: &Path) -> Result<Vec<Value>> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        let records = read_csv_records(std::fs::File::open(path)?)?;
        debug!(path = %path.display(), records = records.len(), "read csv records");
        return Ok(records);
    }
    match read_json(path)? {
        Value::Array(records) => Ok(records),
        _ => Err(BuildError::InvalidRecords("expected a JSON array of records".into()).into()),
    }
}

/// Any JSON file, e.g. patient records or a model answer.
pub fn read_json(path: &Path) -> Result<Value> {
    read_json_as(path)
}

pub fn read_json_as<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Pretty-print a value to a file, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)
}

/// Read a vocabulary file; a missing file gives the default vocabulary.
pub fn read_vocabulary(path: &Path) -> Result<Vocabulary> {
    if !path.exists() {
        debug!(path = %path.display(), "no vocabulary file, using key symptoms");
        return Ok(Vocabulary::default());
    }
    Ok(Vocabulary::parse(&std::fs::read_to_string(path)?))
}

/// Write a vocabulary file, keeping the previous contents next to it as
/// `<file>.backup`.
pub fn write_vocabulary(path: &Path, vocabulary: &Vocabulary) -> Result<()> {
    if path.exists() {
        let mut backup = path.as_os_str().to_owned();
        backup.push(".backup");
        std::fs::copy(path, &backup)?;
    }
    write_text(path, &vocabulary.render())
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, text)?;
    Ok(())
}
