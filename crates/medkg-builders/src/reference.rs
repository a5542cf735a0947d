//! Reference graph builder: patient records to a ground-truth document.
//!
//! Each record is one patient: a `Disease` column, Yes/No symptom columns and
//! the demographic columns `Age`, `Gender`, `Blood Pressure` and
//! `Cholesterol Level`. A disease is linked to a factor when the share of its
//! patients showing that factor exceeds the configured threshold; the share
//! becomes the link weight. Records arrive as JSON row objects or as CSV
//! with a header row.

use crate::config::{age_group_for, parse_age, ReferenceConfig};
use medkg_core::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, info};

pub const DISEASE_COLUMN: &str = "Disease";
pub const AGE_COLUMN: &str = "Age";
pub const GENDER_COLUMN: &str = "Gender";
pub const BLOOD_PRESSURE_COLUMN: &str = "Blood Pressure";
pub const CHOLESTEROL_COLUMN: &str = "Cholesterol Level";

/// Demographic columns after the age column: (column, node type, relationship, node id suffix).
pub(crate) const CATEGORY_COLUMNS: [(&str, NodeType, Relationship, &str); 3] = [
    (GENDER_COLUMN, NodeType::Gender, Relationship::PrevalentIn, "Gender"),
    (BLOOD_PRESSURE_COLUMN, NodeType::BloodPressure, Relationship::AssociatedWith, "Blood Pressure"),
    (CHOLESTEROL_COLUMN, NodeType::CholesterolLevel, Relationship::CorrelatedWith, "Cholesterol"),
];

/// Node id for a demographic category value, e.g. `High Blood Pressure`.
pub fn category_node_id(value: &str, suffix: &str) -> String {
    format!("{} {}", value, suffix)
}

/// Parse a JSON array of patient records and build the reference document.
pub fn build_reference_from_str(json: &str, config: &ReferenceConfig) -> Result<GraphDocument> {
    let value: Value = serde_json::from_str(json)?;
    let records = match value {
        Value::Array(records) => records,
        _ => return Err(BuildError::InvalidRecords("expected a JSON array of records".into()).into()),
    };
    Ok(build_reference(&records, config)?)
}

/// Read CSV patient records with a header row into row objects; every cell is text.
pub fn read_csv_records<R: std::io::Read>(reader: R) -> std::result::Result<Vec<Value>, BuildError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| BuildError::InvalidRecords(e.to_string()))?
        .clone();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| BuildError::InvalidRecords(e.to_string()))?;
        let record: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(column, cell)| (column.to_string(), Value::String(cell.to_string())))
            .collect();
        records.push(Value::Object(record));
    }
    Ok(records)
}

/// Parse CSV patient records and build the reference document.
pub fn build_reference_from_csv<R: std::io::Read>(reader: R, config: &ReferenceConfig) -> Result<GraphDocument> {
    let records = read_csv_records(reader)?;
    Ok(build_reference(&records, config)?)
}

/// Build the reference document from patient records.
pub fn build_reference(records: &[Value], config: &ReferenceConfig) -> std::result::Result<GraphDocument, BuildError> {
    let rows = records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            record
                .as_object()
                .ok_or_else(|| BuildError::InvalidRecords(format!("record {} is not an object", row)))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut diseases: Vec<String> = Vec::new();
    let mut disease_of_row: Vec<usize> = Vec::with_capacity(rows.len());
    for (row, record) in rows.iter().enumerate() {
        let disease = cell(record, DISEASE_COLUMN).ok_or_else(|| BuildError::MissingColumn {
            row,
            column: DISEASE_COLUMN.to_string(),
        })?;
        let position = match diseases.iter().position(|d| *d == disease) {
            Some(position) => position,
            None => {
                diseases.push(disease);
                diseases.len() - 1
            }
        };
        disease_of_row.push(position);
    }

    let cases: Vec<Vec<&Map<String, Value>>> = (0..diseases.len())
        .map(|d| {
            rows.iter()
                .zip(&disease_of_row)
                .filter(|(_, owner)| **owner == d)
                .map(|(record, _)| *record)
                .collect()
        })
        .collect();

    let mut doc = GraphDocument::default();
    for disease in &diseases {
        doc.add_node(Node::new(disease.clone(), NodeType::Disease));
    }

    // Symptoms: every column gets a node, links only above the threshold.
    for symptom in &config.symptom_columns {
        doc.add_node(Node::new(symptom.clone(), NodeType::Symptom));
        for (disease, patients) in diseases.iter().zip(&cases) {
            let yes = patients
                .iter()
                .filter(|record| record.get(symptom).and_then(Value::as_str) == Some("Yes"))
                .count();
            let share = yes as f64 / patients.len() as f64;
            if share > config.symptom_threshold {
                doc.add_link(LinkRecord::new(disease.clone(), symptom.clone(), Relationship::HasSymptom, share));
            }
        }
    }

    // Age groups: bucket each patient, in first-seen group order per disease.
    for group in &config.age_groups {
        doc.add_node(group.to_node());
    }
    for (disease, patients) in diseases.iter().zip(&cases) {
        let ages = patients.iter().map(|record| {
            record
                .get(AGE_COLUMN)
                .and_then(parse_age)
                .and_then(|a| age_group_for(&config.age_groups, a))
                .map(|g| g.node_id())
        });
        for (group, count) in tally(ages) {
            let share = count as f64 / patients.len() as f64;
            if share > config.demographic_threshold {
                doc.add_link(LinkRecord::new(disease.clone(), group, Relationship::CommonIn, share));
            }
        }
    }

    // Gender, blood pressure and cholesterol: most common category first.
    for (column, node_type, relationship, suffix) in CATEGORY_COLUMNS {
        for record in &rows {
            if let Some(value) = cell(record, column) {
                doc.add_node(Node::new(category_node_id(&value, suffix), node_type));
            }
        }
        for (disease, patients) in diseases.iter().zip(&cases) {
            let mut counts = tally(patients.iter().map(|record| cell(record, column)));
            counts.sort_by(|a, b| b.1.cmp(&a.1));
            for (value, count) in counts {
                let share = count as f64 / patients.len() as f64;
                if share > config.demographic_threshold {
                    doc.add_link(LinkRecord::new(
                        disease.clone(),
                        category_node_id(&value, suffix),
                        relationship,
                        share,
                    ));
                }
            }
        }
        debug!(column, "linked demographic column");
    }

    info!(
        records = rows.len(),
        diseases = diseases.len(),
        nodes = doc.nodes.len(),
        links = doc.links.len(),
        "built reference graph"
    );
    Ok(doc)
}

fn cell(record: &Map<String, Value>, column: &str) -> Option<String> {
    text(record.get(column)?)
}

/// A cell as text; numbers are written out, blanks count as absent.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Count present values, keeping first-seen order.
fn tally(values: impl Iterator<Item = Option<String>>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values.flatten() {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts
}
