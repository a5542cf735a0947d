//! Prediction graph builder: one model answer to a prediction document.
//!
//! The model answers with `{"result": [{...}]}`; the first entry names the
//! disease under `predicted disease`, gives Yes/No symptom keys and the
//! patient's demographics. Symptom keys missing from the vocabulary are
//! flagged novel on both the node and the link.

use crate::config::{age_group_for, parse_age, AgeGroup};
use crate::reference::{category_node_id, text, AGE_COLUMN, CATEGORY_COLUMNS};
use crate::vocabulary::Vocabulary;
use medkg_core::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

pub const DISEASE_KEY: &str = "predicted disease";

/// Parse a model answer and build its prediction document.
pub fn build_prediction_from_str(
    json: &str,
    vocabulary: &Vocabulary,
    age_groups: &[AgeGroup],
) -> Result<GraphDocument> {
    let value: Value = serde_json::from_str(json)?;
    Ok(build_prediction(&value, vocabulary, age_groups)?)
}

/// Build the prediction document from a decoded model answer.
pub fn build_prediction(
    answer: &Value,
    vocabulary: &Vocabulary,
    age_groups: &[AgeGroup],
) -> std::result::Result<GraphDocument, BuildError> {
    let record = answer
        .get("result")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .ok_or_else(|| {
            BuildError::InvalidPrediction("expected a 'result' array with at least one item".into())
        })?
        .as_object()
        .ok_or_else(|| BuildError::InvalidPrediction("result item is not an object".into()))?;

    let disease = record
        .get(DISEASE_KEY)
        .and_then(text)
        .ok_or(BuildError::MissingDisease)?;

    let mut doc = GraphDocument::default();
    doc.add_node(Node::new(disease.clone(), NodeType::Disease));

    let demographic = |key: &str| key == AGE_COLUMN || CATEGORY_COLUMNS.iter().any(|c| c.0 == key);
    for (key, value) in record {
        if key == DISEASE_KEY || *key == disease || demographic(key.as_str()) {
            continue;
        }
        let Some(present) = value.as_str().and_then(yes_no) else {
            continue;
        };
        let is_novel = !vocabulary.is_known_symptom(key);
        if is_novel {
            debug!(symptom = key.as_str(), "symptom outside the vocabulary");
        }
        let relationship = if present {
            Relationship::HasSymptom
        } else {
            Relationship::DoesNotHaveSymptom
        };
        doc.add_node(Node::new(key.clone(), NodeType::Symptom).with_novel(is_novel));
        doc.add_link(LinkRecord::new(disease.clone(), key.clone(), relationship, 1.0).with_novel(is_novel));
    }

    if let Some(group) = record.get(AGE_COLUMN).and_then(parse_age).and_then(|age| age_group_for(age_groups, age)) {
        doc.add_node(group.to_node());
        doc.add_link(LinkRecord::new(disease.clone(), group.node_id(), Relationship::CommonIn, 1.0));
    }

    for (column, node_type, relationship, suffix) in CATEGORY_COLUMNS {
        if let Some(value) = record.get(column).and_then(text) {
            let id = category_node_id(&value, suffix);
            doc.add_node(Node::new(id.clone(), node_type));
            doc.add_link(LinkRecord::new(disease.clone(), id, relationship, 1.0));
        }
    }

    info!(
        disease = disease.as_str(),
        nodes = doc.nodes.len(),
        links = doc.links.len(),
        novel = doc.nodes.iter().filter(|n| n.is_novel).count(),
        "built prediction graph"
    );
    Ok(doc)
}

fn yes_no(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_age_groups;
    use serde_json::json;

    fn answer() -> Value {
        json!({"result": [{
            "predicted disease": "Eczema",
            "Fever": "No",
            "Fatigue": "yes",
            "Tingling": "Yes",
            "Age": "41",
            "Gender": "Female",
            "Blood Pressure": "Normal",
            "Cholesterol Level": "High",
            "Notes": "itchy skin"
        }]})
    }

    fn link<'a>(doc: &'a GraphDocument, target: &str) -> &'a LinkRecord {
        doc.links.iter().find(|l| l.target.id() == target).unwrap()
    }

    #[test]
    fn builds_symptoms_and_demographics() {
        let doc = build_prediction(&answer(), &Vocabulary::default(), &default_age_groups()).unwrap();

        assert_eq!(doc.nodes[0].id, "Eczema");
        assert_eq!(link(&doc, "Fever").relationship, Relationship::DoesNotHaveSymptom);
        assert_eq!(link(&doc, "Fatigue").relationship, Relationship::HasSymptom);
        assert_eq!(link(&doc, "Middle Aged Age").relationship, Relationship::CommonIn);
        assert_eq!(link(&doc, "Female Gender").relationship, Relationship::PrevalentIn);
        assert_eq!(link(&doc, "Normal Blood Pressure").relationship, Relationship::AssociatedWith);
        assert_eq!(link(&doc, "High Cholesterol").relationship, Relationship::CorrelatedWith);
        assert!(doc.links.iter().all(|l| l.weight == Some(1.0)));
        assert!(!doc.contains_node("Notes"), "free-text keys are not symptoms");
    }

    #[test]
    fn unknown_symptoms_are_novel() {
        let doc = build_prediction(&answer(), &Vocabulary::default(), &default_age_groups()).unwrap();
        assert!(doc.node("Tingling").unwrap().is_novel);
        assert!(link(&doc, "Tingling").is_novel);
        assert!(!doc.node("Fatigue").unwrap().is_novel);
        assert!(!link(&doc, "Fever").is_novel);
    }

    #[test]
    fn ages_are_grouped_in_whole_years() {
        let groups = default_age_groups();
        let age_link = |age: Value| {
            let answer = json!({"result": [{"predicted disease": "Flu", "Age": age}]});
            let doc = build_prediction(&answer, &Vocabulary::default(), &groups).unwrap();
            doc.links
                .iter()
                .find(|l| l.relationship == Relationship::CommonIn)
                .map(|l| l.target.id().to_string())
        };
        assert_eq!(age_link(json!(17.5)).as_deref(), Some("Child Age"));
        assert_eq!(age_link(json!("34.9")).as_deref(), Some("Young Adult Age"));
        assert_eq!(age_link(json!(150)).as_deref(), Some("Senior Age"));
        assert_eq!(age_link(json!("-4")), None);
        assert_eq!(age_link(json!("forty")), None);
    }

    #[test]
    fn key_naming_the_disease_is_not_a_symptom() {
        let answer = json!({"result": [{"predicted disease": "Flu", "Flu": "Yes", "Fever": "Yes"}]});
        let doc = build_prediction(&answer, &Vocabulary::default(), &default_age_groups()).unwrap();

        assert_eq!(doc.nodes.iter().filter(|n| n.id == "Flu").count(), 1);
        assert_eq!(doc.node("Flu").unwrap().node_type, NodeType::Disease);
        assert!(doc.links.iter().all(|l| l.target.id() != "Flu"));
        KnowledgeGraph::from_document(GraphRole::Prediction, &doc).unwrap();
    }

    #[test]
    fn symptoms_keep_the_answer_order() {
        let answer = json!({"result": [{
            "predicted disease": "Flu",
            "Fever": "Yes",
            "Cough": "No",
            "Body Aches": "Yes"
        }]});
        let doc = build_prediction(&answer, &Vocabulary::default(), &default_age_groups()).unwrap();
        let targets: Vec<&str> = doc.links.iter().map(|l| l.target.id()).collect();
        assert_eq!(targets, vec!["Fever", "Cough", "Body Aches"]);
    }

    #[test]
    fn rejects_answers_without_a_disease() {
        let err = build_prediction(&json!({"result": []}), &Vocabulary::default(), &default_age_groups());
        assert!(matches!(err, Err(BuildError::InvalidPrediction(_))));

        let err = build_prediction(&json!({"result": [{"Fever": "Yes"}]}), &Vocabulary::default(), &default_age_groups());
        assert_eq!(err.unwrap_err(), BuildError::MissingDisease);
    }

    #[test]
    fn output_loads_as_prediction() {
        let doc = build_prediction(&answer(), &Vocabulary::default(), &default_age_groups()).unwrap();
        let graph = KnowledgeGraph::from_document(GraphRole::Prediction, &doc).unwrap();
        assert_eq!(graph.disease_ids(), vec!["Eczema"]);
        assert_eq!(graph.outgoing("Eczema").len(), 7);
    }
}
