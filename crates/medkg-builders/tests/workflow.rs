//! Build, edit and audit through files, the way the CLI drives the builders.

use medkg_builders::prelude::*;
use serde_json::{json, Value};

fn records() -> Value {
    json!([
        {"Disease": "Eczema", "Fever": "No", "Itching": "Yes", "Age": 22, "Gender": "Female"},
        {"Disease": "Eczema", "Fever": "No", "Itching": "Yes", "Age": 27, "Gender": "Female"},
        {"Disease": "Flu", "Fever": "Yes", "Itching": "No", "Age": 64, "Gender": "Male"},
        {"Disease": "Flu", "Fever": "Yes", "Itching": "No", "Age": 70, "Gender": "Female"}
    ])
}

fn reference_config() -> ReferenceConfig {
    ReferenceConfig {
        symptom_columns: vec!["Fever".into(), "Itching".into()],
        ..Default::default()
    }
}

#[test]
fn unknown_symptom_is_audited_as_novel() {
    let dir = tempfile::tempdir().unwrap();
    let records_path = dir.path().join("records.json");
    let graph_path = dir.path().join("out").join("knowledge_graph.json");
    let vocab_path = dir.path().join("info.txt");

    write_json(&records_path, &records()).unwrap();
    let records = read_json(&records_path).unwrap();
    let reference = build_reference(records.as_array().unwrap(), &reference_config()).unwrap();
    write_document(&graph_path, &reference).unwrap();

    // Known symptoms come from the reference graph.
    let graph = read_graph(&graph_path, GraphRole::GroundTruth).unwrap();
    let mut vocabulary = read_vocabulary(&vocab_path).unwrap();
    vocabulary.sync(&graph);
    write_vocabulary(&vocab_path, &vocabulary).unwrap();
    assert_eq!(
        std::fs::read_to_string(&vocab_path).unwrap(),
        "Diseases: Eczema, Flu\nSymptoms: Fever, Itching\n"
    );

    let answer = json!({"result": [{
        "predicted disease": "Eczema",
        "Itching": "Yes",
        "Tingling": "Yes",
        "Age": "24",
        "Gender": "Female"
    }]});
    let vocabulary = read_vocabulary(&vocab_path).unwrap();
    let reference = read_document(&graph_path, GraphRole::GroundTruth).unwrap();
    let report = audit(&reference, &answer, &vocabulary, &AuditConfig::default()).unwrap();

    let paths = &report.bundle.reasoning_paths;
    assert_eq!(paths.novel_reasoning.len(), 1);
    assert_eq!(paths.novel_reasoning[0].factor, "Tingling");
    assert!(paths.invalid_reasoning.is_empty(), "{:?}", paths.invalid_reasoning);
    assert_eq!(paths.reasoning_accuracy, 1.0, "novel factors stay out of accuracy");
    assert_eq!(report.bundle.explanations.assessment, Some(Assessment::StrongMatch));

    let novel: Vec<&str> = report
        .bundle
        .semantic_comparison
        .novel_factors
        .iter()
        .map(|f| f.factor.as_str())
        .collect();
    assert_eq!(novel, vec!["Tingling"]);
}

#[test]
fn absence_claims_are_checked_against_frequencies() {
    let reference = build_reference(records().as_array().unwrap(), &reference_config()).unwrap();
    let answer = json!({"result": [{"predicted disease": "Flu", "Fever": "No"}]});
    let report = audit(&reference, &answer, &Vocabulary::default(), &AuditConfig::default()).unwrap();

    let paths = &report.bundle.reasoning_paths;
    assert_eq!(paths.invalid_reasoning.len(), 1);
    assert_eq!(paths.invalid_reasoning[0].factor, "Fever");
    assert_eq!(paths.reasoning_accuracy, 0.0);
}

#[test]
fn edited_graph_is_audited_with_new_links() {
    let dir = tempfile::tempdir().unwrap();
    let graph_path = dir.path().join("knowledge_graph.json");
    let reference = build_reference(records().as_array().unwrap(), &reference_config()).unwrap();
    write_document(&graph_path, &reference).unwrap();

    let mut doc = read_document(&graph_path, GraphRole::GroundTruth).unwrap();
    GraphEdit::add(
        "Shingles",
        vec![
            ConnectionSpec::new("Tingling", Relationship::HasSymptom).with_weight(0.8),
            ConnectionSpec::new("Itching", Relationship::HasSymptom),
        ],
    )
    .apply(&mut doc)
    .unwrap();
    write_document(&graph_path, &doc).unwrap();

    let graph = read_graph(&graph_path, GraphRole::GroundTruth).unwrap();
    assert_eq!(graph.disease_ids(), vec!["Eczema", "Flu", "Shingles"]);
    assert_eq!(graph.custom_symptom_ids(), vec!["Tingling"]);

    let mut vocabulary = Vocabulary::empty();
    vocabulary.sync(&graph);
    assert!(vocabulary.is_known_symptom("Tingling"));

    let answer = json!({"result": [{"predicted disease": "Shingles", "Tingling": "Yes", "Itching": "Yes"}]});
    let report = audit(&doc, &answer, &vocabulary, &AuditConfig::default()).unwrap();
    let paths = &report.bundle.reasoning_paths;
    assert_eq!(paths.valid_reasoning.len(), 2);
    assert!(paths.novel_reasoning.is_empty());
}
