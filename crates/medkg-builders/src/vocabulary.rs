//! The known-vocabulary text file.
//!
//! One `Section: a, b, c` line per section. Lines that do not start a known
//! section continue the previous one. The symptom list decides which keys of
//! a prediction record are known symptoms and which are novel.

use medkg_core::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// A section of the vocabulary file, in the order it is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Diseases,
    Symptoms,
    AgeGroups,
    Gender,
    BloodPressure,
    CholesterolLevel,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Diseases,
        Section::Symptoms,
        Section::AgeGroups,
        Section::Gender,
        Section::BloodPressure,
        Section::CholesterolLevel,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Section::Diseases => "Diseases",
            Section::Symptoms => "Symptoms",
            Section::AgeGroups => "Age Groups",
            Section::Gender => "Gender",
            Section::BloodPressure => "Blood Pressure",
            Section::CholesterolLevel => "Cholesterol Level",
        }
    }

    pub fn from_header(header: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.header() == header.trim())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Parsed vocabulary: the entries of each section present in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    sections: BTreeMap<Section, Vec<String>>,
}

impl Default for Vocabulary {
    /// Only the key symptoms are known.
    fn default() -> Self {
        let mut sections = BTreeMap::new();
        sections.insert(
            Section::Symptoms,
            DEFAULT_KEY_SYMPTOMS.iter().map(|s| s.to_string()).collect(),
        );
        Self { sections }
    }
}

impl Vocabulary {
    /// A vocabulary with no sections at all.
    pub fn empty() -> Self {
        Self {
            sections: BTreeMap::new(),
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut sections: BTreeMap<Section, Vec<String>> = BTreeMap::new();
        let mut current = None;

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let header = line
                .split_once(':')
                .and_then(|(head, rest)| Some((Section::from_header(head)?, rest)));
            let content = match header {
                Some((section, rest)) => {
                    current = Some(section);
                    sections.entry(section).or_default().clear();
                    rest
                }
                None if current.is_some() => line,
                None => {
                    debug!(line, "skipping vocabulary line outside any section");
                    continue;
                }
            };
            if let Some(section) = current {
                sections
                    .entry(section)
                    .or_default()
                    .extend(split_entries(content));
            }
        }

        Self { sections }
    }

    /// Render back to file form, sections in canonical order.
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|(section, entries)| format!("{}: {}\n", section, entries.join(", ")))
            .collect()
    }

    pub fn entries(&self, section: Section) -> &[String] {
        self.sections.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn diseases(&self) -> &[String] {
        self.entries(Section::Diseases)
    }

    /// Symptoms listed in the file, exactly as written.
    pub fn symptoms(&self) -> &[String] {
        self.entries(Section::Symptoms)
    }

    /// Symptoms treated as known; the key symptoms when the file lists none.
    pub fn known_symptoms(&self) -> Vec<&str> {
        let listed = self.symptoms();
        if listed.is_empty() {
            DEFAULT_KEY_SYMPTOMS.to_vec()
        } else {
            listed.iter().map(String::as_str).collect()
        }
    }

    pub fn is_known_symptom(&self, name: &str) -> bool {
        self.known_symptoms().contains(&name)
    }

    pub fn set_diseases(&mut self, diseases: impl IntoIterator<Item = impl Into<String>>) {
        self.set(Section::Diseases, diseases);
    }

    pub fn set_symptoms(&mut self, symptoms: impl IntoIterator<Item = impl Into<String>>) {
        self.set(Section::Symptoms, symptoms);
    }

    /// Replace the disease and symptom lists with the graph's.
    pub fn sync(&mut self, graph: &KnowledgeGraph) {
        self.set_diseases(graph.disease_ids());
        self.set_symptoms(graph.symptom_ids());
        debug!(
            diseases = self.diseases().len(),
            symptoms = self.symptoms().len(),
            "vocabulary synced from graph"
        );
    }

    fn set(&mut self, section: Section, entries: impl IntoIterator<Item = impl Into<String>>) {
        let mut entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        entries.sort();
        entries.dedup();
        self.sections.insert(section, entries);
    }
}

fn split_entries(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "\
Diseases: Flu, Asthma
Symptoms: Fever, Cough,
  Fatigue
Age Groups: Child, Senior
Cholesterol Level: Normal, High
";

    #[test]
    fn parses_sections_and_continuations() {
        let vocab = Vocabulary::parse(FILE);
        assert_eq!(vocab.diseases(), ["Flu", "Asthma"]);
        assert_eq!(vocab.symptoms(), ["Fever", "Cough", "Fatigue"]);
        assert_eq!(vocab.entries(Section::AgeGroups), ["Child", "Senior"]);
        assert!(vocab.entries(Section::Gender).is_empty());
        assert!(vocab.is_known_symptom("Fatigue"));
        assert!(!vocab.is_known_symptom("Difficulty Breathing"));
    }

    #[test]
    fn missing_symptoms_fall_back_to_key_symptoms() {
        let vocab = Vocabulary::parse("Diseases: Flu\n");
        assert!(vocab.symptoms().is_empty());
        assert!(vocab.is_known_symptom("Difficulty Breathing"));
        assert!(!vocab.is_known_symptom("Tingling"));
        assert_eq!(Vocabulary::default().known_symptoms(), DEFAULT_KEY_SYMPTOMS.to_vec());
    }

    #[test]
    fn replaced_lists_are_sorted() {
        let mut vocab = Vocabulary::parse(FILE);
        vocab.set_symptoms(["Rash", "Cough", "Rash"]);
        assert_eq!(vocab.symptoms(), ["Cough", "Rash"]);

        let rendered = vocab.render();
        assert_eq!(
            rendered,
            "Diseases: Flu, Asthma\nSymptoms: Cough, Rash\nAge Groups: Child, Senior\nCholesterol Level: Normal, High\n"
        );
        assert_eq!(Vocabulary::parse(&rendered), vocab);
    }
}
