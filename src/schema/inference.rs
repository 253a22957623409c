//! Label keyword table for `exactly 1` fields.
//!
//! A target class restricted to exactly one value is rendered as a single
//! input; its datatype is guessed from words in the class label. The guess is
//! a heuristic over label text and carries no semantic guarantee: unmatched
//! labels fall back to the configured default datatype.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ontology::{
    value_objects::{Iri, Language},
    vocab::xsd,
};

/// Maps a label substring to a datatype.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Case-insensitive substring searched for in the label.
    pub contains: String,
    pub datatype: Iri,
}

impl KeywordRule {
    #[must_use]
    pub fn new(contains: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Self {
            contains: contains.into(),
            datatype: datatype.into(),
        }
    }

    fn matches(&self, lowered_label: &str) -> bool {
        !self.contains.is_empty() && lowered_label.contains(&self.contains.to_lowercase())
    }
}

/// Returns the datatype of the first rule whose keyword occurs in `label`.
#[must_use]
pub fn infer_datatype(rules: &[KeywordRule], label: &str, default: &Iri) -> Iri {
    let lowered = label.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map_or_else(|| default.clone(), |rule| rule.datatype.clone())
}

/// Built-in tables. Time words are listed before date words so that
/// "data e horário" resolves to a time.
#[must_use]
pub fn default_keywords() -> BTreeMap<Language, Vec<KeywordRule>> {
    BTreeMap::from([
        (
            Language::Pt,
            vec![
                KeywordRule::new("horário", xsd::TIME),
                KeywordRule::new("time", xsd::TIME),
                KeywordRule::new("data", xsd::DATE),
                KeywordRule::new("date", xsd::DATE),
            ],
        ),
        (
            Language::En,
            vec![
                KeywordRule::new("time", xsd::TIME),
                KeywordRule::new("date", xsd::DATE),
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{default_keywords, infer_datatype, KeywordRule};
    use crate::ontology::{
        value_objects::{Iri, Language},
        vocab::xsd,
    };

    #[rstest]
    #[case(Language::En, "meeting date", xsd::DATE.as_str())]
    #[case(Language::En, "meeting time", xsd::TIME.as_str())]
    #[case(Language::En, "Meeting Date", xsd::DATE.as_str())]
    #[case(Language::En, "meeting venue", xsd::STRING.as_str())]
    #[case(Language::Pt, "data da reunião", xsd::DATE.as_str())]
    #[case(Language::Pt, "horário da reunião", xsd::TIME.as_str())]
    #[case(Language::Pt, "local da reunião", xsd::STRING.as_str())]
    fn infers_from_label_keywords(
        #[case] language: Language,
        #[case] label: &str,
        #[case] expected: &str,
    ) {
        let table = default_keywords();
        let rules = table.get(&language).expect("table for language");
        let inferred = infer_datatype(rules, label, &Iri::from(xsd::STRING));
        assert_eq!(inferred.as_str(), expected);
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = vec![
            KeywordRule::new("time", xsd::TIME),
            KeywordRule::new("date", xsd::DATE),
        ];
        let inferred = infer_datatype(&rules, "date and time", &Iri::from(xsd::STRING));
        assert_eq!(inferred.as_str(), xsd::TIME.as_str());
    }

    #[test]
    fn empty_keywords_never_match() {
        let rules = vec![KeywordRule::new("", xsd::DATE)];
        let inferred = infer_datatype(&rules, "anything", &Iri::from(xsd::STRING));
        assert_eq!(inferred.as_str(), xsd::STRING.as_str());
    }
}
