use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use oxrdf::{NamedNode, NamedNodeRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Value object ensuring that supplied text represents a valid IRI.
///
/// Wraps an [`oxrdf::NamedNode`] so identifiers taken from the graph can be
/// compared against store terms without re-validation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(NamedNode);

impl Iri {
    /// Validates and constructs a new [`Iri`] value object.
    pub fn new(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        NamedNode::new(value.as_str())
            .map(Self)
            .map_err(|_| IriError::Invalid { value })
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Borrows the identifier as a graph term.
    #[must_use]
    pub fn as_node(&self) -> NamedNodeRef<'_> {
        self.0.as_ref()
    }
}

impl From<NamedNode> for Iri {
    fn from(node: NamedNode) -> Self {
        Self(node)
    }
}

impl From<NamedNodeRef<'_>> for Iri {
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self(node.into_owned())
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Iri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for Iri {
    type Error = IriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Iri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Iri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Errors produced when validating an [`Iri`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The provided text could not be parsed as an IRI.
    #[error("invalid IRI: {value}")]
    Invalid { value: String },
}

/// Closed set of languages labels can be resolved in.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl Language {
    pub const ALL: [Self; 2] = [Self::Pt, Self::En];

    /// BCP 47 primary subtag.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
        }
    }

    /// Prefix match against a literal's language tag, so `en` accepts `en-US`.
    #[must_use]
    pub fn matches(self, tag: &str) -> bool {
        tag.to_ascii_lowercase().starts_with(self.tag())
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s.split(['-', '_']).next().unwrap_or_default();
        Self::ALL
            .into_iter()
            .find(|language| language.tag().eq_ignore_ascii_case(primary))
            .ok_or_else(|| crate::Error::UnsupportedLanguage(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Iri, Language};

    #[test]
    fn accepts_valid_iri() {
        let iri = Iri::new("https://example.org/resource").expect("valid IRI");
        assert_eq!(iri.as_str(), "https://example.org/resource");
        assert_eq!(iri.as_node().as_str(), "https://example.org/resource");
    }

    #[test]
    fn rejects_invalid_iri() {
        let err = Iri::new("not an iri").expect_err("invalid IRI");
        assert!(matches!(err, super::IriError::Invalid { value } if value == "not an iri"));
    }

    #[test]
    fn iri_serializes_as_plain_string() {
        let iri = Iri::new("https://example.org/resource").expect("valid IRI");
        let json = serde_json::to_string(&iri).expect("serialize");
        assert_eq!(json, "\"https://example.org/resource\"");
        let back: Iri = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, iri);
    }

    #[rstest]
    #[case("pt", Language::Pt)]
    #[case("en", Language::En)]
    #[case("EN", Language::En)]
    #[case("pt-BR", Language::Pt)]
    #[case("en_US", Language::En)]
    fn parses_supported_languages(#[case] input: &str, #[case] expected: Language) {
        assert_eq!(input.parse::<Language>().expect("supported"), expected);
    }

    #[rstest]
    #[case("fr")]
    #[case("")]
    #[case("english")]
    fn rejects_unsupported_languages(#[case] input: &str) {
        let err = input.parse::<Language>().expect_err("unsupported");
        assert!(matches!(err, crate::Error::UnsupportedLanguage(value) if value == input));
    }

    #[test]
    fn language_tag_matching_is_prefix_based() {
        assert!(Language::En.matches("en-US"));
        assert!(Language::Pt.matches("PT-br"));
        assert!(!Language::En.matches("pt"));
    }
}
