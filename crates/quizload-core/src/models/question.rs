//! Question record model shared by extraction, validation and storage.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Grammar family a question was extracted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Four alternatives A-D, single-letter answer ("teorico").
    #[serde(rename = "teorico")]
    FixedChoice,
    /// Two to eight alternatives A-H ("practico").
    #[serde(rename = "practico")]
    VariableChoice,
}

impl Category {
    /// Enumerated text persisted in the `category` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FixedChoice => "teorico",
            Category::VariableChoice => "practico",
        }
    }

    /// Parse the persisted enumerated text.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "teorico" => Some(Category::FixedChoice),
            "practico" => Some(Category::VariableChoice),
            _ => None,
        }
    }

    /// Human-readable label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Category::FixedChoice => "fixed-choice",
            Category::VariableChoice => "variable-choice",
        }
    }

    pub fn all() -> [Category; 2] {
        [Category::FixedChoice, Category::VariableChoice]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered mapping from alternative label to alternative text.
///
/// Keeps source order. Inserting a label that is already present replaces
/// its text without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    entries: Vec<(String, String)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an alternative, returning the previous text for that label.
    pub fn insert(&mut self, label: impl Into<String>, text: impl Into<String>) -> Option<String> {
        let label = label.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => Some(std::mem::replace(existing, text)),
            None => {
                self.entries.push((label, text));
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, t)| t.as_str())
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>, T: Into<String>> FromIterator<(L, T)> for Options {
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        let mut options = Options::new();
        for (label, text) in iter {
            options.insert(label, text);
        }
        options
    }
}

impl Serialize for Options {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, text) in &self.entries {
            map.serialize_entry(label, text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Options {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OptionsVisitor;

        impl<'de> Visitor<'de> for OptionsVisitor {
            type Value = Options;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of option labels to option text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Options, A::Error> {
                let mut options = Options::new();
                while let Some((label, text)) = access.next_entry::<String, String>()? {
                    options.insert(label, text);
                }
                Ok(options)
            }
        }

        deserializer.deserialize_map(OptionsVisitor)
    }
}

/// A multiple-choice question extracted from one source block.
///
/// Records are immutable once built; re-running extraction yields a fresh,
/// structurally identical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    code: String,
    category: Category,
    #[serde(rename = "question")]
    prompt: String,
    options: Options,
    #[serde(rename = "correct_option")]
    correct_label: String,
    #[serde(rename = "norma")]
    citation: String,
}

impl QuestionRecord {
    pub fn new(
        code: impl Into<String>,
        category: Category,
        prompt: impl Into<String>,
        options: Options,
        correct_label: impl Into<String>,
        citation: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            category,
            prompt: prompt.into(),
            options,
            correct_label: correct_label.into(),
            citation: citation.into(),
        }
    }

    /// Identifier token, unique within a category.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Label naming the correct alternative.
    pub fn correct_label(&self) -> &str {
        &self.correct_label
    }

    /// Regulatory reference, possibly empty.
    pub fn citation(&self) -> &str {
        &self.citation
    }

    /// Text of the correct alternative, if the answer resolves.
    pub fn correct_text(&self) -> Option<&str> {
        self.options.get(&self.correct_label)
    }
}

/// A persisted question row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredQuestion {
    /// Row identifier assigned by the store.
    pub id: i64,
    #[serde(flatten)]
    pub record: QuestionRecord,
    /// UTC timestamp of the batch that last wrote the row.
    pub loaded_at: String,
}
