//! Dataset and value-label set definitions.

use super::{DtaValue, DtaVariable};

/// A single key → label mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueLabel {
    pub key: i32,
    pub label: String,
}

/// A named value-label set, shared by variables through its name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelSet {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub labels: Vec<ValueLabel>,
}

impl LabelSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
        }
    }

    /// Add a label, builder style.
    #[must_use]
    pub fn with_label(mut self, key: i32, label: impl Into<String>) -> Self {
        self.add_label(key, label);
        self
    }

    pub fn add_label(&mut self, key: i32, label: impl Into<String>) {
        self.labels.push(ValueLabel {
            key,
            label: label.into(),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Size of the label text blob: every label plus its terminator.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.labels.iter().map(|l| l.label.len() + 1).sum()
    }
}

/// A dataset to be written.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DtaDataset {
    /// File-level data label.
    pub label: Option<String>,
    /// Variables in column order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub variables: Vec<DtaVariable>,
    /// Value-label sets.
    #[cfg_attr(feature = "serde", serde(default))]
    pub label_sets: Vec<LabelSet>,
    /// In-memory rows, used by [`crate::DtaWriter::write_dataset`].
    #[cfg_attr(feature = "serde", serde(skip))]
    pub rows: Vec<Vec<DtaValue>>,
}

impl DtaDataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset with the given variables.
    #[must_use]
    pub fn with_variables(variables: Vec<DtaVariable>) -> Self {
        Self {
            variables,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_label_set(mut self, label_set: LabelSet) -> Self {
        self.label_sets.push(label_set);
        self
    }

    pub fn add_variable(&mut self, variable: DtaVariable) {
        self.variables.push(variable);
    }

    pub fn add_label_set(&mut self, label_set: LabelSet) {
        self.label_sets.push(label_set);
    }

    pub fn add_row(&mut self, row: Vec<DtaValue>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Find a value-label set by name.
    #[must_use]
    pub fn label_set(&self, name: &str) -> Option<&LabelSet> {
        self.label_sets.iter().find(|set| set.name == name)
    }

    /// Find a variable by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&DtaVariable> {
        self.variables.iter().find(|var| var.name == name)
    }

    /// File label, or an empty string.
    #[must_use]
    pub fn file_label(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}
