//! JSON dataset documents.
//!
//! A document is the serde form of [`DtaDataset`] plus a `rows` array. Each
//! row is an array of JSON values in variable order:
//!
//! ```json
//! {
//!   "label": "Example",
//!   "variables": [
//!     {"name": "id", "type": "int32"},
//!     {"name": "name", "type": "string", "storage_width": 12}
//!   ],
//!   "label_sets": [],
//!   "rows": [[1, "Ada"], [2, null]]
//! }
//! ```
//!
//! `null` is a missing value. For numeric variables the strings `"."` and
//! `".a"` through `".z"` are the system and tagged missing values.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde_json::Value;
use stata_dta::{DtaDataset, DtaType, DtaValue, DtaVariable};

/// A dataset description with its observations.
#[derive(Debug, Deserialize)]
pub struct DatasetDocument {
    #[serde(flatten)]
    pub dataset: DtaDataset,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl DatasetDocument {
    /// Read a document from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parse {}", path.display()))
    }

    /// Parse a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parse dataset document")
    }

    /// Convert row `index` into cell values.
    pub fn row(&self, index: usize) -> Result<Vec<DtaValue>> {
        let row = self
            .rows
            .get(index)
            .ok_or_else(|| anyhow!("row {index} does not exist"))?;
        let variables = &self.dataset.variables;
        if row.len() != variables.len() {
            bail!(
                "row {index} has {} values, expected {}",
                row.len(),
                variables.len()
            );
        }
        variables
            .iter()
            .zip(row)
            .map(|(variable, value)| {
                convert_value(variable, value)
                    .with_context(|| format!("row {index}, variable {}", variable.name))
            })
            .collect()
    }

    /// Convert every row, producing a dataset ready for writing.
    pub fn into_dataset(self) -> Result<DtaDataset> {
        let rows = (0..self.rows.len())
            .map(|index| self.row(index))
            .collect::<Result<Vec<_>>>()?;
        let mut dataset = self.dataset;
        dataset.rows = rows;
        Ok(dataset)
    }
}

/// Convert one JSON value for `variable`.
pub fn convert_value(variable: &DtaVariable, value: &Value) -> Result<DtaValue> {
    if variable.data_type == DtaType::String {
        return match value {
            Value::Null => Ok(DtaValue::String(None)),
            Value::String(text) => Ok(DtaValue::string(text.as_str())),
            other => bail!("expected a string, found {other}"),
        };
    }

    match value {
        Value::Null => Ok(DtaValue::missing()),
        Value::String(text) => parse_missing(text),
        Value::Number(_) => convert_number(variable.data_type, value),
        other => bail!("expected a number, found {other}"),
    }
}

fn parse_missing(text: &str) -> Result<DtaValue> {
    let mut chars = text.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('.'), None, None) => Ok(DtaValue::missing()),
        (Some('.'), Some(tag), None) if tag.is_ascii_lowercase() => {
            Ok(DtaValue::tagged_missing(tag))
        }
        _ => bail!("expected a number or a missing value (\".\", \".a\"-\".z\"), found {text:?}"),
    }
}

fn convert_number(data_type: DtaType, value: &Value) -> Result<DtaValue> {
    let converted = match data_type {
        DtaType::Byte => value
            .as_i64()
            .and_then(|v| i8::try_from(v).ok())
            .map(DtaValue::Byte),
        DtaType::Int16 => value
            .as_i64()
            .and_then(|v| i16::try_from(v).ok())
            .map(DtaValue::Int16),
        DtaType::Int32 => value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(DtaValue::Int32),
        DtaType::Float => value.as_f64().map(|v| DtaValue::Float(v as f32)),
        DtaType::Double => value.as_f64().map(DtaValue::Double),
        DtaType::String => None,
    };
    converted.ok_or_else(|| anyhow!("{value} does not fit a {data_type} variable"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stata_dta::MissingValue;

    #[test]
    fn test_parse_document() {
        let document = DatasetDocument::from_json(
            r#"{
                "label": "Cars",
                "variables": [
                    {"name": "make", "type": "string", "storage_width": 18},
                    {"name": "price", "type": "int32", "label": "Price"},
                    {"name": "foreign", "type": "byte", "label_set": "origin"}
                ],
                "label_sets": [
                    {"name": "origin", "labels": [
                        {"key": 0, "label": "Domestic"},
                        {"key": 1, "label": "Foreign"}
                    ]}
                ],
                "rows": [["AMC Concord", 4099, 0], ["Audi 5000", null, ".b"]]
            }"#,
        )
        .unwrap();

        assert_eq!(document.dataset.file_label(), "Cars");
        assert_eq!(document.dataset.num_variables(), 3);
        assert_eq!(document.dataset.label_sets[0].len(), 2);

        let dataset = document.into_dataset().unwrap();
        assert_eq!(
            dataset.rows[0],
            vec![
                DtaValue::string("AMC Concord"),
                DtaValue::Int32(4099),
                DtaValue::Byte(0)
            ]
        );
        assert_eq!(
            dataset.rows[1],
            vec![
                DtaValue::string("Audi 5000"),
                DtaValue::missing(),
                DtaValue::Missing(MissingValue::Tagged('b'))
            ]
        );
    }

    #[test]
    fn test_numeric_conversions() {
        let var = DtaVariable::int16("n");
        assert_eq!(
            convert_value(&var, &json!(-5)).unwrap(),
            DtaValue::Int16(-5)
        );
        assert!(convert_value(&var, &json!(40000)).is_err());
        assert!(convert_value(&var, &json!(1.5)).is_err());
        assert!(convert_value(&var, &json!(true)).is_err());

        let var = DtaVariable::float("f");
        assert_eq!(
            convert_value(&var, &json!(2.5)).unwrap(),
            DtaValue::Float(2.5)
        );
        let var = DtaVariable::double("d");
        assert_eq!(
            convert_value(&var, &json!(3)).unwrap(),
            DtaValue::Double(3.0)
        );
    }

    #[test]
    fn test_missing_markers() {
        let var = DtaVariable::double("d");
        assert_eq!(convert_value(&var, &json!(".")).unwrap(), DtaValue::missing());
        assert_eq!(
            convert_value(&var, &json!(".z")).unwrap(),
            DtaValue::tagged_missing('z')
        );
        assert!(convert_value(&var, &json!(".A")).is_err());
        assert!(convert_value(&var, &json!("..")).is_err());
        assert!(convert_value(&var, &json!("12")).is_err());
    }

    #[test]
    fn test_string_cells() {
        let var = DtaVariable::string("s", 8);
        assert_eq!(convert_value(&var, &json!(".a")).unwrap(), DtaValue::string(".a"));
        assert_eq!(convert_value(&var, &Value::Null).unwrap(), DtaValue::String(None));
        assert!(convert_value(&var, &json!(1)).is_err());
    }

    #[test]
    fn test_row_length_checked() {
        let document = DatasetDocument::from_json(
            r#"{"variables": [{"name": "x", "type": "double"}], "rows": [[1, 2]]}"#,
        )
        .unwrap();
        let error = document.row(0).unwrap_err();
        assert!(error.to_string().contains("has 2 values, expected 1"));
    }
}
