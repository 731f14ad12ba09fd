use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::core::FieldValue;
use crate::error::{ChartError, ChartResult};

static NULL_VALUE: FieldValue = FieldValue::Null;

/// One data row: an ordered mapping from field name to value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, FieldValue>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns the value of `field`, reading missing fields as `Null`.
    #[must_use]
    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&NULL_VALUE)
    }

    #[must_use]
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).as_number()
    }

    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Row collection where every row carries the same field set.
///
/// Fields are ordered by first appearance; rows lacking a field get an
/// explicit `Null` so downstream code never has to distinguish "missing"
/// from "empty".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataSet {
    fields: Vec<String>,
    rows: Vec<Row>,
}

impl DataSet {
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut fields: IndexSet<String> = IndexSet::new();
        for row in &rows {
            for name in row.field_names() {
                if !fields.contains(name) {
                    fields.insert(name.to_owned());
                }
            }
        }

        let rows = rows
            .into_iter()
            .map(|row| {
                let mut normalized = IndexMap::with_capacity(fields.len());
                for name in &fields {
                    let value = row.fields.get(name).cloned().unwrap_or_default();
                    normalized.insert(name.clone(), value);
                }
                Row { fields: normalized }
            })
            .collect();

        Self {
            fields: fields.into_iter().collect(),
            rows,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Collects the raw values of one field, in row order.
    #[must_use]
    pub fn column(&self, field: &str) -> Vec<FieldValue> {
        self.rows.iter().map(|row| row.get(field).clone()).collect()
    }

    /// Collects the values of several fields, row-major.
    #[must_use]
    pub fn columns(&self, fields: &[String]) -> Vec<FieldValue> {
        self.rows
            .iter()
            .flat_map(|row| fields.iter().map(|field| row.get(field).clone()))
            .collect()
    }
}

/// Which field labels each row and which fields carry its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldSelection")]
pub struct FieldSelection {
    label_field: String,
    value_fields: Vec<String>,
}

#[derive(Deserialize)]
struct RawFieldSelection {
    label_field: String,
    value_fields: Vec<String>,
}

impl TryFrom<RawFieldSelection> for FieldSelection {
    type Error = ChartError;

    fn try_from(raw: RawFieldSelection) -> ChartResult<Self> {
        Self::new(raw.label_field, raw.value_fields)
    }
}

impl FieldSelection {
    pub fn new(
        label_field: impl Into<String>,
        value_fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> ChartResult<Self> {
        let label_field = label_field.into();
        let mut unique: IndexSet<String> = IndexSet::new();
        for field in value_fields {
            unique.insert(field.into());
        }

        if unique.is_empty() {
            return Err(ChartError::InvalidFieldSelection(
                "at least one value field is required".to_owned(),
            ));
        }
        if unique.contains(&label_field) {
            return Err(ChartError::InvalidFieldSelection(format!(
                "`{label_field}` cannot be both the label field and a value field"
            )));
        }

        Ok(Self {
            label_field,
            value_fields: unique.into_iter().collect(),
        })
    }

    pub fn single(
        label_field: impl Into<String>,
        value_field: impl Into<String>,
    ) -> ChartResult<Self> {
        let value_field: String = value_field.into();
        Self::new(label_field, [value_field])
    }

    #[must_use]
    pub fn label_field(&self) -> &str {
        &self.label_field
    }

    #[must_use]
    pub fn value_fields(&self) -> &[String] {
        &self.value_fields
    }

    /// The first value field; charts with a single measure use this one.
    #[must_use]
    pub fn primary_value_field(&self) -> &str {
        &self.value_fields[0]
    }
}
