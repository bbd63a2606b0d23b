use serde::Serialize;

use crate::criteria::SqlValue;

/// Ordered values for the `?` placeholders of one statement.
///
/// Threaded by `&mut` through every renderer; placeholder order in the text
/// and value order here always match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BindValues(Vec<SqlValue>);

impl BindValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value; enum constants are bound by name
    pub fn push(&mut self, value: SqlValue) {
        self.0.push(value.into_bind());
    }

    pub fn extend<I: IntoIterator<Item = SqlValue>>(&mut self, values: I) {
        for value in values {
            self.push(value);
        }
    }

    /// Append every value of `other` after the current ones
    pub fn append(&mut self, other: BindValues) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[SqlValue] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<SqlValue> {
        self.0
    }
}
