//! Records returned by the MagicPod API.
//!
//! Shared steps are deserialised into a typed [`SharedStep`]; only the fields
//! the expansion needs are kept. Test cases keep every field the service
//! returned, in the original key order, so the emitted JSON differs from the
//! input only in `human_readable_steps` and the appended `total_step_count`.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::api::ApiError;

/// JSON object as returned by the API.
pub type Record = serde_json::Map<String, Value>;

/// Field holding the sequential identifier of a record.
pub const NUMBER_FIELD: &str = "number";
/// Field holding the line-oriented step text.
pub const STEPS_FIELD: &str = "human_readable_steps";
/// Field appended to each emitted test case.
pub const TOTAL_STEP_COUNT_FIELD: &str = "total_step_count";

/// A named, reusable group of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedStep {
    /// Sequential number within the project.
    pub number: u64,
    /// Name used by references from other step texts.
    pub name: String,
    /// Step text of the group, possibly containing further references.
    pub human_readable_steps: String,
}

impl SharedStep {
    /// Build a shared step from a fetched record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingField`] when a required field is absent or
    /// has the wrong type.
    pub fn from_record(record: Record) -> Result<Self, ApiError> {
        let number = record_number(&record, "shared step")?;
        let label = format!("shared step {number}");
        let name = string_field(&record, "name", &label)?.to_owned();
        let human_readable_steps = string_field(&record, STEPS_FIELD, &label)?.to_owned();
        Ok(Self {
            number,
            name,
            human_readable_steps,
        })
    }
}

/// A test case whose step text is replaced by its expanded form.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    number: u64,
    fields: Record,
}

impl TestCase {
    /// Wrap a fetched record, checking the fields the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingField`] when `number` or
    /// `human_readable_steps` is absent or has the wrong type.
    pub fn from_record(fields: Record) -> Result<Self, ApiError> {
        let number = record_number(&fields, "test case")?;
        string_field(&fields, STEPS_FIELD, &format!("test case {number}"))?;
        Ok(Self { number, fields })
    }

    /// Sequential number within the project.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Current step text.
    #[must_use]
    pub fn human_readable_steps(&self) -> &str {
        self.fields
            .get(STEPS_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Replace the step text with its expansion and record the leaf count.
    ///
    /// `human_readable_steps` keeps its position among the fields;
    /// `total_step_count` is added after the existing fields.
    pub fn set_expanded(&mut self, steps: String, total_step_count: usize) {
        self.fields.insert(STEPS_FIELD.to_owned(), Value::String(steps));
        self.fields
            .insert(TOTAL_STEP_COUNT_FIELD.to_owned(), Value::from(total_step_count));
    }

    /// Total step count, once [`TestCase::set_expanded`] has run.
    #[must_use]
    pub fn total_step_count(&self) -> Option<u64> {
        self.fields.get(TOTAL_STEP_COUNT_FIELD).and_then(Value::as_u64)
    }

    /// Borrow every field of the record.
    #[must_use]
    pub const fn fields(&self) -> &Record {
        &self.fields
    }
}

impl Serialize for TestCase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Read the `number` field of a record.
///
/// # Errors
///
/// Returns [`ApiError::MissingField`] when the field is absent or not a
/// non-negative integer.
pub fn record_number(record: &Record, kind: &str) -> Result<u64, ApiError> {
    record
        .get(NUMBER_FIELD)
        .and_then(Value::as_u64)
        .ok_or_else(|| ApiError::MissingField {
            record: kind.to_owned(),
            field: NUMBER_FIELD,
        })
}

fn string_field<'a>(
    record: &'a Record,
    field: &'static str,
    label: &str,
) -> Result<&'a str, ApiError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::MissingField {
            record: label.to_owned(),
            field,
        })
}
