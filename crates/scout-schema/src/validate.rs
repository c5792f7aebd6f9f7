//! JSON Schema validation of raw ingest records.

use schemars::schema_for;
use scout_core::entities::IngestRecord;

use crate::error::SchemaError;

/// Compiled validator for [`IngestRecord`] JSON.
///
/// The schema is generated from the `JsonSchema` derive, so the validator
/// always tracks the record type.
pub struct RecordValidator {
    schema: serde_json::Value,
    validator: jsonschema::Validator,
}

impl RecordValidator {
    /// Generate and compile the ingest record schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Generation` if the generated schema does not compile.
    pub fn new() -> Result<Self, SchemaError> {
        let schema = serde_json::to_value(schema_for!(IngestRecord))
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;
        Ok(Self { schema, validator })
    }

    /// Validate one raw record.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ValidationFailed` with every validator message.
    pub fn validate(&self, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// The generated JSON Schema.
    #[must_use]
    pub const fn schema(&self) -> &serde_json::Value {
        &self.schema
    }
}

impl std::fmt::Debug for RecordValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordValidator").finish_non_exhaustive()
    }
}
