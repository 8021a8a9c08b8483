/*!
 * Field validation against control values.
 * Control values wrapped in matcher markers are resolved through the matcher
 * registry, plain control values are compared after dynamic content replacement.
 */

use crate::context::{TestContext, ValidationContext, ValidationStatus};
use crate::error::{MatcherError, ValidationError};
use crate::matcher::ValidationMatcherUtils;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Result of validating a set of fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValidationResult {
    /// Whether every field matched
    pub valid: bool,

    /// One entry per failed field
    pub errors: Vec<ValidationError>,

    /// Time taken for validation in milliseconds
    pub validation_time: f64,

    /// Number of control fields checked
    pub fields_validated: usize,
}

/// Validates received field values against control values
pub struct FieldValidator;

impl FieldValidator {
    /// Validate every control field, collecting mismatches.
    ///
    /// Fields are checked in name order. Configuration errors (unknown
    /// matcher, bad expression) abort and mark the validation context failed.
    pub fn validate_fields(
        received: &HashMap<String, String>,
        control: &HashMap<String, String>,
        context: &mut TestContext,
        validation_context: &mut ValidationContext,
    ) -> Result<FieldValidationResult, MatcherError> {
        let start_time = Instant::now();

        if control.is_empty() {
            debug!("No control fields given, skipping field validation");
            validation_context.update_status(ValidationStatus::Optional);
            return Ok(FieldValidationResult {
                valid: true,
                errors: Vec::new(),
                validation_time: start_time.elapsed().as_secs_f64() * 1000.0,
                fields_validated: 0,
            });
        }

        let mut names: Vec<&String> = control.keys().collect();
        names.sort();

        let mut errors = Vec::new();
        for name in names {
            let control_value = &control[name];

            let outcome = match received.get(name) {
                Some(value) => Self::validate_field(name, value, control_value, context),
                None => Err(ValidationError::new(
                    name.as_str(),
                    "",
                    format!("Missing field '{}' in received values", name),
                )
                .with_expected(vec![control_value.clone()])
                .into()),
            };

            match outcome {
                Ok(()) => debug!("Field '{}' is valid", name),
                Err(MatcherError::Validation(error)) => {
                    warn!("{}", error);
                    errors.push(error);
                }
                Err(error) => {
                    validation_context.update_status(ValidationStatus::Failed);
                    return Err(error);
                }
            }
        }

        let valid = errors.is_empty();
        validation_context.update_status(if valid {
            ValidationStatus::Passed
        } else {
            ValidationStatus::Failed
        });

        info!(
            "Validated {} fields, {} failed",
            control.len(),
            errors.len()
        );

        Ok(FieldValidationResult {
            valid,
            errors,
            validation_time: start_time.elapsed().as_secs_f64() * 1000.0,
            fields_validated: control.len(),
        })
    }

    /// Validate one received value against a control value
    pub fn validate_field(
        field_name: &str,
        received: &str,
        control: &str,
        context: &mut TestContext,
    ) -> Result<(), MatcherError> {
        if ValidationMatcherUtils::is_validation_matcher_expression(control, context.settings()) {
            return ValidationMatcherUtils::resolve_validation_matcher(field_name, received, control, context);
        }

        let expected = context.replace_dynamic_content(control)?;
        if received == expected {
            Ok(())
        } else {
            Err(ValidationError::new(
                field_name,
                received,
                format!(
                    "Values not equal for field '{}', expected '{}' but was '{}'",
                    field_name, expected, received
                ),
            )
            .with_expected(vec![expected])
            .into())
        }
    }
}
