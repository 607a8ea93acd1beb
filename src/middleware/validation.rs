use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, AppResult};
use crate::orders::models::OrderBatch;

/// Deserialize and validate a JSON body
pub fn validate_json<T: DeserializeOwned + Validate>(bytes: &[u8]) -> AppResult<T> {
    let value: T = serde_json::from_slice(bytes)
        .map_err(|e| AppError::InvalidPayload(format!("Invalid JSON: {}", e)))?;

    value
        .validate()
        .map_err(|e| AppError::InvalidPayload(format!("Validation failed: {}", describe(&e))))?;

    Ok(value)
}

/// Parse an inbound order batch, enforcing unique order names
pub fn parse_order_batch(bytes: &[u8]) -> AppResult<OrderBatch> {
    let batch: OrderBatch = validate_json(bytes)?;

    if let Some(name) = batch.duplicate_name() {
        return Err(AppError::InvalidPayload(format!(
            "Validation failed: order name {} appears more than once",
            name
        )));
    }

    Ok(batch)
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, String::new(), &mut messages);
    messages.join("; ")
}

fn collect(errors: &ValidationErrors, prefix: String, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                let error_messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                out.push(format!("{}: {}", path, error_messages.join(", ")));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}
