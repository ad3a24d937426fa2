use thiserror::Error;
use validator::Validate;

use crate::entities::CreateReadingRequest;

/// Errors raised at the reading input boundary
#[derive(Debug, Error)]
pub enum ReadingServiceError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Check a reading request before it reaches the repository
pub fn validate_create_request(request: &CreateReadingRequest) -> Result<(), ReadingServiceError> {
    request.validate().map_err(|e| {
        let mut fields: Vec<_> = e
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|error| match &error.message {
                        Some(message) => message.to_string(),
                        None => error.code.to_string(),
                    })
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect();
        fields.sort();
        ReadingServiceError::Validation(fields.join("; "))
    })
}
