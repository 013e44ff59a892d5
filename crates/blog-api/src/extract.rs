use axum::{Json, extract::rejection::JsonRejection};
use tracing::debug;

use crate::error::ApiError;

/// Path ids arrive as strings so a non-numeric id becomes a
/// `Validation` error with our message instead of axum's plain-text rejection.
pub fn parse_id(raw: &str, what: &'static str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::validation(format!("Invalid {} ID", what)))
}

pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            Err(ApiError::validation("Invalid request body"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_parse() {
        assert_eq!(parse_id("17", "post").unwrap(), 17);
    }

    #[test]
    fn non_numeric_ids_are_validation_errors() {
        for raw in ["abc", "", "1.5", "12x"] {
            match parse_id(raw, "comment") {
                Err(ApiError::Validation(msg)) => assert_eq!(msg, "Invalid comment ID"),
                other => panic!("{:?} parsed as {:?}", raw, other),
            }
        }
    }
}
