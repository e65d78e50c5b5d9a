//! Mapping of Tera errors into [`AppError`].

use renderhub_core::error::{AppError, ErrorKind};

/// Converts a Tera error into a template error.
///
/// Tera nests the useful detail (undefined variable, filter failure) in the
/// source chain, so the message joins every level with `": "`.
pub fn engine_error(err: tera::Error) -> AppError {
    AppError::with_source(ErrorKind::Template, error_chain(&err), err)
}

/// Joins an error and all of its sources with `": "`.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_chain_is_joined() {
        let inner = tera::Error::msg("filter upper_only expects a string");
        let outer = tera::Error::chain("Failed to render 'report'", inner);

        let err = engine_error(outer);
        assert_eq!(err.kind, ErrorKind::Template);
        assert_eq!(
            err.message,
            "Failed to render 'report': filter upper_only expects a string"
        );
        assert!(err.source().is_some());
    }
}
