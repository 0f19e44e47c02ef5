use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("audio decode error while {context}: {message}")]
    Audio {
        context: &'static str,
        message: String,
    },
    #[error("speech provider failed during {context}: {message}")]
    Provider {
        context: &'static str,
        message: String,
    },
    #[error("{context}: {message}")]
    Runtime {
        context: &'static str,
        message: String,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl AlignmentError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn audio(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Audio {
            context,
            message: err.to_string(),
        }
    }

    /// Wraps a failure reported by a speech-recognition collaborator.
    pub fn provider(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Provider {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn runtime(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_message_includes_context() {
        let err = AlignmentError::provider("transcribe", "model not loaded");
        assert_eq!(
            err.to_string(),
            "speech provider failed during transcribe: model not loaded"
        );
    }

    #[test]
    fn invalid_input_message() {
        let err = AlignmentError::invalid_input("lookahead must be >= 1");
        assert_eq!(err.to_string(), "invalid input: lookahead must be >= 1");
    }
}
