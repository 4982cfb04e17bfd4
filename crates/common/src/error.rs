use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartbotError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    /// Blank request text, rejected before resolution.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The fallback resolver returned content that could not be parsed.
    #[error("spec parse error: {0}")]
    SpecParse(String),

    /// A spec named a data source outside the fixed enumeration.
    #[error("unsupported data source: {0}")]
    UnsupportedSource(String),

    /// Language-model call failed (transport, timeout, or bad response).
    #[error("llm resolver error: {0}")]
    Llm(String),

    /// Any other failure during aggregation or matrix building.
    #[error("execution error: {0}")]
    Execution(String),
}

pub type ChartbotResult<T> = Result<T, ChartbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_include_context() {
        let err = ChartbotError::SpecParse("expected value at line 1".to_string());
        assert!(err.to_string().contains("expected value"));

        let err = ChartbotError::UnsupportedSource("tickets".to_string());
        assert!(err.to_string().contains("tickets"));
    }
}
