use super::dataframe::FrameKind;
use thiserror::Error;

/// Errors raised by processing nodes.
///
/// Parameter errors are raised while a node is built and never afterwards.
/// Port errors come from pushing data the node did not declare. The I/O and
/// CSV variants only concern file backed nodes.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("missing parameter `{parameter}` for node `{node}` ({module})")]
    MissingParameter {
        module: &'static str,
        node: String,
        parameter: String,
    },

    #[error("invalid value for parameter `{parameter}` of node `{node}` ({module}): {cause}")]
    InvalidParameterValue {
        module: &'static str,
        node: String,
        parameter: String,
        cause: String,
    },

    #[error("node `{node}` has no port named `{port}`")]
    UnknownPort { node: String, port: String },

    #[error("port `{port}` of node `{node}` expects {expected} frames, got {found}")]
    PortKindMismatch {
        node: String,
        port: String,
        expected: FrameKind,
        found: FrameKind,
    },

    #[error("invalid data in node `{node}`: {reason}")]
    InvalidData { node: String, reason: String },

    #[error("I/O error in node `{node}`: {source}")]
    Io {
        node: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in node `{node}`: {source}")]
    Csv {
        node: String,
        #[source]
        source: csv::Error,
    },
}

impl NodeError {
    pub fn missing(module: &'static str, node: &str, parameter: impl Into<String>) -> Self {
        NodeError::MissingParameter {
            module,
            node: node.to_string(),
            parameter: parameter.into(),
        }
    }

    pub fn invalid(
        module: &'static str,
        node: &str,
        parameter: impl Into<String>,
        cause: impl Into<String>,
    ) -> Self {
        NodeError::InvalidParameterValue {
            module,
            node: node.to_string(),
            parameter: parameter.into(),
            cause: cause.into(),
        }
    }

    /// Dotted machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            NodeError::MissingParameter { .. } => "missing.parameter",
            NodeError::InvalidParameterValue { .. } => "invalid.parameter.value",
            NodeError::UnknownPort { .. } => "unknown.port",
            NodeError::PortKindMismatch { .. } => "port.kind.mismatch",
            NodeError::InvalidData { .. } => "invalid.data",
            NodeError::Io { .. } => "io",
            NodeError::Csv { .. } => "csv",
        }
    }

    /// Cause code of an invalid parameter value
    pub fn cause(&self) -> Option<&str> {
        match self {
            NodeError::InvalidParameterValue { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Name of the parameter a parameter error refers to
    pub fn parameter(&self) -> Option<&str> {
        match self {
            NodeError::MissingParameter { parameter, .. }
            | NodeError::InvalidParameterValue { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

pub type NodeResult<T> = Result<T, NodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = NodeError::invalid("node.processing.interpolate", "interp", "step_size", "invalid_value");
        let display = error.to_string();
        assert!(display.contains("step_size"));
        assert!(display.contains("interp"));
        assert!(display.contains("invalid_value"));
        assert_eq!(error.code(), "invalid.parameter.value");
        assert_eq!(error.cause(), Some("invalid_value"));
    }

    #[test]
    fn test_missing_parameter_code() {
        let error = NodeError::missing("node.processing.dataReplicate", "rep", "extra_data");
        assert_eq!(error.code(), "missing.parameter");
        assert_eq!(error.parameter(), Some("extra_data"));
        assert_eq!(error.cause(), None);
    }
}
