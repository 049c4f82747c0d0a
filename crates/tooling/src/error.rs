use thiserror::Error;

/// Typed failures for the parse → validate → execute pipeline. The executor
/// never guesses intent on malformed input; every failure mode surfaces as
/// one of these variants with enough context to log and retry upstream.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("malformed tool call: {0}")]
    MalformedToolCall(String),

    #[error("unknown tool '{name}'")]
    UnknownTool { name: String },

    #[error("tool '{tool}' is missing required argument '{argument}'")]
    MissingArgument { tool: String, argument: String },

    #[error("tool '{tool}' does not accept argument '{argument}'")]
    UnexpectedArgument { tool: String, argument: String },

    #[error("tool '{tool}' is already registered")]
    DuplicateTool { tool: String },

    #[error("tool '{tool}' failed")]
    ExecutionFailed {
        tool: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ToolError {
    /// Whether re-sampling the generator and re-attempting the call can
    /// plausibly fix this. Structural failures come from the model's output
    /// and are worth another sample; registry setup and handler failures
    /// are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ToolError::MalformedToolCall(_) => true,
            ToolError::UnknownTool { .. } => true,
            ToolError::MissingArgument { .. } => true,
            ToolError::UnexpectedArgument { .. } => true,
            ToolError::DuplicateTool { .. } => false,
            ToolError::ExecutionFailed { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_mark_model_output_failures_as_retryable() {
        assert!(ToolError::MalformedToolCall("not json".to_string()).is_retryable());
        assert!(ToolError::UnknownTool {
            name: "x".to_string()
        }
        .is_retryable());
        assert!(ToolError::MissingArgument {
            tool: "t".to_string(),
            argument: "path".to_string()
        }
        .is_retryable());
        assert!(ToolError::UnexpectedArgument {
            tool: "t".to_string(),
            argument: "verbose".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn should_mark_local_failures_as_not_retryable() {
        assert!(!ToolError::DuplicateTool {
            tool: "t".to_string()
        }
        .is_retryable());
        assert!(!ToolError::ExecutionFailed {
            tool: "t".to_string(),
            source: anyhow::anyhow!("file not found"),
        }
        .is_retryable());
    }

    #[test]
    fn should_include_context_in_display() {
        let error = ToolError::MissingArgument {
            tool: "fn_signatures".to_string(),
            argument: "path".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "tool 'fn_signatures' is missing required argument 'path'"
        );
    }
}
