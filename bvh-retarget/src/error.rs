use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("line {line}: unbalanced hierarchy: {message}")]
    HierarchyImbalance { line: usize, message: String },

    #[error("line {line}: motion row has {found} values but the joint layout expects {expected}")]
    ChannelCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid number '{token}'")]
    NumericFormat { line: usize, token: String },

    #[error("line {line}: content outside of any section: '{content}'")]
    UnknownSection { line: usize, content: String },

    #[error("line {line}: joint '{name}' is declared more than once")]
    DuplicateJoint { line: usize, name: String },

    #[error("line {line}: joint '{joint}' has no CHANNELS declaration")]
    MissingChannels { line: usize, joint: String },

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("invalid value: {message}")]
    InvalidValue { message: String },

    #[cfg(feature = "json")]
    #[error("failed to parse retarget config JSON: {message}")]
    JsonParse { message: String },
}

impl Error {
    /// 1-based source line for parse errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::HierarchyImbalance { line, .. }
            | Self::ChannelCountMismatch { line, .. }
            | Self::NumericFormat { line, .. }
            | Self::UnknownSection { line, .. }
            | Self::DuplicateJoint { line, .. }
            | Self::MissingChannels { line, .. }
            | Self::Malformed { line, .. } => Some(*line),
            Self::InvalidValue { .. } => None,
            #[cfg(feature = "json")]
            Self::JsonParse { .. } => None,
        }
    }
}
