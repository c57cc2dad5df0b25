use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything a command action can fail with. All variants end up as a
/// single received chat message; none of them terminate the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Missing credentials or the store could not be reached.
    #[error("{0}")]
    Connection(String),

    /// An expected property is absent or has an unexpected type.
    #[error("{0}")]
    SchemaMismatch(String),

    #[error("Unsupported property type: {kind} (property \"{property}\")")]
    UnsupportedPropertyType { property: String, kind: String },

    #[error("Unknown command: {0}")]
    NoMatchingCommand(String),

    #[error("{0}")]
    MalformedCommandArgument(String),

    #[error("Command {0} is already registered")]
    DuplicateCommand(String),

    /// Create/update/archive/query failure reported by the store.
    #[error("{0}")]
    StoreOperation(String),
}

impl Error {
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}
