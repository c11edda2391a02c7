use std::path::PathBuf;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, ComboError>;

/// Contract violations and loader failures.
///
/// Every variant is raised before any search work starts; an empty ranking
/// is a normal outcome and never reported through this type.
#[derive(Debug, thiserror::Error)]
pub enum ComboError {
    #[error("a team needs exactly 4 members, got {0}")]
    TeamSize(usize),

    #[error("character '{0}' appears more than once")]
    DuplicateMember(String),

    #[error("selection pool needs at least 4 characters, got {0}")]
    PoolTooSmall(usize),

    #[error("at most 4 characters can be pinned, got {0}")]
    TooManyPinned(usize),

    #[error("character '{0}' is pinned more than once")]
    DuplicatePinned(String),

    #[error("a chain needs one activation followed by 1 to 4 reactions")]
    MalformedSequence,

    #[error("unknown character '{0}'")]
    UnknownCharacter(String),

    #[error("same-faction teams need 3 characters from one faction in the pool")]
    NoFactionCore,

    #[error("failed to read roster {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
