use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid hex color `{0}`, expected RRGGBB (e.g. 1a1b26)")]
    InvalidColor(String),

    #[error("unknown firework kind `{0}` (try --list)")]
    UnknownKind(String),

    #[error("kind `{kind}` has no type `{ty}` (try --list)")]
    UnknownType { kind: String, ty: String },

    #[error("failed to set up logging: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
