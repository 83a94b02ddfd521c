use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("Version selector must not be empty")]
    Empty,

    #[error("Invalid version range: '{0}'")]
    InvalidRange(String),

    #[error("Version '{0}' cannot be converted to a strict version constraint.")]
    NotRejectable(String),

    #[error("Version selector '{0}' requires component metadata to accept a candidate")]
    MetadataRequired(String),
}
