use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZoneError {
    #[error("unsupported record type {attribute} for {entity}")]
    UnsupportedRecordType { entity: String, attribute: String },

    #[error("nested views not supported (view {inner} inside view {outer})")]
    NestedView { outer: String, inner: String },

    #[error("invalid view label {0:?}")]
    InvalidView(String),

    #[error("host names cannot be scoped to view {0}")]
    ViewScopedName(String),

    #[error("{family} already declared for {view}")]
    DuplicatePrefix { family: &'static str, view: String },

    #[error("invalid value for {attribute}: {reason}")]
    InvalidValue { attribute: String, reason: String },

    #[error("malformed address {0}")]
    InvalidAddress(String),

    #[error("no soa declared for {domain} in view {view}")]
    MissingSoa { domain: String, view: String },

    #[error("invalid declaration in {file}: {reason}")]
    Declaration { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("view task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ZoneError>;
