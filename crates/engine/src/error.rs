use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("root batch has no label")]
    MissingLabel,

    #[error("cannot flatten batch tree: no id for parent batch {label}")]
    MissingId { label: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}
