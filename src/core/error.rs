use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Agent not found: {0:?}")]
    AgentNotFound(crate::core::types::AgentId),

    #[error("Skeleton creation failed: {0}")]
    SkeletonCreation(String),

    #[error("Engagement needs at least 2 active fighters, have {active}")]
    NotEnoughFighters { active: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
