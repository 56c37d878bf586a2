use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    // Levée par l'engine quand le point de montage n'existe pas dans la vue
    #[error("Mount point '{0}' not found")]
    MountPointNotFound(String),
    #[error("Player engine operation '{0}' called before initialize")]
    NotInitialized(String),
    #[error("Player engine error: {0}")]
    Engine(String),
}

impl PlayerError {
    pub fn engine(message: impl Into<String>) -> Self {
        PlayerError::Engine(message.into())
    }

    pub fn not_initialized(operation: &str) -> Self {
        PlayerError::NotInitialized(operation.to_string())
    }
}
