use thiserror::Error;

/// Operational failures of the scene engine. None of these are fatal to the
/// host; the session logs them and stays (or becomes) unmounted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("no container to mount into")]
    MissingContainer,
    #[error("container has an empty viewport ({width}x{height})")]
    EmptyViewport { width: u32, height: u32 },
    #[error("session is already mounted")]
    AlreadyMounted,
    #[error("render backend error: {0}")]
    Backend(String),
    #[error("heart tessellation failed: {0}")]
    Tessellation(String),
}

impl SceneError {
    /// Conditions the host is expected to hit (no viewport during a
    /// server-side pass, a collapsed container) rather than real faults.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            SceneError::MissingContainer | SceneError::EmptyViewport { .. }
        )
    }
}
