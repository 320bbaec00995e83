use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("could not reach the analysis service: {0}")]
    Transport(String),
    #[error("analysis service returned status {status}")]
    Upstream { status: u16, detail: Option<String> },
    #[error("unexpected response from the analysis service: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Text shown to the user; `fallback` covers upstream failures that carry
    /// no `detail`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Upstream {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Upstream { detail: None, .. } => fallback.to_string(),
            Self::Transport(_) | Self::Decode(_) => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("a documentation URL is required")]
    EmptyUrl,
    #[error("there is no analysis to copy")]
    NothingToCopy,
    #[error("failed to copy text: {0}")]
    Clipboard(String),
}
