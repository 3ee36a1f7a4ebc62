use crate::key::InputKey;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("action {0:?} already exists")]
    DuplicateAction(String),
    #[error("action {action:?} maps a key that belongs to no device")]
    UnknownKey { action: String },
    #[error("action {action:?} maps {key:?} along a zero axis")]
    ZeroAxis { action: String, key: InputKey },
}
