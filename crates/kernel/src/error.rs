use kestrel_input::InputError;
use kestrel_render::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("bindings have no {kind} action named {name:?}")]
    MissingAction { name: String, kind: &'static str },
}
