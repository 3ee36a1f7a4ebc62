use kestrel_common::{MaterialHandle, MeshHandle, ShaderHandle};

use crate::resources::ShaderStage;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("shader {0} not found")]
    UnknownShader(ShaderHandle),
    #[error("shader {shader} is a {actual:?} shader, expected {expected:?}")]
    StageMismatch {
        shader: ShaderHandle,
        expected: ShaderStage,
        actual: ShaderStage,
    },
    #[error("material {0} not found")]
    UnknownMaterial(MaterialHandle),
    #[error("mesh {0} not found")]
    UnknownMesh(MeshHandle),
    #[error("mesh index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u16, vertices: usize },
}
