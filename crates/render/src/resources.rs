use glam::Vec3;
use kestrel_common::{MaterialHandle, MeshHandle, ShaderHandle};
use kestrel_ecs::Arena;

use crate::error::RenderError;

/// Pipeline stage a shader is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Shader binary bound to one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    pub stage: ShaderStage,
    pub source: Vec<u8>,
}

/// A vertex + fragment shader pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    pub vertex: ShaderHandle,
    pub fragment: ShaderHandle,
}

/// Indexed triangle mesh drawn with one material.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub material: MaterialHandle,
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u16; 3]>,
}

impl Mesh {
    /// Unit cube centred on the origin; front and back faces only.
    pub fn cube(material: MaterialHandle) -> Self {
        Self {
            material,
            vertices: vec![
                // front
                Vec3::new(-0.5, -0.5, 0.5),
                Vec3::new(0.5, -0.5, 0.5),
                Vec3::new(-0.5, 0.5, 0.5),
                Vec3::new(0.5, 0.5, 0.5),
                // back
                Vec3::new(-0.5, -0.5, -0.5),
                Vec3::new(0.5, -0.5, -0.5),
                Vec3::new(-0.5, 0.5, -0.5),
                Vec3::new(0.5, 0.5, -0.5),
            ],
            indices: vec![[2, 1, 0], [1, 2, 3], [6, 4, 5], [5, 7, 6]],
        }
    }

    /// Square of side `size` on the XZ plane, facing +Y.
    pub fn plane(material: MaterialHandle, size: f32) -> Self {
        let h = size * 0.5;
        Self {
            material,
            vertices: vec![
                Vec3::new(-h, 0.0, -h),
                Vec3::new(h, 0.0, -h),
                Vec3::new(-h, 0.0, h),
                Vec3::new(h, 0.0, h),
            ],
            indices: vec![[0, 2, 1], [1, 2, 3]],
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}

/// Shaders, materials and meshes, each in its own arena.
///
/// GPU backends read this through the enumeration methods
/// ([`ResourceRegistry::shaders`] and friends) to build their own objects.
#[derive(Default)]
pub struct ResourceRegistry {
    shaders: Arena<ShaderHandle, Shader>,
    materials: Arena<MaterialHandle, Material>,
    meshes: Arena<MeshHandle, Mesh>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_shader(&mut self, stage: ShaderStage, source: Vec<u8>) -> ShaderHandle {
        let (handle, _) = self.shaders.create_object(Shader { stage, source });
        tracing::debug!(%handle, ?stage, "shader created");
        handle
    }

    /// Creates a material after checking both shaders exist and sit on the
    /// right stages.
    pub fn create_material(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<MaterialHandle, RenderError> {
        self.expect_stage(vertex, ShaderStage::Vertex)?;
        self.expect_stage(fragment, ShaderStage::Fragment)?;
        let (handle, _) = self.materials.create_object(Material { vertex, fragment });
        tracing::debug!(%handle, %vertex, %fragment, "material created");
        Ok(handle)
    }

    fn expect_stage(&self, shader: ShaderHandle, expected: ShaderStage) -> Result<(), RenderError> {
        let actual = self
            .shaders
            .get_object(shader)
            .ok_or(RenderError::UnknownShader(shader))?
            .stage;
        if actual != expected {
            return Err(RenderError::StageMismatch {
                shader,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Stores a mesh after checking its material exists and every index is
    /// in range.
    pub fn create_mesh(&mut self, mesh: Mesh) -> Result<MeshHandle, RenderError> {
        if !self.materials.contains(mesh.material) {
            return Err(RenderError::UnknownMaterial(mesh.material));
        }
        let vertices = mesh.vertices.len();
        if let Some(index) = mesh
            .indices
            .iter()
            .flatten()
            .copied()
            .find(|i| usize::from(*i) >= vertices)
        {
            return Err(RenderError::IndexOutOfRange { index, vertices });
        }
        let (handle, stored) = self.meshes.create_object(mesh);
        tracing::debug!(%handle, triangles = stored.triangle_count(), "mesh created");
        Ok(handle)
    }

    pub fn shader(&self, handle: ShaderHandle) -> Option<&Shader> {
        self.shaders.get_object(handle)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get_object(handle)
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get_object(handle)
    }

    pub fn shaders(&self) -> impl Iterator<Item = (ShaderHandle, &Shader)> {
        self.shaders.iter()
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialHandle, &Material)> {
        self.materials.iter()
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshHandle, &Mesh)> {
        self.meshes.iter()
    }

    /// Shaders compiled for `stage`.
    pub fn shaders_for_stage(&self, stage: ShaderStage) -> impl Iterator<Item = (ShaderHandle, &Shader)> {
        self.shaders.iter().filter(move |(_, s)| s.stage == stage)
    }

    pub fn destroy_shader(&mut self, handle: ShaderHandle) -> bool {
        self.shaders.destroy_object(handle)
    }

    pub fn destroy_material(&mut self, handle: MaterialHandle) -> bool {
        self.materials.destroy_object(handle)
    }

    pub fn destroy_mesh(&mut self, handle: MeshHandle) -> bool {
        self.meshes.destroy_object(handle)
    }

    /// Creates a vertex/fragment pair, a material on them and a cube mesh.
    pub fn create_default_cube(
        &mut self,
        vertex_source: Vec<u8>,
        fragment_source: Vec<u8>,
    ) -> Result<(MaterialHandle, MeshHandle), RenderError> {
        let vertex = self.create_shader(ShaderStage::Vertex, vertex_source);
        let fragment = self.create_shader(ShaderStage::Fragment, fragment_source);
        let material = self.create_material(vertex, fragment)?;
        let mesh = self.create_mesh(Mesh::cube(material))?;
        Ok((material, mesh))
    }
}
