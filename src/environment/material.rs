use bevy::mesh::MeshVertexBufferLayoutRef;
use bevy::pbr::MaterialPipeline;
use bevy::pbr::MaterialPipelineKey;
use bevy::prelude::*;
use bevy::render::render_resource::AsBindGroup;
use bevy::render::render_resource::CompareFunction;
use bevy::render::render_resource::RenderPipelineDescriptor;
use bevy::render::render_resource::SpecializedMeshPipelineError;
use bevy::render::render_resource::StencilFaceState;
use bevy::render::render_resource::StencilOperation;
use bevy::render::render_resource::StencilState;
use bevy::shader::ShaderRef;
use bytemuck::Pod;
use bytemuck::Zeroable;

use super::constants::ENVIRONMENT_SHADER_PATH;

/// Which side of a portal window the environment is drawn on.
///
/// The environment compares against a stencil reference that portal windows are
/// expected to write. Neither half exists in this app's default pipeline: Bevy's
/// main-pass depth target has no stencil aspect, so `specialize` leaves the
/// stencil state off, and nothing draws portal windows into the stencil buffer.
/// Switching modes is therefore tracked on the material but not visible on
/// screen until a render target with a stencil aspect and a window pass exist.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StencilTest {
    /// Drawn only inside the portal window - the viewer is outside, looking in
    Equal,
    /// Drawn everywhere except the portal window - the viewer is inside the reality
    #[default]
    NotEqual,
}

impl StencilTest {
    pub const fn for_render_mode(full_rendering: bool) -> Self {
        if full_rendering {
            Self::NotEqual
        } else {
            Self::Equal
        }
    }

    pub const fn compare_function(self) -> CompareFunction {
        match self {
            Self::Equal => CompareFunction::Equal,
            Self::NotEqual => CompareFunction::NotEqual,
        }
    }
}

/// Cubemap environment with a stencil-specialized pipeline
#[derive(Asset, TypePath, AsBindGroup, Clone, Debug)]
#[bind_group_data(EnvironmentMaterialKey)]
pub struct EnvironmentMaterial {
    #[texture(0, dimension = "cube")]
    #[sampler(1)]
    pub texture:      Handle<Image>,
    pub stencil_test: StencilTest,
}

impl EnvironmentMaterial {
    pub fn new(texture: Handle<Image>) -> Self {
        Self {
            texture,
            stencil_test: StencilTest::default(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct EnvironmentMaterialKey {
    stencil_not_equal: u32,
}

impl From<&EnvironmentMaterial> for EnvironmentMaterialKey {
    fn from(material: &EnvironmentMaterial) -> Self {
        Self {
            stencil_not_equal: u32::from(material.stencil_test == StencilTest::NotEqual),
        }
    }
}

impl EnvironmentMaterialKey {
    const fn stencil_test(self) -> StencilTest {
        if self.stencil_not_equal == 0 {
            StencilTest::Equal
        } else {
            StencilTest::NotEqual
        }
    }
}

impl Material for EnvironmentMaterial {
    fn fragment_shader() -> ShaderRef { ENVIRONMENT_SHADER_PATH.into() }

    fn specialize(
        _pipeline: &MaterialPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        // the dome is viewed from the inside
        descriptor.primitive.cull_mode = None;

        // wgpu rejects stencil state on depth-only targets
        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut()
            && depth_stencil.format.has_stencil_aspect()
        {
            let face = StencilFaceState {
                compare:       key.bind_group_data.stencil_test().compare_function(),
                fail_op:       StencilOperation::Keep,
                depth_fail_op: StencilOperation::Keep,
                pass_op:       StencilOperation::Keep,
            };
            depth_stencil.stencil = StencilState {
                front:      face,
                back:       face,
                read_mask:  0xff,
                write_mask: 0,
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_mode_maps_to_stencil_test() {
        assert_eq!(StencilTest::for_render_mode(true), StencilTest::NotEqual);
        assert_eq!(StencilTest::for_render_mode(false), StencilTest::Equal);
        assert_eq!(
            StencilTest::Equal.compare_function(),
            CompareFunction::Equal
        );
    }

    #[test]
    fn key_follows_material_stencil_test() {
        let mut material = EnvironmentMaterial::new(Handle::default());
        assert_eq!(
            EnvironmentMaterialKey::from(&material).stencil_test(),
            StencilTest::NotEqual
        );

        material.stencil_test = StencilTest::Equal;
        assert_eq!(
            EnvironmentMaterialKey::from(&material).stencil_test(),
            StencilTest::Equal
        );
    }
}
