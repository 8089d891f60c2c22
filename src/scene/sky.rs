use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::error::SkylineError;
use crate::gpu::pipeline_helpers::{
    create_scene_pipeline, scene_depth_stencil, single_uniform_bind_group,
    single_uniform_layout, ScenePipelineDesc,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::TARGET_FORMAT;

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct SkyUniform {
    view_direction_projection_inverse: [[f32; 4]; 4],
}

/// Procedural gradient sky drawn as a full-screen triangle pair on the far
/// plane. Depth test is less-equal with writes off, so it only fills pixels
/// no geometry covered.
pub struct Sky {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl Sky {
    /// Build the sky pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::ShaderCompose`] if the sky shader fails.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
    ) -> Result<Self, SkylineError> {
        let device = &context.device;
        let layout = single_uniform_layout(
            device,
            "Sky Bind Group Layout",
            wgpu::ShaderStages::FRAGMENT,
        );
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sky Uniform Buffer"),
                contents: bytemuck::bytes_of(&SkyUniform {
                    view_direction_projection_inverse: Mat4::IDENTITY
                        .to_cols_array_2d(),
                }),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group =
            single_uniform_bind_group(device, "Sky Bind Group", &layout, &buffer);

        let shader = composer.compose(device, Shader::Sky)?;
        let pipeline = create_scene_pipeline(
            device,
            &ScenePipelineDesc {
                label: "Sky",
                shader: &shader,
                bind_group_layouts: &[&layout],
                vertex_buffers: &[],
                format: TARGET_FORMAT,
                cull_mode: None,
                depth: scene_depth_stencil(
                    false,
                    wgpu::CompareFunction::LessEqual,
                ),
            },
        );
        Ok(Self {
            buffer,
            bind_group,
            pipeline,
        })
    }

    /// Upload `inverse(projection * view_direction)`, where
    /// `view_direction` is the view matrix without translation.
    pub fn update(
        &self,
        queue: &wgpu::Queue,
        view_direction: Mat4,
        projection: Mat4,
    ) {
        let uniform = SkyUniform {
            view_direction_projection_inverse: (projection * view_direction)
                .inverse()
                .to_cols_array_2d(),
        };
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Draw the sky. Must come after opaque geometry in the same pass.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..6, 0..1);
    }
}
