use wgpu::util::DeviceExt;

use crate::error::SkylineError;
use crate::gpu::pipeline_helpers::{
    create_scene_pipeline, scene_depth_stencil, ScenePipelineDesc,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::TARGET_FORMAT;
use crate::scene::mesh::{ground_vertices, mesh_vertex_layout};

/// Fogged checkerboard plane at y = 0.
pub struct GroundPlane {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    pipeline: wgpu::RenderPipeline,
}

impl GroundPlane {
    /// Build the plane with half-extent `half_size`.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::ShaderCompose`] if the ground shader fails.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        camera_layout: &wgpu::BindGroupLayout,
        half_size: f32,
    ) -> Result<Self, SkylineError> {
        let vertices = ground_vertices(half_size);
        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Ground Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        let shader = composer.compose(&context.device, Shader::Ground)?;
        let pipeline = create_scene_pipeline(
            &context.device,
            &ScenePipelineDesc {
                label: "Ground",
                shader: &shader,
                bind_group_layouts: &[camera_layout],
                vertex_buffers: &[mesh_vertex_layout()],
                format: TARGET_FORMAT,
                cull_mode: None,
                depth: scene_depth_stencil(true, wgpu::CompareFunction::Less),
            },
        );
        Ok(Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            pipeline,
        })
    }

    /// Draw the plane. `camera` is bound at group 0.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>, camera: &wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}
