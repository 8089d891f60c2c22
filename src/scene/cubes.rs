//! Instanced cube field: the lit pass with selection highlight, and the
//! id pass used by picking.

use wgpu::util::DeviceExt;

use crate::error::SkylineError;
use crate::gpu::pipeline_helpers::{
    create_scene_pipeline, scene_depth_stencil, single_uniform_bind_group,
    single_uniform_layout, ScenePipelineDesc,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::TARGET_FORMAT;
use crate::picking::id::PickResult;
use crate::scene::instances::{CubeInstanceRaw, InstanceTable};
use crate::scene::mesh::{cube_vertices, mesh_vertex_layout};

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    2 => Float32x3,
    3 => Float32x3,
    4 => Float32x3,
];

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<CubeInstanceRaw>()
            as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRIBUTES,
    }
}

/// Selection uniform matching `CubeParams` in `cubes.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CubeParams {
    selected: i32,
    _pad: [i32; 3],
}

/// GPU resources for the cube field.
pub struct InstancedCubes {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    params_buffer: wgpu::Buffer,
    params_bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
    picking_pipeline: wgpu::RenderPipeline,
    selected: PickResult,
}

impl InstancedCubes {
    /// Upload mesh and instance data and build both pipelines.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::ShaderCompose`] if a cube shader fails.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        camera_layout: &wgpu::BindGroupLayout,
        instances: &InstanceTable,
    ) -> Result<Self, SkylineError> {
        let device = &context.device;
        let mesh = cube_vertices();
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Cube Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh),
                usage: wgpu::BufferUsages::VERTEX,
            });

        // A zero-sized vertex buffer is invalid; keep one zeroed slot and
        // draw zero instances instead.
        let mut raw = instances.to_raw();
        let instance_count = raw.len() as u32;
        if raw.is_empty() {
            raw.push(bytemuck::Zeroable::zeroed());
        }
        let instance_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Cube Instance Buffer"),
                contents: bytemuck::cast_slice(&raw),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let params_layout = single_uniform_layout(
            device,
            "Cube Params Layout",
            wgpu::ShaderStages::VERTEX,
        );
        let params_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Cube Params Buffer"),
                contents: bytemuck::bytes_of(&CubeParams {
                    selected: -1,
                    _pad: [0; 3],
                }),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let params_bind_group = single_uniform_bind_group(
            device,
            "Cube Params Bind Group",
            &params_layout,
            &params_buffer,
        );

        let buffers = [mesh_vertex_layout(), instance_layout()];
        let shader = composer.compose(device, Shader::Cubes)?;
        let pipeline = create_scene_pipeline(
            device,
            &ScenePipelineDesc {
                label: "Cubes",
                shader: &shader,
                bind_group_layouts: &[camera_layout, &params_layout],
                vertex_buffers: &buffers,
                format: TARGET_FORMAT,
                cull_mode: Some(wgpu::Face::Back),
                depth: scene_depth_stencil(true, wgpu::CompareFunction::Less),
            },
        );

        let picking_shader = composer.compose(device, Shader::CubesPicking)?;
        let picking_pipeline = create_scene_pipeline(
            device,
            &ScenePipelineDesc {
                label: "Cubes Picking",
                shader: &picking_shader,
                bind_group_layouts: &[camera_layout],
                vertex_buffers: &buffers,
                format: TARGET_FORMAT,
                cull_mode: Some(wgpu::Face::Back),
                depth: scene_depth_stencil(true, wgpu::CompareFunction::Less),
            },
        );

        Ok(Self {
            vertex_buffer,
            vertex_count: mesh.len() as u32,
            instance_buffer,
            instance_count,
            params_buffer,
            params_bind_group,
            pipeline,
            picking_pipeline,
            selected: PickResult::None,
        })
    }

    /// Number of drawn instances.
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Currently highlighted instance.
    pub fn selected(&self) -> PickResult {
        self.selected
    }

    /// Highlight `selected` (drawn white) from the next lit pass on.
    pub fn set_selected_instance(
        &mut self,
        queue: &wgpu::Queue,
        selected: PickResult,
    ) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::bytes_of(&CubeParams {
                selected: selected.as_i32(),
                _pad: [0; 3],
            }),
        );
    }

    fn draw_instances(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..self.instance_count);
    }

    /// Lit pass. `camera` is bound at group 0.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>, camera: &wgpu::BindGroup) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, &self.params_bind_group, &[]);
        self.draw_instances(pass);
    }

    /// Id pass: every fragment carries its instance's encoded pick id.
    pub fn render_picking(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        camera: &wgpu::BindGroup,
    ) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.picking_pipeline);
        pass.set_bind_group(0, camera, &[]);
        self.draw_instances(pass);
    }
}
