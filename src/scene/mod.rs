//! The city scene: ground plane, instanced cubes, and sky, plus the two
//! camera bindings (lit pass and pick pass) they draw with.

/// Instanced cube field.
pub mod cubes;
/// Checkerboard ground plane.
pub mod ground;
/// Cube instance table and seeded generation.
pub mod instances;
/// Static cube and ground geometry.
pub mod mesh;
/// Procedural far-plane sky.
pub mod sky;

use glam::Mat4;

use crate::camera::core::CameraBinding;
use crate::error::SkylineError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::picking::id::PickResult;

pub use cubes::InstancedCubes;
pub use ground::GroundPlane;
pub use instances::{CubeInstance, InstanceCloud, InstanceTable};
pub use sky::Sky;

/// Everything drawn into the primary target, and the id pass.
pub struct CityScene {
    instances: InstanceTable,
    camera: CameraBinding,
    picking_camera: CameraBinding,
    ground: GroundPlane,
    cubes: InstancedCubes,
    sky: Sky,
}

impl CityScene {
    /// Build all scene pipelines and upload `instances`.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::ShaderCompose`] if a scene shader fails.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        instances: InstanceTable,
        ground_half_size: f32,
    ) -> Result<Self, SkylineError> {
        let camera_layout = CameraBinding::layout(&context.device);
        let camera =
            CameraBinding::new(&context.device, &camera_layout, "Scene");
        let picking_camera =
            CameraBinding::new(&context.device, &camera_layout, "Picking");
        let ground = GroundPlane::new(
            context,
            composer,
            &camera_layout,
            ground_half_size,
        )?;
        let cubes =
            InstancedCubes::new(context, composer, &camera_layout, &instances)?;
        let sky = Sky::new(context, composer)?;
        log::info!("scene ready: {} cubes", instances.len());
        Ok(Self {
            instances,
            camera,
            picking_camera,
            ground,
            cubes,
            sky,
        })
    }

    /// The instance table, in pick-index order.
    pub fn instances(&self) -> &InstanceTable {
        &self.instances
    }

    /// Number of pickable instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Upload the lit-pass camera. `view_direction` is `view` without
    /// translation, for the sky.
    pub fn update_camera(
        &self,
        queue: &wgpu::Queue,
        view: Mat4,
        view_direction: Mat4,
        projection: Mat4,
    ) {
        self.camera.update(queue, view, projection);
        self.sky.update(queue, view_direction, projection);
    }

    /// Upload the pick-pass camera (pixel-sized projection).
    pub fn update_picking_camera(
        &self,
        queue: &wgpu::Queue,
        view: Mat4,
        projection: Mat4,
    ) {
        self.picking_camera.update(queue, view, projection);
    }

    /// Highlight the picked instance.
    pub fn set_selected_instance(
        &mut self,
        queue: &wgpu::Queue,
        selected: PickResult,
    ) {
        self.cubes.set_selected_instance(queue, selected);
    }

    /// Currently highlighted instance.
    pub fn selected_instance(&self) -> PickResult {
        self.cubes.selected()
    }

    /// Lit pass: ground, cubes, then sky behind everything.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.ground.render(pass, self.camera.bind_group());
        self.cubes.render(pass, self.camera.bind_group());
        self.sky.render(pass);
    }

    /// Id pass: only pickable geometry.
    pub fn render_picking(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.cubes.render_picking(pass, self.picking_camera.bind_group());
    }
}
