//! The frame orchestrator.
//!
//! [`CityEngine`] owns every GPU subsystem and runs them in a fixed order
//! each frame: input, pick, highlight, scene, post-process, present.

mod frame;
mod input;
mod options;

use crate::camera::orbit::OrbitCamera;
use crate::error::SkylineError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::OffscreenTarget;
use crate::input::InputState;
use crate::options::Options;
use crate::picking::id::PickResult;
use crate::picking::picker::PixelPicker;
use crate::postprocess::chain::PostProcessChain;
use crate::scene::{CityScene, InstanceTable};
use crate::util::frame_timing::FrameTiming;

/// Size-dependent render targets, rebuilt together on resize.
struct FrameTargets {
    /// Scene color + depth, input slot of the chain.
    primary: OffscreenTarget,
    chain: PostProcessChain,
    /// Final-stage output when there is no surface.
    present: Option<OffscreenTarget>,
}

impl FrameTargets {
    fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        options: &Options,
    ) -> Result<Self, SkylineError> {
        let primary = OffscreenTarget::new(context, "Primary", true, None)?;
        let chain = PostProcessChain::new(
            context,
            composer,
            &primary,
            options.post_processing.chain_recipe(),
            options.post_processing.brightness,
        )?;
        let present = if context.has_surface() {
            None
        } else {
            Some(OffscreenTarget::new(context, "Present", false, None)?)
        };
        let (width, height) = primary.size();
        log::info!(
            "frame targets {width}x{height}, chain {:?}",
            chain.recipe()
        );
        Ok(Self {
            primary,
            chain,
            present,
        })
    }
}

/// Drives one city scene: camera, hover picking, highlight, and the
/// post-processing chain.
pub struct CityEngine {
    context: RenderContext,
    composer: ShaderComposer,
    options: Options,
    camera: OrbitCamera,
    input: InputState,
    picker: PixelPicker,
    scene: CityScene,
    targets: FrameTargets,
    timing: FrameTiming,
    picked: PickResult,
}

impl CityEngine {
    /// Build the engine with a cube field generated from
    /// `options.scene`.
    ///
    /// # Errors
    ///
    /// Fails if instance generation, shader composition, or target
    /// allocation fails. All of these are fatal at startup.
    pub fn new(
        context: RenderContext,
        options: Options,
    ) -> Result<Self, SkylineError> {
        let instances =
            InstanceTable::generate(&options.scene.instance_cloud())?;
        Self::with_instances(context, options, instances)
    }

    /// Build the engine around an explicit instance table.
    ///
    /// # Errors
    ///
    /// Fails if shader composition or target allocation fails.
    pub fn with_instances(
        context: RenderContext,
        options: Options,
        instances: InstanceTable,
    ) -> Result<Self, SkylineError> {
        let mut composer = ShaderComposer::new()?;
        let (width, height) = context.backing_size();
        let camera =
            OrbitCamera::new(&options.camera, width as f32 / height as f32);
        let input = InputState::new(options.camera.amortization);
        let picker = PixelPicker::new(&context)?;
        let scene = CityScene::new(
            &context,
            &mut composer,
            instances,
            options.scene.ground_half_size,
        )?;
        let targets = FrameTargets::new(&context, &mut composer, &options)?;
        let timing = FrameTiming::new(options.display.target_fps);

        Ok(Self {
            context,
            composer,
            options,
            camera,
            input,
            picker,
            scene,
            targets,
            timing,
            picked: PickResult::None,
        })
    }

    /// The GPU context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The orbit camera.
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Mutable orbit camera, for scripted poses.
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// The scene being drawn.
    pub fn scene(&self) -> &CityScene {
        &self.scene
    }

    /// Instance under the pointer as of the last frame.
    pub fn picked(&self) -> PickResult {
        self.picked
    }

    /// Smoothed frames per second.
    pub fn fps(&self) -> f32 {
        self.timing.fps()
    }

    /// Read one pixel of the final image in headless mode. `(x, y)` is
    /// top-origin.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Readback`] when the engine presents to a
    /// surface or the read fails.
    pub fn read_present_pixel(
        &self,
        x: u32,
        y: u32,
    ) -> Result<[u8; 4], SkylineError> {
        let Some(present) = &self.targets.present else {
            return Err(SkylineError::Readback(
                "engine presents to a surface".to_owned(),
            ));
        };
        present.read_pixel(&self.context, x, y)
    }

    /// Read one pixel of the primary scene target, before post-processing.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Readback`] if the read fails.
    pub fn read_scene_pixel(
        &self,
        x: u32,
        y: u32,
    ) -> Result<[u8; 4], SkylineError> {
        self.targets.primary.read_pixel(&self.context, x, y)
    }

    /// Resize to a new backing size. Zero sizes are ignored.
    ///
    /// Targets are reallocated, never resized in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the new targets cannot be allocated.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<(), SkylineError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.context.resize(width, height);
        self.camera.aspect = width as f32 / height as f32;
        self.rebuild_targets()
    }

    /// Update the display scale factor (device pixels per client pixel).
    pub fn set_scale_factor(&mut self, scale: f64) {
        self.context.set_scale_factor(scale);
    }

    fn rebuild_targets(&mut self) -> Result<(), SkylineError> {
        let targets =
            FrameTargets::new(&self.context, &mut self.composer, &self.options)?;
        let old = std::mem::replace(&mut self.targets, targets);
        old.primary.destroy();
        if let Some(present) = old.present {
            present.destroy();
        }
        Ok(())
    }
}
