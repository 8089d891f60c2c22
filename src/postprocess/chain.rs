//! Ping-pong chain of full-screen stages.
//!
//! A recipe is first planned into a flat list of [`StagePass`]es over three
//! slots: the scene target (A) and two ping-pong targets (B, C). The plan is
//! pure data, so its routing rules are unit tested; [`PostProcessChain`]
//! then owns the GPU resources and encodes the plan each frame.

use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::error::SkylineError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::pipeline_helpers::{linear_sampler, nearest_sampler};
use crate::gpu::texture::{begin_color_pass, OffscreenTarget, TARGET_FORMAT};
use crate::postprocess::stage::{
    stage_bind_group_layout, SamplerFilter, ScreenQuad, StageKind,
    StageParams, StagePipelines,
};

/// A chain input/output slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetSlot {
    /// The primary scene target (A).
    Scene,
    /// First ping-pong target (B).
    Ping,
    /// Second ping-pong target (C).
    Pong,
}

/// Where a stage writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutput {
    /// An offscreen slot.
    Target(TargetSlot),
    /// The presentation surface (or headless present target).
    Screen,
}

/// One planned full-screen pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagePass {
    /// Stage to run.
    pub stage: StageKind,
    /// Slot sampled as input.
    pub input: TargetSlot,
    /// Slot or surface written.
    pub output: PassOutput,
}

impl StagePass {
    const fn new(stage: StageKind, input: TargetSlot, output: PassOutput) -> Self {
        Self {
            stage,
            input,
            output,
        }
    }
}

/// Post-processing recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainRecipe {
    /// Copy, `iterations` horizontal+vertical Gaussian rounds, brighten.
    Bloom {
        /// Blur rounds; zero skips blurring.
        iterations: u32,
    },
    /// Two Kawase down-samples, two up-samples, copy.
    DualKawase,
    /// Straight copy of the scene to the screen.
    Passthrough,
}

/// Flatten a recipe into passes.
///
/// Every plan starts from [`TargetSlot::Scene`], ends with exactly one
/// [`PassOutput::Screen`] pass, and never samples the slot it writes.
pub fn plan(recipe: ChainRecipe) -> Vec<StagePass> {
    use PassOutput::{Screen, Target};
    use TargetSlot::{Ping, Pong, Scene};

    match recipe {
        ChainRecipe::Bloom { iterations } => {
            let mut passes = Vec::with_capacity(2 + 2 * iterations as usize);
            passes.push(StagePass::new(StageKind::Copy, Scene, Target(Ping)));
            for _ in 0..iterations {
                passes.push(StagePass::new(
                    StageKind::BlurHorizontal,
                    Ping,
                    Target(Pong),
                ));
                passes.push(StagePass::new(
                    StageKind::BlurVertical,
                    Pong,
                    Target(Ping),
                ));
            }
            passes.push(StagePass::new(StageKind::Brighten, Ping, Screen));
            passes
        }
        ChainRecipe::DualKawase => vec![
            StagePass::new(StageKind::KawaseDown, Scene, Target(Ping)),
            StagePass::new(StageKind::KawaseDown, Ping, Target(Pong)),
            StagePass::new(StageKind::KawaseUp, Pong, Target(Ping)),
            StagePass::new(StageKind::KawaseUp, Ping, Target(Pong)),
            StagePass::new(StageKind::Copy, Pong, Screen),
        ],
        ChainRecipe::Passthrough => {
            vec![StagePass::new(StageKind::Copy, Scene, Screen)]
        }
    }
}

/// Owns the ping-pong targets, stage pipelines, and per-input bind groups,
/// and encodes the planned passes.
pub struct PostProcessChain {
    recipe: ChainRecipe,
    passes: Vec<StagePass>,
    ping: OffscreenTarget,
    pong: OffscreenTarget,
    quad: ScreenQuad,
    pipelines: StagePipelines,
    bind_groups: FxHashMap<(TargetSlot, SamplerFilter), wgpu::BindGroup>,
    params_buffer: wgpu::Buffer,
    screen_format: wgpu::TextureFormat,
    size: (u32, u32),
}

impl PostProcessChain {
    /// Allocate ping-pong targets the size of `scene_target` and build the
    /// pipelines `recipe` needs. The final pass renders in the context's
    /// surface format.
    ///
    /// # Errors
    ///
    /// Returns an error if target allocation or shader composition fails.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        scene_target: &OffscreenTarget,
        recipe: ChainRecipe,
        brightness: f32,
    ) -> Result<Self, SkylineError> {
        let size = scene_target.size();
        let ping = OffscreenTarget::new(context, "Post Ping", false, Some(size))?;
        let pong = OffscreenTarget::new(context, "Post Pong", false, Some(size))?;
        let quad = ScreenQuad::new(&context.device);
        let layout = stage_bind_group_layout(&context.device);
        let screen_format = context.format();
        let passes = plan(recipe);

        let pipelines = StagePipelines::new(
            context,
            composer,
            &layout,
            passes.iter().map(|p| {
                let format = match p.output {
                    PassOutput::Screen => screen_format,
                    PassOutput::Target(_) => TARGET_FORMAT,
                };
                (p.stage, format)
            }),
        )?;

        let params_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Stage Params Buffer"),
                contents: bytemuck::bytes_of(&StageParams::new(brightness)),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let nearest = nearest_sampler(&context.device, "Stage Nearest Sampler");
        let linear = linear_sampler(&context.device, "Stage Linear Sampler");
        let mut bind_groups = FxHashMap::default();
        for (slot, view) in [
            (TargetSlot::Scene, scene_target.view()),
            (TargetSlot::Ping, ping.view()),
            (TargetSlot::Pong, pong.view()),
        ] {
            for (filter, sampler) in [
                (SamplerFilter::Nearest, &nearest),
                (SamplerFilter::Linear, &linear),
            ] {
                let bind_group = context.device.create_bind_group(
                    &wgpu::BindGroupDescriptor {
                        label: Some("Stage Bind Group"),
                        layout: &layout,
                        entries: &[
                            wgpu::BindGroupEntry {
                                binding: 0,
                                resource: wgpu::BindingResource::TextureView(
                                    view,
                                ),
                            },
                            wgpu::BindGroupEntry {
                                binding: 1,
                                resource: wgpu::BindingResource::Sampler(
                                    sampler,
                                ),
                            },
                            wgpu::BindGroupEntry {
                                binding: 2,
                                resource: params_buffer.as_entire_binding(),
                            },
                        ],
                    },
                );
                let _ = bind_groups.insert((slot, filter), bind_group);
            }
        }

        log::debug!(
            "post-process chain {recipe:?}: {} passes, {} pipelines",
            passes.len(),
            pipelines.len()
        );

        Ok(Self {
            recipe,
            passes,
            ping,
            pong,
            quad,
            pipelines,
            bind_groups,
            params_buffer,
            screen_format,
            size,
        })
    }

    /// The recipe this chain was built for.
    pub fn recipe(&self) -> ChainRecipe {
        self.recipe
    }

    /// The planned passes, in execution order.
    pub fn passes(&self) -> &[StagePass] {
        &self.passes
    }

    /// Update the brighten factor.
    pub fn set_brightness(&self, queue: &wgpu::Queue, brightness: f32) {
        queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::bytes_of(&StageParams::new(brightness)),
        );
    }

    fn target(&self, slot: TargetSlot) -> Option<&OffscreenTarget> {
        match slot {
            TargetSlot::Ping => Some(&self.ping),
            TargetSlot::Pong => Some(&self.pong),
            TargetSlot::Scene => None,
        }
    }

    /// Encode every planned pass. The last one writes `final_view`, which
    /// must have the context's surface format and the chain's size.
    pub fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        final_view: &wgpu::TextureView,
    ) {
        for pass in &self.passes {
            let format = match pass.output {
                PassOutput::Screen => self.screen_format,
                PassOutput::Target(_) => TARGET_FORMAT,
            };
            let (Some(pipeline), Some(bind_group)) = (
                self.pipelines.get(pass.stage, format),
                self.bind_groups.get(&(pass.input, pass.stage.filter())),
            ) else {
                log::warn!("missing resources for {:?}, skipping", pass.stage);
                continue;
            };

            let draw = |render_pass: &mut wgpu::RenderPass<'_>| {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, bind_group, &[]);
                self.quad.draw(render_pass);
            };

            match pass.output {
                PassOutput::Target(slot) => {
                    let Some(target) = self.target(slot) else {
                        log::warn!("{:?} cannot write {slot:?}", pass.stage);
                        continue;
                    };
                    target.bind(encoder, Some(wgpu::Color::BLACK), draw);
                }
                PassOutput::Screen => {
                    let mut render_pass = begin_color_pass(
                        encoder,
                        pass.stage.label(),
                        final_view,
                        None,
                        Some(wgpu::Color::BLACK),
                    );
                    render_pass.set_viewport(
                        0.0,
                        0.0,
                        self.size.0 as f32,
                        self.size.1 as f32,
                        0.0,
                        1.0,
                    );
                    draw(&mut render_pass);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipes() -> Vec<ChainRecipe> {
        vec![
            ChainRecipe::Bloom { iterations: 0 },
            ChainRecipe::Bloom { iterations: 1 },
            ChainRecipe::Bloom { iterations: 5 },
            ChainRecipe::DualKawase,
            ChainRecipe::Passthrough,
        ]
    }

    #[test]
    fn no_pass_reads_its_own_output() {
        for recipe in recipes() {
            for pass in plan(recipe) {
                assert_ne!(pass.output, PassOutput::Target(pass.input), "{recipe:?}");
            }
        }
    }

    #[test]
    fn exactly_the_last_pass_writes_the_screen() {
        for recipe in recipes() {
            let passes = plan(recipe);
            let screen: Vec<usize> = passes
                .iter()
                .enumerate()
                .filter(|(_, p)| p.output == PassOutput::Screen)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(screen, vec![passes.len() - 1], "{recipe:?}");
        }
    }

    #[test]
    fn each_pass_reads_what_the_previous_wrote() {
        for recipe in recipes() {
            let passes = plan(recipe);
            assert_eq!(passes[0].input, TargetSlot::Scene);
            for pair in passes.windows(2) {
                assert_eq!(pair[0].output, PassOutput::Target(pair[1].input));
            }
        }
    }

    #[test]
    fn scene_target_is_never_written() {
        for recipe in recipes() {
            assert!(plan(recipe)
                .iter()
                .all(|p| p.output != PassOutput::Target(TargetSlot::Scene)));
        }
    }

    #[test]
    fn bloom_pass_count_grows_with_iterations() {
        assert_eq!(plan(ChainRecipe::Bloom { iterations: 0 }).len(), 2);
        assert_eq!(plan(ChainRecipe::Bloom { iterations: 5 }).len(), 12);
        let stages: Vec<StageKind> = plan(ChainRecipe::Bloom { iterations: 1 })
            .iter()
            .map(|p| p.stage)
            .collect();
        assert_eq!(
            stages,
            vec![
                StageKind::Copy,
                StageKind::BlurHorizontal,
                StageKind::BlurVertical,
                StageKind::Brighten,
            ]
        );
    }

    #[test]
    fn dual_kawase_balances_downs_and_ups() {
        let passes = plan(ChainRecipe::DualKawase);
        let downs = passes.iter().filter(|p| p.stage == StageKind::KawaseDown).count();
        let ups = passes.iter().filter(|p| p.stage == StageKind::KawaseUp).count();
        assert_eq!(downs, 2);
        assert_eq!(ups, 2);
        assert_eq!(passes.last().map(|p| p.stage), Some(StageKind::Copy));
    }
}
