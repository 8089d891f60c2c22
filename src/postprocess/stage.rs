//! Full-screen stages: the shared screen quad, the stage catalogue, and the
//! per-format pipeline cache.

use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::error::SkylineError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, texture_2d,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};

/// One full-screen pass type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Identity copy.
    Copy,
    /// Multiply by the brightness factor.
    Brighten,
    /// 9-tap Gaussian along x.
    BlurHorizontal,
    /// 9-tap Gaussian along y.
    BlurVertical,
    /// Dual-Kawase down-sample into the first quadrant.
    KawaseDown,
    /// Dual-Kawase up-sample from the first quadrant.
    KawaseUp,
}

/// Sampler filtering used to read a stage's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerFilter {
    /// Exact texel reads.
    Nearest,
    /// Bilinear reads.
    Linear,
}

impl StageKind {
    /// Debug label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Copy => "Copy",
            Self::Brighten => "Brighten",
            Self::BlurHorizontal => "Blur Horizontal",
            Self::BlurVertical => "Blur Vertical",
            Self::KawaseDown => "Kawase Down",
            Self::KawaseUp => "Kawase Up",
        }
    }

    /// Shader implementing this stage.
    pub fn shader(self) -> Shader {
        match self {
            Self::Copy => Shader::Copy,
            Self::Brighten => Shader::Brighten,
            Self::BlurHorizontal | Self::BlurVertical => Shader::Blur,
            Self::KawaseDown => Shader::KawaseDown,
            Self::KawaseUp => Shader::KawaseUp,
        }
    }

    /// Fragment entry point within [`Self::shader`].
    pub fn fragment_entry(self) -> &'static str {
        match self {
            Self::BlurHorizontal => "fs_horizontal",
            Self::BlurVertical => "fs_vertical",
            _ => "fs_main",
        }
    }

    /// Input sampler filtering. Kawase taps land between texels and rely on
    /// bilinear filtering; everything else reads exact texels.
    pub fn filter(self) -> SamplerFilter {
        match self {
            Self::KawaseDown | Self::KawaseUp => SamplerFilter::Linear,
            _ => SamplerFilter::Nearest,
        }
    }
}

/// Screen-quad vertex: NDC position and texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    /// Position in normalized device coordinates.
    pub position: [f32; 2],
    /// Texture coordinate, v pointing down.
    pub tex_coord: [f32; 2],
}

const fn quad_vertex(x: f32, y: f32) -> QuadVertex {
    QuadVertex {
        position: [x, y],
        tex_coord: [(x + 1.0) * 0.5, (1.0 - y) * 0.5],
    }
}

/// Two triangles covering NDC `[-1, 1]^2`. Texture rows start at the top,
/// so v is flipped relative to NDC y and a copy is the identity.
pub const QUAD_VERTICES: [QuadVertex; 6] = [
    quad_vertex(-1.0, -1.0),
    quad_vertex(1.0, -1.0),
    quad_vertex(-1.0, 1.0),
    quad_vertex(-1.0, 1.0),
    quad_vertex(1.0, -1.0),
    quad_vertex(1.0, 1.0),
];

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

/// The shared screen quad: position + tex-coord vertex buffer.
pub struct ScreenQuad {
    buffer: wgpu::Buffer,
}

impl ScreenQuad {
    /// Upload the quad.
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Screen Quad Vertex Buffer"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });
        Self { buffer }
    }

    /// Vertex layout matching `vs_main(@location(0), @location(1))`.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<QuadVertex>()
                as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &QUAD_ATTRIBUTES,
        }
    }

    /// Bind the quad and draw it.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.buffer.slice(..));
        pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }
}

/// Stage uniform: brightness factor, padded to 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StageParams {
    /// Brighten multiplier.
    pub brightness: f32,
    _pad: [f32; 3],
}

impl StageParams {
    /// Params for a brightness factor.
    pub fn new(brightness: f32) -> Self {
        Self {
            brightness,
            _pad: [0.0; 3],
        }
    }
}

/// Bind group layout shared by every stage: input texture, sampler, params.
pub fn stage_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Stage Bind Group Layout"),
        entries: &[
            texture_2d(0),
            filtering_sampler(1),
            uniform_buffer(2, wgpu::ShaderStages::FRAGMENT),
        ],
    })
}

/// Render pipelines keyed by stage and output format.
///
/// Intermediate stages render to the offscreen target format; the final
/// stage renders to the presentation format, which may differ.
pub struct StagePipelines {
    pipelines: FxHashMap<(StageKind, wgpu::TextureFormat), wgpu::RenderPipeline>,
}

impl StagePipelines {
    /// Build a pipeline for every `(stage, format)` pair requested.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::ShaderCompose`] if a stage shader fails.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        layout: &wgpu::BindGroupLayout,
        keys: impl IntoIterator<Item = (StageKind, wgpu::TextureFormat)>,
    ) -> Result<Self, SkylineError> {
        let mut modules: FxHashMap<Shader, wgpu::ShaderModule> =
            FxHashMap::default();
        let mut pipelines = FxHashMap::default();
        for (stage, format) in keys {
            if pipelines.contains_key(&(stage, format)) {
                continue;
            }
            let shader = stage.shader();
            if !modules.contains_key(&shader) {
                let module = composer.compose(&context.device, shader)?;
                let _ = modules.insert(shader, module);
            }
            let Some(module) = modules.get(&shader) else {
                continue;
            };
            let pipeline = create_screen_space_pipeline(
                &context.device,
                stage.label(),
                module,
                stage.fragment_entry(),
                format,
                &[ScreenQuad::layout()],
                &[layout],
            );
            let _ = pipelines.insert((stage, format), pipeline);
        }
        Ok(Self { pipelines })
    }

    /// Pipeline for `stage` writing `format`, if it was built.
    pub fn get(
        &self,
        stage: StageKind,
        format: wgpu::TextureFormat,
    ) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&(stage, format))
    }

    /// Number of pipelines built.
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Whether no pipeline was built.
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_covers_ndc_with_flipped_v() {
        let bottom_left = QUAD_VERTICES[0];
        assert_eq!(bottom_left.position, [-1.0, -1.0]);
        assert_eq!(bottom_left.tex_coord, [0.0, 1.0]);
        let top_right = QUAD_VERTICES[5];
        assert_eq!(top_right.position, [1.0, 1.0]);
        assert_eq!(top_right.tex_coord, [1.0, 0.0]);
    }

    #[test]
    fn quad_triangles_are_counter_clockwise() {
        for tri in QUAD_VERTICES.chunks(3) {
            let [a, b, c] = [tri[0].position, tri[1].position, tri[2].position];
            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0);
        }
    }

    #[test]
    fn stage_params_are_one_vec4() {
        assert_eq!(size_of::<StageParams>(), 16);
    }

    #[test]
    fn only_kawase_stages_filter_linearly() {
        assert_eq!(StageKind::KawaseDown.filter(), SamplerFilter::Linear);
        assert_eq!(StageKind::KawaseUp.filter(), SamplerFilter::Linear);
        assert_eq!(StageKind::Copy.filter(), SamplerFilter::Nearest);
        assert_eq!(StageKind::BlurVertical.filter(), SamplerFilter::Nearest);
    }

    #[test]
    fn blur_directions_share_a_shader() {
        assert_eq!(StageKind::BlurHorizontal.shader(), Shader::Blur);
        assert_eq!(StageKind::BlurVertical.shader(), Shader::Blur);
        assert_ne!(
            StageKind::BlurHorizontal.fragment_entry(),
            StageKind::BlurVertical.fragment_entry()
        );
    }
}
