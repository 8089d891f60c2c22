use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::SkylineError;

/// Every top-level shader the crate builds pipelines from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shader {
    /// Full-screen identity copy.
    Copy,
    /// Full-screen multiply by a brightness factor.
    Brighten,
    /// Separable 9-tap Gaussian (`fs_horizontal` / `fs_vertical`).
    Blur,
    /// Dual-Kawase down-sample.
    KawaseDown,
    /// Dual-Kawase up-sample.
    KawaseUp,
    /// Lit instanced cubes with selection highlight.
    Cubes,
    /// Instanced cubes writing encoded pick ids.
    CubesPicking,
    /// Fogged checkerboard ground plane.
    Ground,
    /// Procedural sky drawn at the far plane.
    Sky,
}

impl Shader {
    /// All shaders, for exhaustive validation.
    pub const ALL: [Self; 9] = [
        Self::Copy,
        Self::Brighten,
        Self::Blur,
        Self::KawaseDown,
        Self::KawaseUp,
        Self::Cubes,
        Self::CubesPicking,
        Self::Ground,
        Self::Sky,
    ];

    /// WGSL source text.
    pub fn source(self) -> &'static str {
        match self {
            Self::Copy => {
                include_str!("../../assets/shaders/screen/copy.wgsl")
            }
            Self::Brighten => {
                include_str!("../../assets/shaders/screen/brighten.wgsl")
            }
            Self::Blur => {
                include_str!("../../assets/shaders/screen/blur.wgsl")
            }
            Self::KawaseDown => {
                include_str!("../../assets/shaders/screen/kawase_down.wgsl")
            }
            Self::KawaseUp => {
                include_str!("../../assets/shaders/screen/kawase_up.wgsl")
            }
            Self::Cubes => {
                include_str!("../../assets/shaders/raster/cubes.wgsl")
            }
            Self::CubesPicking => {
                include_str!("../../assets/shaders/raster/cubes_picking.wgsl")
            }
            Self::Ground => {
                include_str!("../../assets/shaders/raster/ground.wgsl")
            }
            Self::Sky => include_str!("../../assets/shaders/raster/sky.wgsl"),
        }
    }

    /// Path reported in composer diagnostics.
    pub fn file_path(self) -> &'static str {
        match self {
            Self::Copy => "screen/copy.wgsl",
            Self::Brighten => "screen/brighten.wgsl",
            Self::Blur => "screen/blur.wgsl",
            Self::KawaseDown => "screen/kawase_down.wgsl",
            Self::KawaseUp => "screen/kawase_up.wgsl",
            Self::Cubes => "raster/cubes.wgsl",
            Self::CubesPicking => "raster/cubes_picking.wgsl",
            Self::Ground => "raster/ground.wgsl",
            Self::Sky => "raster/sky.wgsl",
        }
    }
}

/// Shared module definition: source and the path used in diagnostics.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared WGSL modules, in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
        file_path: "modules/fullscreen.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/camera.wgsl"),
        file_path: "modules/camera.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/pick_id.wgsl"),
        file_path: "modules/pick_id.wgsl",
    },
];

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules (`skyline::fullscreen`,
/// `skyline::camera`, `skyline::pick_id`) at construction time. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Create a composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::ShaderCompose`] if a shared module fails to
    /// parse.
    pub fn new() -> Result<Self, SkylineError> {
        let mut composer = Composer::default();
        for m in MODULES {
            if let Err(e) =
                composer.add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
            {
                let message = e.emit_to_string(&composer);
                return Err(SkylineError::ShaderCompose {
                    shader: m.file_path,
                    message,
                });
            }
        }
        Ok(Self { composer })
    }

    /// Compose `shader` into a `wgpu::ShaderModule` ready for pipeline
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::ShaderCompose`] with the composer's
    /// diagnostic if composition or validation fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        shader: Shader,
    ) -> Result<wgpu::ShaderModule, SkylineError> {
        let naga_module = self.compose_naga(shader).map_err(|e| {
            SkylineError::ShaderCompose {
                shader: shader.file_path(),
                message: e.emit_to_string(&self.composer),
            }
        })?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.file_path()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader into a `naga::Module` without creating a wgpu shader
    /// module. Useful for validating shaders without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns the composer error if `#import` resolution, parsing, or
    /// validation fails.
    pub fn compose_naga(
        &mut self,
        shader: Shader,
    ) -> Result<naga::Module, Box<ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source(),
                file_path: shader.file_path(),
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in Shader::ALL {
            if let Err(e) = composer.compose_naga(shader) {
                panic!(
                    "{} failed to compose: {}",
                    shader.file_path(),
                    e.emit_to_string(&composer.composer)
                );
            }
        }
    }

    #[test]
    fn blur_exposes_both_directions() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer.compose_naga(Shader::Blur).unwrap();
        let names: Vec<&str> = module
            .entry_points
            .iter()
            .map(|ep| ep.name.as_str())
            .collect();
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"fs_horizontal"));
        assert!(names.contains(&"fs_vertical"));
    }

    #[test]
    fn picking_shader_has_flat_fragment_entry() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer.compose_naga(Shader::CubesPicking).unwrap();
        assert!(module
            .entry_points
            .iter()
            .any(|ep| ep.stage == naga::ShaderStage::Fragment));
    }
}
