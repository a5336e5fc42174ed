use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::MolvisError;

/// Shared WGSL modules, registered in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/frame.wgsl"),
        file_path: "modules/frame.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/raycast.wgsl"),
        file_path: "modules/raycast.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/lighting.wgsl"),
        file_path: "modules/lighting.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/wboit.wgsl"),
        file_path: "modules/wboit.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
        file_path: "modules/fullscreen.wgsl",
    },
];

struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Top-level shaders built into pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shader {
    /// Instanced atoms, bonds and labels (all render modes).
    Molecule,
    /// Full-screen WBOIT resolve.
    WboitComposite,
}

impl Shader {
    /// Every top-level shader.
    pub const ALL: [Self; 2] = [Self::Molecule, Self::WboitComposite];

    fn source(self) -> &'static str {
        match self {
            Self::Molecule => {
                include_str!("../../assets/shaders/raster/molecule.wgsl")
            }
            Self::WboitComposite => {
                include_str!("../../assets/shaders/screen/wboit_composite.wgsl")
            }
        }
    }

    fn file_path(self) -> &'static str {
        match self {
            Self::Molecule => "raster/molecule.wgsl",
            Self::WboitComposite => "screen/wboit_composite.wgsl",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Molecule => "Molecule Shader",
            Self::WboitComposite => "WBOIT Composite Shader",
        }
    }
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import molvis::*` support.
///
/// The composer produces `naga::Module` IR directly, skipping a WGSL
/// re-parse inside wgpu.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, MolvisError> {
        let mut composer = Composer::default();
        for m in MODULES {
            let registered = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map(|_| ());
            if let Err(e) = registered {
                return Err(MolvisError::Shader(format!(
                    "module '{}': {}",
                    m.file_path,
                    e.emit_to_string(&composer)
                )));
            }
        }
        Ok(Self { composer })
    }

    /// Compose `shader` into a `wgpu::ShaderModule`.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        shader: Shader,
    ) -> Result<wgpu::ShaderModule, MolvisError> {
        let module = self.compose_naga(shader).map_err(|e| {
            MolvisError::Shader(format!(
                "'{}': {}",
                shader.file_path(),
                e.emit_to_string(&self.composer)
            ))
        })?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.label()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
        }))
    }

    /// Compose into naga IR without a device.
    ///
    /// # Errors
    ///
    /// Returns the composer error if `#import` resolution or parsing fails.
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
    fn molecule_shader_exposes_pipeline_entry_points() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer.compose_naga(Shader::Molecule).unwrap();
        let names: Vec<&str> =
            module.entry_points.iter().map(|e| e.name.as_str()).collect();
        for expected in ["vs_main", "fs_main", "fs_transparent"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }
}
