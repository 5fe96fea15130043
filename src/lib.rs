#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod compile;
pub mod emit;
pub mod errors;
pub mod image_io;
pub mod loader;
pub mod pipeline;
pub mod scene;
pub mod settings;
pub mod shader;
pub mod target;
pub mod technique;

pub use compile::{ShaderCache, ShaderToolchain};
pub use emit::{Collaborators, ShadingTree};
pub use errors::{CodegenError, Result};
pub use image_io::{ImageSaveError, save_exr};
pub use loader::{LoaderContext, TextureColor};
pub use pipeline::ShaderPipeline;
pub use scene::{Object, Property, Scene, SceneDatabase};
pub use settings::LoaderOptions;
pub use target::{Target, TargetArchitecture};
pub use technique::{
    CallbackType, ShaderHandle, ShaderKind, TechniqueInfo, TechniqueVariant, TechniqueVariantInfo,
    TechniqueVariantShaderSet, VariantFeatures,
};
