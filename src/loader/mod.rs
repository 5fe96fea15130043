//! Scene loading state shared by all generators.
//!
//! - [`LoaderContext`]: the compilation context
//! - [`ResourceRegistry`]: image/texture index allocation
//! - [`TextureColor`]: texture-or-constant inputs
//! - [`ior`]: named indices of refraction

pub mod context;
pub mod ior;
pub mod registry;
pub mod texture_color;

pub use context::{DEFAULT_COLOR, LoaderContext};
pub use ior::DEFAULT_IOR;
pub use registry::ResourceRegistry;
pub use texture_color::TextureColor;
