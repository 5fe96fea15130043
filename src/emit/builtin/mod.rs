//! Builtin Collaborators
//!
//! Template-driven emitters covering the stock techniques, cameras, lights
//! and materials. Templates live in `src/emit/templates` and are embedded at
//! build time (see [`templates`]).

pub mod camera;
pub mod device;
pub mod light;
pub mod material;
pub mod technique;
pub mod templates;

pub use camera::TemplateCamera;
pub use device::StandardDevice;
pub use light::TemplateLights;
pub use material::TemplateMaterials;
pub use technique::TemplateTechnique;
