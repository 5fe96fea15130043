//! Scene description consumed by the code generator.
//!
//! - [`Object`]: one named plugin instance with typed properties
//! - [`Scene`]: the parsed scene, grouped by plugin category
//! - [`SceneDatabase`]: runtime buffers the generated programs bind against
//!
//! Parsing scene files is the job of an external frontend; this module only
//! holds its output.

pub mod database;
pub mod object;
pub mod scene;

pub use database::SceneDatabase;
pub use object::{Object, Property};
pub use scene::Scene;
