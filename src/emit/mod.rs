//! Collaborator Contracts
//!
//! Entry-point generators never build technique, camera, light, material or
//! device text themselves. They call the narrow traits below, bundled in
//! [`Collaborators`], and splice the returned fragments verbatim.
//!
//! Every fragment a collaborator returns is a block of already-indented body
//! lines without a trailing newline. Fragments that introduce a value bind it
//! under a fixed name the dispatch call refers to:
//!
//! | Collaborator | Binds |
//! |--------------|-------|
//! | [`TechniqueEmitter::generate`] | `technique` |
//! | [`TechniqueEmitter::generate_callback`] | `callback` |
//! | [`CameraEmitter::generate`] | `camera` |
//! | [`MaterialEmitter::generate`] | `shader` |
//!
//! [`builtin`] provides a template-driven implementation of each contract.

pub mod builtin;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt::Write as _;

use glam::Vec3;

use crate::errors::Result;
use crate::loader::{LoaderContext, TextureColor};
use crate::scene::{Object, Scene};
use crate::target::Target;
use crate::technique::{CallbackType, TechniqueInfo};

// ============================================================================
// Traits
// ============================================================================

pub trait TechniqueEmitter: Send + Sync {
    /// Variant layout of `technique_type` for this scene.
    fn info(&self, technique_type: &str, scene: &Scene) -> Result<TechniqueInfo>;

    /// Module-level preamble placed before the exported function.
    fn generate_header(&self, ctx: &LoaderContext, is_ray_generation: bool) -> Result<String>;

    /// Binds `technique` for the selected variant.
    fn generate(&self, ctx: &LoaderContext) -> Result<String>;

    /// Binds `callback` for the given iteration hook.
    fn generate_callback(&self, ctx: &LoaderContext, callback: CallbackType) -> Result<String>;
}

pub trait LightEmitter: Send + Sync {
    /// Light table for the scene. With `restrict_to_current_hit`, lights that
    /// need the scene database (area lights) are replaced by null lights so
    /// light indices stay stable.
    fn generate(&self, tree: &ShadingTree<'_>, restrict_to_current_hit: bool) -> Result<String>;
}

pub trait CameraEmitter: Send + Sync {
    fn generate(&self, ctx: &LoaderContext) -> Result<String>;
}

pub trait DeviceEmitter: Send + Sync {
    /// Single statement binding `device` for `target`.
    fn construct_device(&self, target: &Target) -> String;

    /// Binds the full scene database accessors.
    fn generate_database(&self) -> String;
}

pub trait MaterialEmitter: Send + Sync {
    /// Binds `shader` for the material behind `hit_group`.
    fn generate(&self, tree: &ShadingTree<'_>, hit_group: usize) -> Result<String>;
}

/// The set of collaborators one pipeline run talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub technique: &'a dyn TechniqueEmitter,
    pub camera: &'a dyn CameraEmitter,
    pub light: &'a dyn LightEmitter,
    pub material: &'a dyn MaterialEmitter,
    pub device: &'a dyn DeviceEmitter,
}

impl Collaborators<'static> {
    /// Template-driven defaults from [`builtin`].
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            technique: &builtin::TemplateTechnique,
            camera: &builtin::TemplateCamera,
            light: &builtin::TemplateLights,
            material: &builtin::TemplateMaterials,
            device: &builtin::StandardDevice,
        }
    }
}

impl std::fmt::Debug for Collaborators<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

// ============================================================================
// Shading Tree
// ============================================================================

/// Expression builder handed to light and material emitters.
///
/// Turns object properties into Artic expressions and records which image
/// buffers the expressions sample, so the emitter can declare exactly those.
/// One tree lives for one program and declares each image at most once.
pub struct ShadingTree<'a> {
    ctx: &'a LoaderContext,
    used_images: RefCell<BTreeSet<u32>>,
    declared_images: RefCell<BTreeSet<u32>>,
}

impl<'a> ShadingTree<'a> {
    #[must_use]
    pub fn new(ctx: &'a LoaderContext) -> Self {
        Self {
            ctx,
            used_images: RefCell::new(BTreeSet::new()),
            declared_images: RefCell::new(BTreeSet::new()),
        }
    }

    #[inline]
    #[must_use]
    pub fn context(&self) -> &'a LoaderContext {
        self.ctx
    }

    /// Name of the texture function sampling image `buffer`.
    pub fn texture_ref(&self, buffer: u32) -> String {
        self.used_images.borrow_mut().insert(buffer);
        format!("tex_{buffer}")
    }

    /// Color expression: a texture lookup at the surface coordinates or a constant.
    pub fn color(&self, object: &Object, property: &str, default: Vec3) -> Result<String> {
        Ok(match self.ctx.extract_texture_color(object, property, default)? {
            TextureColor::Texture(buffer) => format!("{}(ctx.uvw)", self.texture_ref(buffer)),
            TextureColor::Color(color) => color_literal(color),
        })
    }

    pub fn number(&self, object: &Object, property: &str, default: f32) -> Result<String> {
        object.get_number(property, default).map(float_literal)
    }

    pub fn vector(&self, object: &Object, property: &str, default: Vec3) -> Result<String> {
        object.get_vector3(property, default).map(vec3_literal)
    }

    pub fn ior(&self, object: &Object, property: &str, default: f32) -> Result<String> {
        self.ctx.extract_ior(object, property, default).map(float_literal)
    }

    /// Declarations for images referenced since the previous call, in buffer order.
    ///
    /// Images declared by an earlier fragment of the same program are skipped.
    #[must_use]
    pub fn texture_declarations(&self) -> String {
        let mut declared = self.declared_images.borrow_mut();
        let mut out = String::new();
        for &buffer in self.used_images.borrow().iter() {
            if !declared.insert(buffer) {
                continue;
            }
            let _ = writeln!(
                out,
                "  let tex_{buffer} = make_image_texture(make_repeat_border(), make_bilinear_filter(), device.load_image_by_id({buffer}, 4), false);"
            );
        }
        out
    }
}

// ============================================================================
// Literals
// ============================================================================

/// Artic float literal. Always carries a decimal point or exponent.
#[must_use]
pub fn float_literal(value: f32) -> String {
    if value.is_nan() {
        return "flt_nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "flt_inf" } else { "-flt_inf" }.to_string();
    }
    let text = format!("{value:?}");
    if text.contains(['.', 'e']) { text } else { format!("{text}.0") }
}

#[must_use]
pub fn vec3_literal(v: Vec3) -> String {
    format!(
        "make_vec3({}, {}, {})",
        float_literal(v.x),
        float_literal(v.y),
        float_literal(v.z)
    )
}

#[must_use]
pub fn color_literal(c: Vec3) -> String {
    format!(
        "make_color({}, {}, {}, 1.0)",
        float_literal(c.x),
        float_literal(c.y),
        float_literal(c.z)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LoaderOptions;
    use crate::technique::{TechniqueVariantInfo, VariantFeatures};

    #[test]
    fn test_float_literal() {
        assert_eq!(float_literal(1.0), "1.0");
        assert_eq!(float_literal(0.25), "0.25");
        assert_eq!(float_literal(-3.0), "-3.0");
        assert_eq!(float_literal(f32::INFINITY), "flt_inf");
    }

    #[test]
    fn test_color_literal() {
        assert_eq!(color_literal(Vec3::new(1.0, 0.5, 0.0)), "make_color(1.0, 0.5, 0.0, 1.0)");
        assert_eq!(vec3_literal(Vec3::Y), "make_vec3(0.0, 1.0, 0.0)");
    }

    #[test]
    fn test_shading_tree_tracks_textures() {
        let mut scene = Scene::new();
        scene.add_texture("wood", Object::new("image").with_property("filename", "wood.png"));
        let info = TechniqueInfo::single(TechniqueVariantInfo::new(VariantFeatures::empty()));
        let mut ctx = LoaderContext::new(scene, info, LoaderOptions::default()).unwrap();
        ctx.register_scene_textures().unwrap();

        let tree = ShadingTree::new(&ctx);
        assert!(tree.texture_declarations().is_empty());

        let floor = Object::new("diffuse").with_property("reflectance", "wood");
        assert_eq!(tree.color(&floor, "reflectance", Vec3::ONE).unwrap(), "tex_0(ctx.uvw)");
        assert_eq!(
            tree.color(&floor, "missing", Vec3::splat(0.5)).unwrap(),
            "make_color(0.5, 0.5, 0.5, 1.0)"
        );
        assert!(tree.texture_declarations().contains("device.load_image_by_id(0, 4)"));

        // A second fragment sampling the same image reuses the declaration
        let wall = Object::new("diffuse").with_property("reflectance", "wood");
        assert_eq!(tree.color(&wall, "reflectance", Vec3::ONE).unwrap(), "tex_0(ctx.uvw)");
        assert!(tree.texture_declarations().is_empty());
    }
}
