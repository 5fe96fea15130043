use glam::Vec3;
use serde::Serialize;

use super::templates;
use crate::emit::{MaterialEmitter, ShadingTree, color_literal};
use crate::errors::{CodegenError, Result};
use crate::loader::DEFAULT_IOR;
use crate::scene::Object;

/// Gold-like defaults for conductors without explicit constants.
const DEFAULT_CONDUCTOR_ETA: Vec3 = Vec3::new(0.2004, 0.9240, 1.1022);
const DEFAULT_CONDUCTOR_K: Vec3 = Vec3::new(3.9129, 2.4528, 2.1421);

#[derive(Serialize)]
struct MaterialContext<'a> {
    name: &'a str,
    hit_group: usize,
    bsdf: String,
    textures: &'a str,
}

/// Stock materials: `diffuse`, `dielectric` and `conductor`.
///
/// Hit group `n` is the `n`-th material of the scene in name order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateMaterials;

impl TemplateMaterials {
    fn bsdf_expr(tree: &ShadingTree<'_>, bsdf: &Object) -> Result<String> {
        match bsdf.plugin_type.as_str() {
            "diffuse" => Ok(format!(
                "make_diffuse_bsdf(ctx.surf, {})",
                tree.color(bsdf, "reflectance", Vec3::splat(0.5))?
            )),
            "dielectric" => Ok(format!(
                "make_glass_bsdf(ctx.surf, {}, {}, {}, {})",
                tree.ior(bsdf, "ext_ior", 1.000_277)?,
                tree.ior(bsdf, "int_ior", DEFAULT_IOR)?,
                tree.color(bsdf, "specular_reflectance", Vec3::ONE)?,
                tree.color(bsdf, "specular_transmittance", Vec3::ONE)?
            )),
            "conductor" => Ok(format!(
                "make_conductor_bsdf(ctx.surf, {}, {}, {})",
                color_literal(bsdf.get_vector3("eta", DEFAULT_CONDUCTOR_ETA)?),
                color_literal(bsdf.get_vector3("k", DEFAULT_CONDUCTOR_K)?),
                tree.color(bsdf, "specular_reflectance", Vec3::ONE)?
            )),
            other => Err(CodegenError::UnsupportedPlugin {
                category: "bsdf",
                kind: other.to_string(),
                object: bsdf.name.clone(),
            }),
        }
    }
}

impl MaterialEmitter for TemplateMaterials {
    fn generate(&self, tree: &ShadingTree<'_>, hit_group: usize) -> Result<String> {
        let bsdfs = &tree.context().scene.bsdfs;
        let (name, bsdf) = bsdfs
            .iter()
            .nth(hit_group)
            .ok_or(CodegenError::UnknownHitGroup {
                index: hit_group,
                count: bsdfs.len(),
            })?;

        let expr = Self::bsdf_expr(tree, bsdf)?;
        let textures = tree.texture_declarations();

        templates::render(
            "material",
            MaterialContext {
                name,
                hit_group,
                bsdf: expr,
                textures: textures.trim_end(),
            },
        )
    }
}
