use glam::Vec3;
use serde::Serialize;

use super::templates;
use crate::emit::{LightEmitter, ShadingTree, color_literal, float_literal};
use crate::errors::{CodegenError, Result};
use crate::loader::TextureColor;
use crate::scene::Object;

#[derive(Debug, Serialize)]
struct LightEntry<'a> {
    name: &'a str,
    expr: String,
}

#[derive(Serialize)]
struct LightsContext<'a> {
    lights: Vec<LightEntry<'a>>,
    textures: &'a str,
}

/// Stock lights: `point`, `spot`, `directional`, `area`, `env` and `constant`.
///
/// Lights are numbered in scene order. A restricted table keeps every index
/// and swaps area lights for `make_null_light()`, since they read the database.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateLights;

impl TemplateLights {
    fn light_expr(tree: &ShadingTree<'_>, light: &Object, restrict_to_current_hit: bool) -> Result<String> {
        match light.plugin_type.as_str() {
            "point" => Ok(format!(
                "make_point_light({}, {})",
                tree.vector(light, "position", Vec3::ZERO)?,
                tree.color(light, "intensity", Vec3::ONE)?
            )),
            "spot" => {
                let cutoff = light.get_number("cutoff", 30.0)?.to_radians();
                let falloff = light.get_number("falloff", 20.0)?.to_radians();
                Ok(format!(
                    "make_spot_light({}, {}, {}, {}, {})",
                    tree.vector(light, "position", Vec3::ZERO)?,
                    tree.vector(light, "direction", Vec3::NEG_Y)?,
                    float_literal(cutoff),
                    float_literal(falloff),
                    tree.color(light, "intensity", Vec3::ONE)?
                ))
            }
            "directional" => Ok(format!(
                "make_directional_light({}, {})",
                tree.vector(light, "direction", Vec3::NEG_Y)?,
                tree.color(light, "irradiance", Vec3::ONE)?
            )),
            "area" if restrict_to_current_hit => Ok("make_null_light()".to_string()),
            "area" => {
                let entity = light
                    .get_string("entity")?
                    .ok_or_else(|| CodegenError::MissingProperty {
                        object: light.name.clone(),
                        property: "entity".to_string(),
                    })?;
                let id = tree
                    .context()
                    .scene
                    .entity_index(entity)
                    .ok_or_else(|| CodegenError::UnknownEntity {
                        object: light.name.clone(),
                        entity: entity.to_string(),
                    })?;
                Ok(format!(
                    "make_area_light(dtb, {id}, {})",
                    tree.color(light, "radiance", Vec3::ONE)?
                ))
            }
            "env" => {
                let scale = tree.number(light, "scale", 1.0)?;
                match tree
                    .context()
                    .extract_texture_color(light, "radiance", Vec3::ONE)?
                {
                    TextureColor::Texture(buffer) => Ok(format!(
                        "make_environment_light_textured({}, {scale})",
                        tree.texture_ref(buffer)
                    )),
                    TextureColor::Color(color) => Ok(format!(
                        "make_environment_light({}, {scale})",
                        color_literal(color)
                    )),
                }
            }
            "constant" => Ok(format!(
                "make_environment_light({}, 1.0)",
                color_literal(light.get_vector3("radiance", Vec3::ONE)?)
            )),
            other => Err(CodegenError::UnsupportedPlugin {
                category: "light",
                kind: other.to_string(),
                object: light.name.clone(),
            }),
        }
    }
}

impl LightEmitter for TemplateLights {
    fn generate(&self, tree: &ShadingTree<'_>, restrict_to_current_hit: bool) -> Result<String> {
        let scene = &tree.context().scene;

        let lights = scene
            .lights
            .iter()
            .map(|(name, light)| {
                Ok(LightEntry {
                    name,
                    expr: Self::light_expr(tree, light, restrict_to_current_hit)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let textures = tree.texture_declarations();
        templates::render(
            "lights",
            LightsContext {
                lights,
                textures: textures.trim_end(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoaderContext;
    use crate::scene::Scene;
    use crate::settings::LoaderOptions;
    use crate::technique::{TechniqueInfo, TechniqueVariantInfo, VariantFeatures};

    fn context_with(scene: Scene) -> LoaderContext {
        let info = TechniqueInfo::single(TechniqueVariantInfo::new(VariantFeatures::USES_LIGHTS));
        LoaderContext::new(scene, info, LoaderOptions::default()).unwrap()
    }

    fn scene_with_area_light() -> Scene {
        let mut scene = Scene::new();
        scene.add_entity("lamp", Object::new("entity"));
        scene.add_light("a_area", Object::new("area").with_property("entity", "lamp"));
        scene.add_light("b_sun", Object::new("directional"));
        scene
    }

    #[test]
    fn test_restricted_table_keeps_indices() {
        let ctx = context_with(scene_with_area_light());
        let tree = ShadingTree::new(&ctx);

        let full = TemplateLights.generate(&tree, false).unwrap();
        assert!(full.contains("let light_0 = make_area_light(dtb, 0,"));
        assert!(full.contains("let light_1 = make_directional_light("));

        let restricted = TemplateLights.generate(&tree, true).unwrap();
        assert!(restricted.contains("let light_0 = make_null_light();"));
        assert!(restricted.contains("let light_1 = make_directional_light("));
        assert!(restricted.contains("let num_lights = 2 : i32;"));
    }

    #[test]
    fn test_area_light_needs_entity() {
        let mut scene = Scene::new();
        scene.add_light("lamp", Object::new("area").with_property("entity", "ghost"));
        let ctx = context_with(scene);
        let tree = ShadingTree::new(&ctx);

        assert!(matches!(
            TemplateLights.generate(&tree, false),
            Err(CodegenError::UnknownEntity { .. })
        ));
        // Restricted tables never resolve the entity
        assert!(TemplateLights.generate(&tree, true).is_ok());
    }

    #[test]
    fn test_textured_environment() {
        let mut scene = Scene::new();
        scene.add_texture("sky", Object::new("image").with_property("filename", "sky.exr"));
        scene.add_light("env", Object::new("env").with_property("radiance", "sky"));
        let mut ctx = context_with(scene);
        ctx.register_scene_textures().unwrap();
        let tree = ShadingTree::new(&ctx);

        let text = TemplateLights.generate(&tree, true).unwrap();
        assert!(text.starts_with("  let tex_0 = make_image_texture("));
        assert!(text.contains("make_environment_light_textured(tex_0, 1.0)"));
    }

    #[test]
    fn test_no_lights() {
        let ctx = context_with(Scene::new());
        let tree = ShadingTree::new(&ctx);
        let text = TemplateLights.generate(&tree, false).unwrap();
        assert!(text.contains("let num_lights = 0 : i32;"));
        assert!(text.contains("_ => make_null_light()"));
    }
}
