use serde::Serialize;

use super::templates;
use crate::emit::{TechniqueEmitter, float_literal};
use crate::errors::{CodegenError, Result};
use crate::loader::LoaderContext;
use crate::scene::{Object, Scene};
use crate::technique::{
    CallbackType, ShadowHandlingMode, TechniqueInfo, TechniqueVariantInfo, VariantFeatures,
};

const DEFAULT_PAYLOAD_INITIALIZER: &str = "make_empty_payload()";

/// Debug visualizations, indexed by the id the runtime expects.
const DEBUG_MODES: &[&str] = &[
    "normal",
    "tangent",
    "bitangent",
    "geometric_normal",
    "tex_coords",
    "uvw",
    "point",
    "hit_distance",
    "entity_id",
    "primitive_id",
];

#[derive(Serialize)]
struct HeaderContext<'a> {
    technique: &'a str,
    variant: usize,
    primary_payload: usize,
    secondary_payload: usize,
    initializer: &'a str,
    is_ray_generation: bool,
}

/// Technique parameters. Each template reads the fields of its own technique.
#[derive(Serialize, Default)]
struct TechniqueParams {
    max_depth: i64,
    clamp: String,
    aov_normals: bool,
    mode: String,
    mode_id: usize,
    radius: String,
    photons: i64,
}

#[derive(Serialize)]
struct TechniqueContext {
    variant: usize,
    is_before: bool,
    #[serde(flatten)]
    params: TechniqueParams,
}

/// Stock techniques: `path`, `ao`, `debug`, `lightvisibility` and `ppm`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateTechnique;

impl TemplateTechnique {
    /// The scene's technique parameters, unless the technique was overridden.
    fn technique_object(ctx: &LoaderContext) -> Object {
        ctx.scene
            .technique
            .as_ref()
            .filter(|t| t.plugin_type == ctx.technique_type)
            .cloned()
            .unwrap_or_else(|| Object::new(&ctx.technique_type))
    }

    fn parameters(ctx: &LoaderContext) -> Result<TechniqueParams> {
        let object = Self::technique_object(ctx);

        Ok(match ctx.technique_type.as_str() {
            "path" => TechniqueParams {
                max_depth: object.get_integer("max_depth", 64)?,
                clamp: float_literal(object.get_number("clamp", 0.0)?),
                aov_normals: object.get_bool("aov_normals", false)?,
                ..Default::default()
            },
            "ao" => TechniqueParams::default(),
            "debug" => {
                let mode = object.get_string("mode")?.unwrap_or("normal");
                let mode_id = DEBUG_MODES
                    .iter()
                    .position(|m| m.eq_ignore_ascii_case(mode))
                    .ok_or_else(|| CodegenError::UnsupportedPlugin {
                        category: "debug mode",
                        kind: mode.to_string(),
                        object: object.name.clone(),
                    })?;
                TechniqueParams {
                    mode: mode.to_string(),
                    mode_id,
                    ..Default::default()
                }
            }
            "lightvisibility" => TechniqueParams {
                max_depth: object.get_integer("max_depth", 1)?,
                ..Default::default()
            },
            "ppm" => TechniqueParams {
                max_depth: object.get_integer("max_depth", 8)?,
                radius: float_literal(object.get_number("radius", 0.01)?),
                photons: object.get_integer("photons", 1_000_000)?,
                ..Default::default()
            },
            other => return Err(CodegenError::UnknownTechnique(other.to_string())),
        })
    }
}

impl TechniqueEmitter for TemplateTechnique {
    fn info(&self, technique_type: &str, scene: &Scene) -> Result<TechniqueInfo> {
        let info = match technique_type {
            "path" => {
                let mut info = TechniqueInfo::single(
                    TechniqueVariantInfo::new(VariantFeatures::USES_LIGHTS)
                        .with_payload(6, 0)
                        .with_emitter_payload_initializer("init_pt_raypayload()"),
                );
                let wants_normals = scene
                    .technique
                    .as_ref()
                    .filter(|t| t.plugin_type == technique_type)
                    .map(|t| t.get_bool("aov_normals", false))
                    .transpose()?
                    .unwrap_or(false);
                if wants_normals {
                    info.enabled_aovs.push("Normals".to_string());
                }
                info
            }
            "ao" | "debug" => TechniqueInfo::single(TechniqueVariantInfo::new(VariantFeatures::empty())),
            "lightvisibility" => TechniqueInfo::single(
                TechniqueVariantInfo::new(VariantFeatures::USES_LIGHTS)
                    .with_shadow_handling(ShadowHandlingMode::Advanced)
                    .with_payload(1, 0),
            ),
            "ppm" => TechniqueInfo {
                variants: vec![
                    // Photon pass: traced from the lights, writes no pixels.
                    TechniqueVariantInfo::new(
                        VariantFeatures::USES_LIGHTS
                            | VariantFeatures::LOCK_FRAMEBUFFER
                            | VariantFeatures::BEFORE_ITERATION_CALLBACK,
                    )
                    .with_payload(7, 0)
                    .with_emitter_payload_initializer("init_ppm_photon_payload()"),
                    // Camera pass gathering the photons.
                    TechniqueVariantInfo::new(
                        VariantFeatures::USES_LIGHTS
                            | VariantFeatures::USES_ALL_LIGHTS_IN_MISS
                            | VariantFeatures::AFTER_ITERATION_CALLBACK,
                    )
                    .with_payload(6, 0)
                    .with_emitter_payload_initializer("init_ppm_raypayload()"),
                ],
                enabled_aovs: Vec::new(),
            },
            other => return Err(CodegenError::UnknownTechnique(other.to_string())),
        };

        log::debug!("Technique '{technique_type}' has {} variant(s)", info.variant_count());
        Ok(info)
    }

    fn generate_header(&self, ctx: &LoaderContext, is_ray_generation: bool) -> Result<String> {
        let info = ctx.current_technique_variant_info();

        templates::render(
            "technique/header",
            HeaderContext {
                technique: &ctx.technique_type,
                variant: ctx.current_technique_variant(),
                primary_payload: info.primary_payload_count,
                secondary_payload: info.secondary_payload_count,
                initializer: info
                    .emitter_payload_initializer
                    .as_deref()
                    .unwrap_or(DEFAULT_PAYLOAD_INITIALIZER),
                is_ray_generation,
            },
        )
    }

    fn generate(&self, ctx: &LoaderContext) -> Result<String> {
        templates::render(
            &format!("technique/{}", ctx.technique_type),
            TechniqueContext {
                variant: ctx.current_technique_variant(),
                is_before: false,
                params: Self::parameters(ctx)?,
            },
        )
    }

    fn generate_callback(&self, ctx: &LoaderContext, callback: CallbackType) -> Result<String> {
        if ctx.technique_type != "ppm" {
            return Err(CodegenError::UnsupportedPlugin {
                category: "callback",
                kind: ctx.technique_type.clone(),
                object: "technique".to_string(),
            });
        }

        templates::render(
            "technique/ppm_callback",
            TechniqueContext {
                variant: ctx.current_technique_variant(),
                is_before: callback == CallbackType::BeforeIteration,
                params: Self::parameters(ctx)?,
            },
        )
    }
}
