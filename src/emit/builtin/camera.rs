use glam::Vec3;
use serde::Serialize;

use super::templates;
use crate::emit::{CameraEmitter, float_literal, vec3_literal};
use crate::errors::{CodegenError, Result};
use crate::loader::LoaderContext;
use crate::scene::Object;

const FISHLENS_MODES: &[&str] = &["circular", "cropped", "full"];

/// Literals shared by all camera templates plus the per-type extras.
#[derive(Serialize, Default)]
struct CameraContext {
    origin: String,
    direction: String,
    up: String,
    near: String,
    far: String,
    aspect: String,
    fov: String,
    scale: String,
    mode: String,
    mode_id: usize,
    width: String,
    height: String,
}

/// Stock cameras: `perspective`, `orthogonal` and `fishlens`.
///
/// The aspect ratio comes from the loading-time film size.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateCamera;

impl CameraEmitter for TemplateCamera {
    fn generate(&self, ctx: &LoaderContext) -> Result<String> {
        let camera = ctx
            .scene
            .camera
            .as_ref()
            .filter(|c| c.plugin_type == ctx.camera_type)
            .cloned()
            .unwrap_or_else(|| Object::new(&ctx.camera_type));

        let base = CameraContext {
            origin: vec3_literal(camera.get_vector3("origin", Vec3::ZERO)?),
            direction: vec3_literal(camera.get_vector3("direction", Vec3::Z)?.normalize_or(Vec3::Z)),
            up: vec3_literal(camera.get_vector3("up", Vec3::Y)?.normalize_or(Vec3::Y)),
            near: float_literal(camera.get_number("near_clip", 0.01)?),
            far: float_literal(camera.get_number("far_clip", f32::MAX)?),
            aspect: float_literal(ctx.film_aspect()),
            ..Default::default()
        };

        match ctx.camera_type.as_str() {
            "perspective" => {
                let fov = camera.get_number("fov", 60.0)?.to_radians();
                templates::render(
                    "camera/perspective",
                    CameraContext {
                        fov: float_literal(fov),
                        ..base
                    },
                )
            }
            "orthogonal" => templates::render(
                "camera/orthogonal",
                CameraContext {
                    scale: float_literal(camera.get_number("scale", 1.0)?),
                    ..base
                },
            ),
            "fishlens" => {
                let mode = camera.get_string("mode")?.unwrap_or("circular");
                let mode_id = FISHLENS_MODES
                    .iter()
                    .position(|m| m.eq_ignore_ascii_case(mode))
                    .ok_or_else(|| CodegenError::UnsupportedPlugin {
                        category: "fishlens mode",
                        kind: mode.to_string(),
                        object: camera.name.clone(),
                    })?;
                templates::render(
                    "camera/fishlens",
                    CameraContext {
                        mode: mode.to_string(),
                        mode_id,
                        width: float_literal(ctx.film_width as f32),
                        height: float_literal(ctx.film_height as f32),
                        ..base
                    },
                )
            }
            other => Err(CodegenError::UnsupportedPlugin {
                category: "camera",
                kind: other.to_string(),
                object: camera.name.clone(),
            }),
        }
    }
}
