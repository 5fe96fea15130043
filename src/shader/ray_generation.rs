use super::{Call, EntryPoint, Expr, Fragment, Program};
use crate::emit::Collaborators;
use crate::errors::Result;
use crate::loader::LoaderContext;
use crate::technique::ShaderKind;

/// Emits `ig_ray_generation_shader`, which produces primary rays for a tile
/// and returns the updated ray count.
pub struct RayGenerationShader;

impl RayGenerationShader {
    #[must_use]
    pub fn entry_point() -> EntryPoint {
        EntryPoint::new(
            ShaderKind::RayGeneration.entry_point(),
            &[
                ("settings", "&Settings"),
                ("iter", "i32"),
                ("id", "&mut i32"),
                ("size", "i32"),
                ("xmin", "i32"),
                ("ymin", "i32"),
                ("xmax", "i32"),
                ("ymax", "i32"),
            ],
            "i32",
        )
    }

    pub fn build(ctx: &LoaderContext, emitters: &Collaborators<'_>) -> Result<Program> {
        ctx.database()?;

        let preamble = emitters.technique.generate_header(ctx, true)?;

        let mut body = super::prologue(ctx, emitters);
        body.push(super::samples_binding(ctx));

        if ctx.is_tracer {
            let rays = Call::method("device", "load_rays", []);
            body.push(Fragment::binding(
                "emitter",
                Call::free(
                    "make_list_emitter",
                    [rays.into(), Expr::ident("iter"), Expr::ident("init_raypayload")],
                ),
            ));
        } else {
            body.push(Fragment::Source(emitters.camera.generate(ctx)?));
            body.push(Fragment::binding(
                "emitter",
                Call::free(
                    "make_camera_emitter",
                    [
                        Expr::ident("camera"),
                        Expr::ident("iter"),
                        Expr::ident("spp"),
                        Call::free("make_uniform_pixel_sampler", []).into(),
                        Expr::ident("init_raypayload"),
                    ],
                ),
            ));
        }

        super::technique_body(ctx, emitters, &mut body)?;

        Ok(Program {
            preamble,
            entry: Self::entry_point(),
            body,
            result: Call::forward(
                "device",
                "generate_rays",
                &["emitter", "id", "size", "xmin", "ymin", "xmax", "ymax", "spp"],
            ),
        })
    }

    pub fn setup(ctx: &LoaderContext, emitters: &Collaborators<'_>) -> Result<String> {
        let program = Self::build(ctx, emitters)?;
        Ok(super::render(ctx, ShaderKind::RayGeneration, &program))
    }
}
