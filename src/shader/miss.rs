use super::{Call, EntryPoint, Program};
use crate::emit::Collaborators;
use crate::errors::Result;
use crate::loader::LoaderContext;
use crate::technique::ShaderKind;

/// Emits `ig_miss_shader` for rays that left the scene.
pub struct MissShader;

impl MissShader {
    #[must_use]
    pub fn entry_point() -> EntryPoint {
        EntryPoint::new(
            ShaderKind::Miss.entry_point(),
            &[("settings", "&Settings"), ("first", "i32"), ("last", "i32")],
            "()",
        )
    }

    /// The database is bound only when every light must be reachable from a
    /// miss event. Otherwise the light table is restricted.
    pub fn build(ctx: &LoaderContext, emitters: &Collaborators<'_>) -> Result<Program> {
        ctx.database()?;

        let info = ctx.current_technique_variant_info();
        let preamble = emitters.technique.generate_header(ctx, false)?;

        let mut body = super::prologue(ctx, emitters);
        super::light_section(ctx, emitters, info.uses_all_lights_in_miss(), &mut body)?;
        body.push(super::samples_binding(ctx));
        super::technique_body(ctx, emitters, &mut body)?;
        body.push(super::framebuffer_binding(ctx));

        Ok(Program {
            preamble,
            entry: Self::entry_point(),
            body,
            result: Call::forward(
                "device",
                "handle_miss_shader",
                &["technique", "first", "last", "spp", "use_framebuffer"],
            ),
        })
    }

    pub fn setup(ctx: &LoaderContext, emitters: &Collaborators<'_>) -> Result<String> {
        let program = Self::build(ctx, emitters)?;
        Ok(super::render(ctx, ShaderKind::Miss, &program))
    }
}
