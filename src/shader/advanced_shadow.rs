use super::{Call, EntryPoint, Expr, Fragment, Program};
use crate::emit::Collaborators;
use crate::errors::Result;
use crate::loader::LoaderContext;
use crate::technique::ShaderKind;

/// Emits `ig_advanced_shadow_shader`. The hit-side and miss-side programs
/// share this generator and differ by the `is_hit` literal.
pub struct AdvancedShadowShader;

impl AdvancedShadowShader {
    #[must_use]
    pub fn entry_point() -> EntryPoint {
        EntryPoint::new(
            ShaderKind::AdvancedShadowHit.entry_point(),
            &[("settings", "&Settings"), ("first", "i32"), ("last", "i32")],
            "()",
        )
    }

    #[must_use]
    pub fn kind(is_hit: bool) -> ShaderKind {
        if is_hit {
            ShaderKind::AdvancedShadowHit
        } else {
            ShaderKind::AdvancedShadowMiss
        }
    }

    /// Area lights need the database, which a shadow hit always may reach.
    pub fn build(ctx: &LoaderContext, emitters: &Collaborators<'_>, is_hit: bool) -> Result<Program> {
        ctx.database()?;

        let info = ctx.current_technique_variant_info();
        let require_area_light = is_hit || info.uses_all_lights_in_miss();
        let preamble = emitters.technique.generate_header(ctx, false)?;

        let mut body = super::prologue(ctx, emitters);
        super::light_section(ctx, emitters, require_area_light, &mut body)?;
        body.push(super::samples_binding(ctx));
        super::technique_body(ctx, emitters, &mut body)?;
        body.push(Fragment::binding("is_hit", Expr::Bool(is_hit)));
        body.push(super::framebuffer_binding(ctx));

        Ok(Program {
            preamble,
            entry: Self::entry_point(),
            body,
            result: Call::forward(
                "device",
                "handle_advanced_shadow_shader",
                &["technique", "first", "last", "spp", "use_framebuffer", "is_hit"],
            ),
        })
    }

    pub fn setup(ctx: &LoaderContext, emitters: &Collaborators<'_>, is_hit: bool) -> Result<String> {
        let program = Self::build(ctx, emitters, is_hit)?;
        Ok(super::render(ctx, Self::kind(is_hit), &program))
    }
}
