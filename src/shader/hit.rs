use super::{Call, EntryPoint, Expr, Fragment, Program};
use crate::emit::{Collaborators, ShadingTree};
use crate::errors::Result;
use crate::loader::LoaderContext;
use crate::technique::ShaderKind;

/// Emits `ig_hit_shader` for one hit group (one material).
pub struct HitShader;

impl HitShader {
    #[must_use]
    pub fn entry_point() -> EntryPoint {
        EntryPoint::new(
            ShaderKind::Hit(0).entry_point(),
            &[
                ("settings", "&Settings"),
                ("entity_id", "i32"),
                ("first", "i32"),
                ("last", "i32"),
            ],
            "()",
        )
    }

    /// Surface shading may sample any light, so the light table is never restricted.
    pub fn build(ctx: &LoaderContext, emitters: &Collaborators<'_>, hit_group: usize) -> Result<Program> {
        ctx.database()?;

        let preamble = emitters.technique.generate_header(ctx, false)?;

        let mut body = super::prologue(ctx, emitters);
        body.push(Fragment::Source(emitters.device.generate_database()));

        // Lights and material share one tree so each image is declared once.
        let tree = ShadingTree::new(ctx);
        if ctx.current_technique_variant_info().uses_lights() {
            body.push(Fragment::Source(emitters.light.generate(&tree, false)?));
        }

        body.push(super::samples_binding(ctx));
        let material_id = i64::try_from(hit_group).unwrap_or(i64::MAX);
        body.push(Fragment::typed_binding("material_id", Expr::Int(material_id), "i32"));

        body.push(Fragment::Source(emitters.material.generate(&tree, hit_group)?));

        super::technique_body(ctx, emitters, &mut body)?;
        body.push(super::framebuffer_binding(ctx));

        Ok(Program {
            preamble,
            entry: Self::entry_point(),
            body,
            result: Call::forward(
                "device",
                "handle_hit_shader",
                &[
                    "entity_id",
                    "material_id",
                    "shader",
                    "technique",
                    "first",
                    "last",
                    "spp",
                    "use_framebuffer",
                ],
            ),
        })
    }

    pub fn setup(ctx: &LoaderContext, emitters: &Collaborators<'_>, hit_group: usize) -> Result<String> {
        let program = Self::build(ctx, emitters, hit_group)?;
        Ok(super::render(ctx, ShaderKind::Hit(hit_group), &program))
    }
}
