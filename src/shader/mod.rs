//! Entry-Point Generators
//!
//! One generator per exported entry point. Each is a pure function of the
//! compilation context and its flags: [`build`](RayGenerationShader::build)
//! returns the typed [`Program`], `setup` renders it to text.

pub mod advanced_shadow;
pub mod callback;
pub mod fragment;
pub mod hit;
pub mod miss;
pub mod ray_generation;

pub use advanced_shadow::AdvancedShadowShader;
pub use callback::CallbackShader;
pub use fragment::{Call, EntryPoint, Expr, Fragment, Program};
pub use hit::HitShader;
pub use miss::MissShader;
pub use ray_generation::RayGenerationShader;

use xxhash_rust::xxh3::xxh3_64;

use crate::emit::{Collaborators, ShadingTree};
use crate::errors::Result;
use crate::loader::LoaderContext;
use crate::technique::ShaderKind;

/// `maybe_unused(settings);`, the device binding and a blank line.
fn prologue(ctx: &LoaderContext, emitters: &Collaborators<'_>) -> Vec<Fragment> {
    vec![
        Fragment::Statement(Call::free("maybe_unused", [Expr::ident("settings")])),
        Fragment::Inline(emitters.device.construct_device(&ctx.target)),
        Fragment::Blank,
    ]
}

/// `let spp = N : i32;` with the sample count baked in.
///
/// The context only accepts counts that fit an `i32`.
fn samples_binding(ctx: &LoaderContext) -> Fragment {
    Fragment::typed_binding("spp", Expr::Int(ctx.samples_per_iteration() as i64), "i32")
}

fn framebuffer_binding(ctx: &LoaderContext) -> Fragment {
    let lock = ctx.current_technique_variant_info().lock_framebuffer();
    Fragment::binding("use_framebuffer", Expr::Bool(!lock))
}

/// Technique body followed by an empty line.
fn technique_body(ctx: &LoaderContext, emitters: &Collaborators<'_>, body: &mut Vec<Fragment>) -> Result<()> {
    body.push(Fragment::Source(emitters.technique.generate(ctx)?));
    body.push(Fragment::Blank);
    Ok(())
}

/// Optional database block plus the light table.
///
/// Omitted entirely when the selected variant does not use lights.
fn light_section(
    ctx: &LoaderContext,
    emitters: &Collaborators<'_>,
    require_database: bool,
    body: &mut Vec<Fragment>,
) -> Result<()> {
    if !ctx.current_technique_variant_info().uses_lights() {
        return Ok(());
    }

    if require_database {
        body.push(Fragment::Source(emitters.device.generate_database()));
    }

    let tree = ShadingTree::new(ctx);
    body.push(Fragment::Source(emitters.light.generate(&tree, !require_database)?));
    Ok(())
}

fn render(ctx: &LoaderContext, kind: ShaderKind, program: &Program) -> String {
    let source = program.to_string();
    log::debug!(
        "Generated {kind} for variant {} ({} bytes, {:016x})",
        ctx.current_technique_variant(),
        source.len(),
        xxh3_64(source.as_bytes())
    );
    source
}
