use super::{Call, EntryPoint, Fragment, Program};
use crate::emit::Collaborators;
use crate::errors::Result;
use crate::loader::LoaderContext;
use crate::technique::{CallbackType, ShaderKind};

/// Emits `ig_callback_shader`, run once before or after each iteration.
pub struct CallbackShader;

impl CallbackShader {
    #[must_use]
    pub fn entry_point() -> EntryPoint {
        EntryPoint::new(
            ShaderKind::Callback(CallbackType::BeforeIteration).entry_point(),
            &[("settings", "&Settings"), ("iter", "i32")],
            "()",
        )
    }

    pub fn build(ctx: &LoaderContext, emitters: &Collaborators<'_>, callback: CallbackType) -> Result<Program> {
        ctx.database()?;

        let preamble = emitters.technique.generate_header(ctx, false)?;

        let mut body = super::prologue(ctx, emitters);
        body.push(super::samples_binding(ctx));
        body.push(Fragment::Source(emitters.technique.generate_callback(ctx, callback)?));
        body.push(Fragment::Blank);

        Ok(Program {
            preamble,
            entry: Self::entry_point(),
            body,
            result: Call::forward("device", "handle_callback", &["callback", "iter", "spp"]),
        })
    }

    pub fn setup(ctx: &LoaderContext, emitters: &Collaborators<'_>, callback: CallbackType) -> Result<String> {
        let program = Self::build(ctx, emitters, callback)?;
        Ok(super::render(ctx, ShaderKind::Callback(callback), &program))
    }
}
