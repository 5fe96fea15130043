//! Shader Pipeline
//!
//! Walks every technique variant and every entry point it requires, and
//! collects the generated programs into [`TechniqueVariant`] records.
//!
//! ## Required entry points per variant
//!
//! | Slot | Present when |
//! |------|--------------|
//! | ray generation, miss | always |
//! | hit shaders | one per hit group |
//! | advanced shadow hit/miss | `ShadowHandlingMode::Advanced` |
//! | callbacks | the matching callback feature is set |
//!
//! A failure in any entry point aborts the whole compile. A partial record
//! would break the render loop's contract with the variant layout.

use rayon::prelude::*;

use crate::emit::Collaborators;
use crate::errors::Result;
use crate::loader::LoaderContext;
use crate::shader::{AdvancedShadowShader, CallbackShader, HitShader, MissShader, RayGenerationShader};
use crate::technique::{CallbackType, TechniqueVariant};

pub struct ShaderPipeline<'a> {
    emitters: Collaborators<'a>,
}

impl ShaderPipeline<'static> {
    /// Pipeline over the template-driven builtin emitters.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Collaborators::builtin())
    }
}

impl<'a> ShaderPipeline<'a> {
    #[must_use]
    pub fn new(emitters: Collaborators<'a>) -> Self {
        Self { emitters }
    }

    #[inline]
    #[must_use]
    pub fn collaborators(&self) -> &Collaborators<'a> {
        &self.emitters
    }

    /// Generates every entry point of the currently selected variant.
    pub fn generate_variant(&self, ctx: &LoaderContext) -> Result<TechniqueVariant> {
        ctx.database()?;

        let info = ctx.current_technique_variant_info();
        let emitters = &self.emitters;

        let ray_generation_shader = RayGenerationShader::setup(ctx, emitters)?;
        let miss_shader = MissShader::setup(ctx, emitters)?;

        let hit_shaders = (0..ctx.hit_group_count())
            .map(|group| HitShader::setup(ctx, emitters, group))
            .collect::<Result<Vec<_>>>()?;

        let (advanced_shadow_hit_shader, advanced_shadow_miss_shader) = if info.requires_advanced_shadows() {
            (
                Some(AdvancedShadowShader::setup(ctx, emitters, true)?),
                Some(AdvancedShadowShader::setup(ctx, emitters, false)?),
            )
        } else {
            (None, None)
        };

        let mut callback_shaders = [None, None];
        for callback in CallbackType::ALL {
            if info.has_callback(callback) {
                callback_shaders[callback.index()] = Some(CallbackShader::setup(ctx, emitters, callback)?);
            }
        }

        let variant = TechniqueVariant {
            ray_generation_shader,
            miss_shader,
            hit_shaders,
            advanced_shadow_hit_shader,
            advanced_shadow_miss_shader,
            callback_shaders,
        };
        log::info!(
            "Technique variant {}: {} entry points, {} bytes",
            ctx.current_technique_variant(),
            variant.shader_count(),
            variant.source_len()
        );
        Ok(variant)
    }

    /// Generates all variants in order.
    ///
    /// The context's variant selection is restored afterwards, even on failure.
    pub fn generate(&self, ctx: &mut LoaderContext) -> Result<Vec<TechniqueVariant>> {
        let previous = ctx.current_technique_variant();
        let count = ctx.technique_info.variant_count();

        log::info!(
            "Generating {count} variant(s) of technique '{}' for {:?}",
            ctx.technique_type,
            ctx.target.architecture
        );

        let mut variants = Vec::with_capacity(count);
        let mut outcome = Ok(());
        for index in 0..count {
            ctx.select_technique_variant(index);
            match self.generate_variant(ctx) {
                Ok(variant) => variants.push(variant),
                Err(e) => {
                    log::error!("Technique variant {index} failed, aborting compile: {e}");
                    outcome = Err(e);
                    break;
                }
            }
        }

        if previous < count {
            ctx.select_technique_variant(previous);
        }

        outcome.map(|()| variants)
    }

    /// Same output as [`generate`](Self::generate), one rayon task per variant.
    ///
    /// Each task works on its own clone of the context, so `ctx` itself is
    /// never reselected.
    pub fn generate_parallel(&self, ctx: &LoaderContext) -> Result<Vec<TechniqueVariant>> {
        let count = ctx.technique_info.variant_count();
        log::info!(
            "Generating {count} variant(s) of technique '{}' in parallel",
            ctx.technique_type
        );

        let result = (0..count)
            .into_par_iter()
            .map(|index| {
                let mut local = ctx.clone();
                local.select_technique_variant(index);
                self.generate_variant(&local)
            })
            .collect::<Result<Vec<_>>>();

        if let Err(e) = &result {
            log::error!("Parallel generation aborted: {e}");
        }
        result
    }
}
