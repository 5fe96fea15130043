//! Generic technique variant record.
//!
//! [`TechniqueVariantBase<T>`] holds one payload per entry point. The source
//! specialization carries program text, the compiled one carries handles
//! returned by the external toolchain. The compiled record is only ever built
//! from the source record through [`TechniqueVariantBase::try_map`], so both
//! always have the same populated slots.

use std::fmt;

/// Iteration callbacks a technique may hook into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackType {
    BeforeIteration = 0,
    AfterIteration = 1,
}

impl CallbackType {
    pub const COUNT: usize = 2;
    pub const ALL: [CallbackType; Self::COUNT] = [Self::BeforeIteration, Self::AfterIteration];

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Identifies one entry point of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    RayGeneration,
    Miss,
    /// Hit shader of the given hit group.
    Hit(usize),
    AdvancedShadowHit,
    AdvancedShadowMiss,
    Callback(CallbackType),
}

impl ShaderKind {
    /// Exported function name of the program.
    #[must_use]
    pub fn entry_point(self) -> &'static str {
        match self {
            Self::RayGeneration => "ig_ray_generation_shader",
            Self::Miss => "ig_miss_shader",
            Self::Hit(_) => "ig_hit_shader",
            Self::AdvancedShadowHit | Self::AdvancedShadowMiss => "ig_advanced_shadow_shader",
            Self::Callback(_) => "ig_callback_shader",
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RayGeneration => f.write_str("ray generation"),
            Self::Miss => f.write_str("miss"),
            Self::Hit(group) => write!(f, "hit[{group}]"),
            Self::AdvancedShadowHit => f.write_str("advanced shadow hit"),
            Self::AdvancedShadowMiss => f.write_str("advanced shadow miss"),
            Self::Callback(CallbackType::BeforeIteration) => f.write_str("before-iteration callback"),
            Self::Callback(CallbackType::AfterIteration) => f.write_str("after-iteration callback"),
        }
    }
}

/// Opaque reference to a compiled entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u64);

/// Entry points of one technique variant.
///
/// Ray generation and miss shaders are always present. Hit shaders follow the
/// scene's hit groups in order. Advanced shadow and callback slots are `None`
/// when the variant does not need them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TechniqueVariantBase<T> {
    pub ray_generation_shader: T,
    pub miss_shader: T,
    pub hit_shaders: Vec<T>,
    pub advanced_shadow_hit_shader: Option<T>,
    pub advanced_shadow_miss_shader: Option<T>,
    pub callback_shaders: [Option<T>; CallbackType::COUNT],
}

/// Generated program text per entry point.
pub type TechniqueVariant = TechniqueVariantBase<String>;

/// Compiled entry points, congruent with the [`TechniqueVariant`] they came from.
pub type TechniqueVariantShaderSet = TechniqueVariantBase<ShaderHandle>;

impl<T> TechniqueVariantBase<T> {
    #[inline]
    #[must_use]
    pub fn callback(&self, callback: CallbackType) -> Option<&T> {
        self.callback_shaders[callback.index()].as_ref()
    }

    /// Visits every populated slot in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (ShaderKind, &T)> + '_ {
        let fixed = [
            (ShaderKind::RayGeneration, Some(&self.ray_generation_shader)),
            (ShaderKind::Miss, Some(&self.miss_shader)),
        ];
        let shadows = [
            (ShaderKind::AdvancedShadowHit, self.advanced_shadow_hit_shader.as_ref()),
            (ShaderKind::AdvancedShadowMiss, self.advanced_shadow_miss_shader.as_ref()),
        ];
        let callbacks = CallbackType::ALL
            .into_iter()
            .map(move |cb| (ShaderKind::Callback(cb), self.callback(cb)));

        fixed
            .into_iter()
            .chain(
                self.hit_shaders
                    .iter()
                    .enumerate()
                    .map(|(group, shader)| (ShaderKind::Hit(group), Some(shader))),
            )
            .chain(shadows)
            .chain(callbacks)
            .filter_map(|(kind, shader)| shader.map(|s| (kind, s)))
    }

    /// Number of populated slots.
    #[must_use]
    pub fn shader_count(&self) -> usize {
        self.iter().count()
    }

    /// Converts every populated slot, leaving empty slots empty.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(ShaderKind, &T) -> Result<U, E>,
    ) -> Result<TechniqueVariantBase<U>, E> {
        let ray_generation_shader = f(ShaderKind::RayGeneration, &self.ray_generation_shader)?;
        let miss_shader = f(ShaderKind::Miss, &self.miss_shader)?;

        let hit_shaders = self
            .hit_shaders
            .iter()
            .enumerate()
            .map(|(group, shader)| f(ShaderKind::Hit(group), shader))
            .collect::<Result<Vec<_>, E>>()?;

        let advanced_shadow_hit_shader = self
            .advanced_shadow_hit_shader
            .as_ref()
            .map(|shader| f(ShaderKind::AdvancedShadowHit, shader))
            .transpose()?;
        let advanced_shadow_miss_shader = self
            .advanced_shadow_miss_shader
            .as_ref()
            .map(|shader| f(ShaderKind::AdvancedShadowMiss, shader))
            .transpose()?;

        let mut callback_shaders: [Option<U>; CallbackType::COUNT] = [None, None];
        for callback in CallbackType::ALL {
            callback_shaders[callback.index()] = self
                .callback(callback)
                .map(|shader| f(ShaderKind::Callback(callback), shader))
                .transpose()?;
        }

        Ok(TechniqueVariantBase {
            ray_generation_shader,
            miss_shader,
            hit_shaders,
            advanced_shadow_hit_shader,
            advanced_shadow_miss_shader,
            callback_shaders,
        })
    }

    /// Infallible form of [`try_map`](Self::try_map).
    pub fn map<U>(&self, mut f: impl FnMut(ShaderKind, &T) -> U) -> TechniqueVariantBase<U> {
        match self.try_map::<U, std::convert::Infallible>(|kind, shader| Ok(f(kind, shader))) {
            Ok(mapped) => mapped,
            Err(never) => match never {},
        }
    }

    /// Whether `other` has a populated slot exactly where `self` does.
    #[must_use]
    pub fn is_congruent_with<U>(&self, other: &TechniqueVariantBase<U>) -> bool {
        self.hit_shaders.len() == other.hit_shaders.len()
            && self.advanced_shadow_hit_shader.is_some() == other.advanced_shadow_hit_shader.is_some()
            && self.advanced_shadow_miss_shader.is_some()
                == other.advanced_shadow_miss_shader.is_some()
            && CallbackType::ALL
                .into_iter()
                .all(|cb| self.callback(cb).is_some() == other.callback(cb).is_some())
    }
}

impl TechniqueVariant {
    /// Total size of the generated text, used for diagnostics.
    #[must_use]
    pub fn source_len(&self) -> usize {
        self.iter().map(|(_, source)| source.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TechniqueVariant {
        TechniqueVariant {
            ray_generation_shader: "rg".into(),
            miss_shader: "miss".into(),
            hit_shaders: vec!["h0".into(), "h1".into()],
            advanced_shadow_hit_shader: None,
            advanced_shadow_miss_shader: None,
            callback_shaders: [None, Some("after".into())],
        }
    }

    #[test]
    fn test_source_len_sums_populated_slots() {
        let variant = sample();
        assert_eq!(variant.shader_count(), 5);
        assert_eq!(variant.source_len(), "rg".len() + "miss".len() + "h0".len() + "h1".len() + "after".len());
    }

    #[test]
    fn test_iter_skips_empty_slots() {
        let kinds: Vec<_> = sample().iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            kinds,
            vec![
                ShaderKind::RayGeneration,
                ShaderKind::Miss,
                ShaderKind::Hit(0),
                ShaderKind::Hit(1),
                ShaderKind::Callback(CallbackType::AfterIteration),
            ]
        );
    }

    #[test]
    fn test_map_preserves_shape() {
        let variant = sample();
        let mut next = 0;
        let handles = variant.map(|_, _| {
            next += 1;
            ShaderHandle(next)
        });

        assert!(variant.is_congruent_with(&handles));
        assert_eq!(handles.shader_count(), variant.shader_count());
        assert_eq!(handles.callback(CallbackType::BeforeIteration), None);
    }

    #[test]
    fn test_try_map_stops_on_error() {
        let result = sample().try_map(|kind, _| match kind {
            ShaderKind::Hit(1) => Err("boom"),
            _ => Ok(()),
        });
        assert_eq!(result.unwrap_err(), "boom");
    }

    #[test]
    fn test_entry_point_names() {
        assert_eq!(ShaderKind::Miss.entry_point(), "ig_miss_shader");
        assert_eq!(ShaderKind::AdvancedShadowHit.entry_point(), ShaderKind::AdvancedShadowMiss.entry_point());
        assert_eq!(ShaderKind::Hit(3).to_string(), "hit[3]");
    }
}
