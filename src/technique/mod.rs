//! Technique Variant Model
//!
//! A rendering technique is described once per scene by a [`TechniqueInfo`]:
//! an ordered list of variants, each declaring which entry points it needs and
//! how its shaders treat lights and the framebuffer. The generated programs
//! for one variant are collected in a [`TechniqueVariant`] and, after the
//! external toolchain ran, in a congruent [`TechniqueVariantShaderSet`].

pub mod variant;

pub use variant::{
    CallbackType, ShaderHandle, ShaderKind, TechniqueVariant, TechniqueVariantBase,
    TechniqueVariantShaderSet,
};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct VariantFeatures: u32 {
        const USES_LIGHTS               = 1 << 0;
        const USES_ALL_LIGHTS_IN_MISS   = 1 << 1;
        const LOCK_FRAMEBUFFER          = 1 << 2;
        const BEFORE_ITERATION_CALLBACK = 1 << 3;
        const AFTER_ITERATION_CALLBACK  = 1 << 4;
    }
}

/// How shadow rays are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowHandlingMode {
    /// Occlusion only, handled by the traversal kernel.
    #[default]
    Simple,
    /// Dedicated hit/miss shaders run for every shadow ray.
    Advanced,
}

/// Description of one variant of a technique.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechniqueVariantInfo {
    pub features: VariantFeatures,
    pub shadow_handling_mode: ShadowHandlingMode,
    /// Expression initializing the per-ray payload at emission, replaces
    /// the empty payload when set.
    pub emitter_payload_initializer: Option<String>,
    pub primary_payload_count: usize,
    pub secondary_payload_count: usize,
}

impl TechniqueVariantInfo {
    #[must_use]
    pub fn new(features: VariantFeatures) -> Self {
        Self {
            features,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_shadow_handling(mut self, mode: ShadowHandlingMode) -> Self {
        self.shadow_handling_mode = mode;
        self
    }

    #[must_use]
    pub fn with_payload(mut self, primary: usize, secondary: usize) -> Self {
        self.primary_payload_count = primary;
        self.secondary_payload_count = secondary;
        self
    }

    #[must_use]
    pub fn with_emitter_payload_initializer(mut self, initializer: &str) -> Self {
        self.emitter_payload_initializer = Some(initializer.to_string());
        self
    }

    #[inline]
    #[must_use]
    pub fn uses_lights(&self) -> bool {
        self.features.contains(VariantFeatures::USES_LIGHTS)
    }

    #[inline]
    #[must_use]
    pub fn uses_all_lights_in_miss(&self) -> bool {
        self.features.contains(VariantFeatures::USES_ALL_LIGHTS_IN_MISS)
    }

    #[inline]
    #[must_use]
    pub fn lock_framebuffer(&self) -> bool {
        self.features.contains(VariantFeatures::LOCK_FRAMEBUFFER)
    }

    #[inline]
    #[must_use]
    pub fn requires_advanced_shadows(&self) -> bool {
        self.shadow_handling_mode == ShadowHandlingMode::Advanced
    }

    #[must_use]
    pub fn has_callback(&self, callback: CallbackType) -> bool {
        let flag = match callback {
            CallbackType::BeforeIteration => VariantFeatures::BEFORE_ITERATION_CALLBACK,
            CallbackType::AfterIteration => VariantFeatures::AFTER_ITERATION_CALLBACK,
        };
        self.features.contains(flag)
    }
}

/// All variants of the technique selected for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechniqueInfo {
    pub variants: Vec<TechniqueVariantInfo>,
    /// Arbitrary output variables written besides the main color.
    pub enabled_aovs: Vec<String>,
}

impl TechniqueInfo {
    /// Single-variant technique.
    #[must_use]
    pub fn single(variant: TechniqueVariantInfo) -> Self {
        Self {
            variants: vec![variant],
            enabled_aovs: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_accessors() {
        let info = TechniqueVariantInfo::new(
            VariantFeatures::USES_LIGHTS | VariantFeatures::LOCK_FRAMEBUFFER,
        );
        assert!(info.uses_lights());
        assert!(!info.uses_all_lights_in_miss());
        assert!(info.lock_framebuffer());
        assert!(!info.requires_advanced_shadows());
    }

    #[test]
    fn test_callbacks() {
        let info = TechniqueVariantInfo::new(VariantFeatures::AFTER_ITERATION_CALLBACK);
        assert!(!info.has_callback(CallbackType::BeforeIteration));
        assert!(info.has_callback(CallbackType::AfterIteration));
    }

    #[test]
    fn test_deserialize_info() {
        let info: TechniqueInfo = serde_json::from_str(
            r#"{
                "variants": [
                    { "features": "USES_LIGHTS | USES_ALL_LIGHTS_IN_MISS" },
                    { "shadow_handling_mode": "advanced" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(info.variant_count(), 2);
        assert!(info.variants[0].uses_all_lights_in_miss());
        assert!(info.variants[1].requires_advanced_shadows());
        assert!(info.enabled_aovs.is_empty());
    }
}
