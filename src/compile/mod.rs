//! Compilation Cache
//!
//! Hands generated programs to an external [`ShaderToolchain`] and
//! deduplicates identical sources by their xxh3-128 hash. Variants commonly
//! share entry points (miss shaders of a single-variant technique, hit shaders
//! of identical materials), which then compile once.

use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_128;

use crate::errors::Result;
use crate::technique::{ShaderHandle, ShaderKind, TechniqueVariant, TechniqueVariantShaderSet};

/// The ahead-of-time compiler consuming generated programs.
pub trait ShaderToolchain {
    fn compile(&mut self, kind: ShaderKind, source: &str) -> Result<ShaderHandle>;
}

pub struct ShaderCache<T: ShaderToolchain> {
    toolchain: T,
    /// xxh3-128 of program text → compiled handle.
    modules: FxHashMap<u128, ShaderHandle>,
}

impl<T: ShaderToolchain> ShaderCache<T> {
    #[must_use]
    pub fn new(toolchain: T) -> Self {
        Self {
            toolchain,
            modules: FxHashMap::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    #[must_use]
    pub fn into_toolchain(self) -> T {
        self.toolchain
    }

    /// Compiles `source` unless an identical program was compiled before.
    pub fn get_or_compile(&mut self, kind: ShaderKind, source: &str) -> Result<ShaderHandle> {
        let hash = xxh3_128(source.as_bytes());

        if let Some(&handle) = self.modules.get(&hash) {
            log::debug!("Reusing compiled {kind} ({hash:032x})");
            return Ok(handle);
        }

        let handle = self.toolchain.compile(kind, source)?;
        log::debug!("Compiled {kind} ({hash:032x}, {} bytes)", source.len());
        self.modules.insert(hash, handle);
        Ok(handle)
    }

    /// Compiles every populated slot. The result has a handle exactly where
    /// `variant` has source text.
    pub fn compile_variant(&mut self, variant: &TechniqueVariant) -> Result<TechniqueVariantShaderSet> {
        variant.try_map(|kind, source| self.get_or_compile(kind, source))
    }

    pub fn compile_all(&mut self, variants: &[TechniqueVariant]) -> Result<Vec<TechniqueVariantShaderSet>> {
        variants.iter().map(|v| self.compile_variant(v)).collect()
    }

    /// Number of distinct programs compiled so far.
    #[inline]
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}
