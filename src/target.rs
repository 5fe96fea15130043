//! Device Target Description
//!
//! A [`Target`] selects the compute device the generated programs are built
//! for. It is fixed once the loader context is created; generators only read
//! it to specialize the device-construction fragment.

use serde::{Deserialize, Serialize};

/// Instruction set or GPU vendor the external compiler targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetArchitecture {
    /// Portable scalar CPU code.
    #[default]
    Generic,
    Sse42,
    Avx,
    Avx2,
    Avx512,
    /// ARM Advanced SIMD.
    Asimd,
    Nvidia,
    Amd,
}

impl TargetArchitecture {
    #[inline]
    #[must_use]
    pub fn is_cpu(self) -> bool {
        !self.is_gpu()
    }

    #[inline]
    #[must_use]
    pub fn is_gpu(self) -> bool {
        matches!(self, Self::Nvidia | Self::Amd)
    }

    /// Native SIMD lane count for 32-bit floats.
    #[must_use]
    pub fn default_vector_width(self) -> usize {
        match self {
            Self::Generic => 1,
            Self::Sse42 | Self::Asimd => 4,
            Self::Avx | Self::Avx2 => 8,
            Self::Avx512 => 16,
            Self::Nvidia | Self::Amd => 32,
        }
    }
}

/// Device/platform descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    pub architecture: TargetArchitecture,
    pub vector_width: usize,
    /// Device ordinal on multi-GPU systems. Ignored on CPU targets.
    pub device: usize,
    /// Worker thread count for CPU targets, `0` lets the runtime decide.
    pub thread_count: usize,
}

impl Default for Target {
    fn default() -> Self {
        Self::pick_cpu(TargetArchitecture::Generic)
    }
}

impl Target {
    #[must_use]
    pub fn pick_cpu(architecture: TargetArchitecture) -> Self {
        debug_assert!(architecture.is_cpu());
        Self {
            architecture,
            vector_width: architecture.default_vector_width(),
            device: 0,
            thread_count: 0,
        }
    }

    #[must_use]
    pub fn pick_gpu(architecture: TargetArchitecture, device: usize) -> Self {
        debug_assert!(architecture.is_gpu());
        Self {
            architecture,
            vector_width: architecture.default_vector_width(),
            device,
            thread_count: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_cpu(&self) -> bool {
        self.architecture.is_cpu()
    }

    #[inline]
    #[must_use]
    pub fn is_gpu(&self) -> bool {
        self.architecture.is_gpu()
    }
}
