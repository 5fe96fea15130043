//! Texture-or-color values.

use glam::Vec3;

/// A material or light input that is either a texture reference or a constant.
///
/// Consumers branch on the variant (usually with `match`). The checked
/// accessors [`texture`](Self::texture) and [`color`](Self::color) panic when
/// called on the other variant; there is no silent fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureColor {
    /// Buffer index of a registered texture.
    Texture(u32),
    /// Literal RGB constant.
    Color(Vec3),
}

impl TextureColor {
    #[inline]
    #[must_use]
    pub fn is_texture(&self) -> bool {
        matches!(self, Self::Texture(_))
    }

    #[inline]
    #[must_use]
    pub fn is_color(&self) -> bool {
        matches!(self, Self::Color(_))
    }

    /// # Panics
    /// Panics if the value is a color.
    #[must_use]
    pub fn texture(&self) -> u32 {
        match self {
            Self::Texture(index) => *index,
            Self::Color(color) => panic!("expected a texture reference, found color {color}"),
        }
    }

    /// # Panics
    /// Panics if the value is a texture reference.
    #[must_use]
    pub fn color(&self) -> Vec3 {
        match self {
            Self::Color(color) => *color,
            Self::Texture(index) => panic!("expected a color, found texture buffer {index}"),
        }
    }
}

impl From<Vec3> for TextureColor {
    fn from(color: Vec3) -> Self {
        Self::Color(color)
    }
}
