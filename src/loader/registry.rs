//! Resource Registry
//!
//! Assigns buffer indices to images and textures while a scene is loaded.
//!
//! # Design
//!
//! Indices are handed out in insertion order and never change afterwards.
//! Registering an identifier a second time returns the index it already has,
//! so repeated generation passes over the same scene reference identical
//! indices.

use glam::Vec3;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextureEntry {
    slot: usize,
    buffer: u32,
}

/// Image and texture index tables of a loader context.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    images: FxHashMap<String, u32>,
    /// Image identifiers in allocation order.
    image_order: Vec<String>,
    textures: FxHashMap<String, TextureEntry>,
    /// One average color per registered texture, indexed by texture slot.
    texture_averages: Vec<Vec3>,
}

impl ResourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the buffer index of `id`, allocating the next free one on
    /// first registration.
    pub fn register_image(&mut self, id: &str) -> u32 {
        if let Some(&index) = self.images.get(id) {
            return index;
        }

        let index = self.image_order.len() as u32;
        self.images.insert(id.to_string(), index);
        self.image_order.push(id.to_string());
        index
    }

    #[inline]
    #[must_use]
    pub fn image_index(&self, id: &str) -> Option<u32> {
        self.images.get(id).copied()
    }

    /// Registered images with their indices, in allocation order.
    pub fn images(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.image_order
            .iter()
            .enumerate()
            .map(|(index, id)| (id.as_str(), index as u32))
    }

    #[inline]
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.image_order.len()
    }

    /// Registers a texture backed by image buffer `buffer` and returns its slot.
    ///
    /// Re-registering a known texture returns the existing slot and keeps the
    /// buffer and average recorded the first time.
    pub fn register_texture(&mut self, name: &str, buffer: u32, average: Vec3) -> usize {
        if let Some(entry) = self.textures.get(name) {
            return entry.slot;
        }

        let slot = self.texture_averages.len();
        self.textures
            .insert(name.to_string(), TextureEntry { slot, buffer });
        self.texture_averages.push(average);
        slot
    }

    /// Buffer index backing texture `name`.
    #[inline]
    #[must_use]
    pub fn texture_buffer(&self, name: &str) -> Option<u32> {
        self.textures.get(name).map(|entry| entry.buffer)
    }

    #[inline]
    #[must_use]
    pub fn texture_slot(&self, name: &str) -> Option<usize> {
        self.textures.get(name).map(|entry| entry.slot)
    }

    #[inline]
    #[must_use]
    pub fn texture_average(&self, slot: usize) -> Option<Vec3> {
        self.texture_averages.get(slot).copied()
    }

    #[inline]
    #[must_use]
    pub fn texture_averages(&self) -> &[Vec3] {
        &self.texture_averages
    }

    #[inline]
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_image_is_idempotent() {
        let mut registry = ResourceRegistry::new();
        let a = registry.register_image("albedo");
        let b = registry.register_image("normal");
        let a2 = registry.register_image("albedo");

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(a, a2);
        assert_eq!(registry.image_count(), 2);
    }

    #[test]
    fn test_images_in_allocation_order() {
        let mut registry = ResourceRegistry::new();
        for id in ["z", "a", "m", "a"] {
            registry.register_image(id);
        }

        let order: Vec<_> = registry.images().collect();
        assert_eq!(order, vec![("z", 0), ("a", 1), ("m", 2)]);
    }

    #[test]
    fn test_texture_averages_stay_in_sync() {
        let mut registry = ResourceRegistry::new();
        let buffer = registry.register_image("wood.png");
        let slot = registry.register_texture("wood", buffer, Vec3::splat(0.25));
        let again = registry.register_texture("wood", 42, Vec3::ONE);

        assert_eq!(slot, again);
        assert_eq!(registry.texture_buffer("wood"), Some(buffer));
        assert_eq!(registry.texture_average(slot), Some(Vec3::splat(0.25)));
        assert_eq!(registry.texture_averages().len(), registry.texture_count());
    }

    #[test]
    fn test_unknown_lookups() {
        let registry = ResourceRegistry::new();
        assert_eq!(registry.image_index("nope"), None);
        assert_eq!(registry.texture_buffer("nope"), None);
        assert_eq!(registry.texture_average(0), None);
    }
}
