//! Compilation Context
//!
//! [`LoaderContext`] is built once per scene load and then handed to every
//! generator by shared reference. Everything that changes indices or the
//! active variant takes `&mut self`, so no registry can move while a program
//! is being emitted from the same context.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec3;

use super::ior::lookup_ior;
use super::registry::ResourceRegistry;
use super::texture_color::TextureColor;
use crate::emit::TechniqueEmitter;
use crate::errors::{CodegenError, Result};
use crate::scene::{Object, Property, Scene, SceneDatabase};
use crate::settings::LoaderOptions;
use crate::target::Target;
use crate::technique::{TechniqueInfo, TechniqueVariantInfo};

/// Color used when a color property is absent and the caller has no better guess.
pub const DEFAULT_COLOR: Vec3 = Vec3::ONE;

const DEFAULT_CAMERA_TYPE: &str = "perspective";
const DEFAULT_TECHNIQUE_TYPE: &str = "path";

#[derive(Debug, Clone)]
pub struct LoaderContext {
    pub scene: Arc<Scene>,
    pub file_path: PathBuf,
    pub target: Target,
    pub enable_padding: bool,
    samples_per_iteration: NonZeroUsize,
    pub resources: ResourceRegistry,
    pub camera_type: String,
    pub technique_type: String,
    pub technique_info: Arc<TechniqueInfo>,
    pub is_tracer: bool,
    current_technique_variant: usize,
    /// Set by the loading pipeline once the database is finalized.
    pub database: Option<Arc<SceneDatabase>>,
    pub entity_count: usize,
    /// Film size while loading. The renderer may use a different one later.
    pub film_width: usize,
    pub film_height: usize,
}

impl LoaderContext {
    pub fn new(scene: Scene, technique_info: TechniqueInfo, options: LoaderOptions) -> Result<Self> {
        // Baked into programs as an `i32` literal.
        let samples_per_iteration = NonZeroUsize::new(options.samples_per_iteration)
            .filter(|n| i32::try_from(n.get()).is_ok())
            .ok_or(CodegenError::InvalidSamplesPerIteration(options.samples_per_iteration))?;

        let camera_type = options.camera_type.clone().unwrap_or_else(|| {
            scene
                .camera
                .as_ref()
                .map_or_else(|| DEFAULT_CAMERA_TYPE.to_string(), |c| c.plugin_type.clone())
        });
        let technique_type = resolve_technique_type(&scene, &options);

        if technique_info.variants.is_empty() {
            log::warn!("Technique '{technique_type}' declares no variants");
        }

        Ok(Self {
            entity_count: scene.entities.len(),
            scene: Arc::new(scene),
            file_path: options.file_path,
            target: options.target,
            enable_padding: options.enable_padding,
            samples_per_iteration,
            resources: ResourceRegistry::new(),
            camera_type,
            technique_type,
            technique_info: Arc::new(technique_info),
            is_tracer: options.is_tracer,
            current_technique_variant: 0,
            database: None,
            film_width: options.film_width,
            film_height: options.film_height,
        })
    }

    /// Builds a context with the technique description supplied by `technique`
    /// and registers the scene's image textures.
    pub fn load(scene: Scene, options: LoaderOptions, technique: &dyn TechniqueEmitter) -> Result<Self> {
        let technique_type = resolve_technique_type(&scene, &options);
        let info = technique.info(&technique_type, &scene)?;

        let mut ctx = Self::new(scene, info, options)?;
        ctx.register_scene_textures()?;

        log::info!(
            "Loaded scene with {} entities, {} images, technique '{}' ({} variants)",
            ctx.entity_count,
            ctx.resources.image_count(),
            ctx.technique_type,
            ctx.technique_info.variant_count()
        );
        Ok(ctx)
    }

    #[inline]
    #[must_use]
    pub fn samples_per_iteration(&self) -> usize {
        self.samples_per_iteration.get()
    }

    // ========================================================================
    // Technique Variant Selection
    // ========================================================================

    /// # Panics
    /// Panics if `index` is not a variant of the loaded technique.
    pub fn select_technique_variant(&mut self, index: usize) {
        assert!(
            index < self.technique_info.variant_count(),
            "technique variant {index} out of range ({} variants)",
            self.technique_info.variant_count()
        );
        self.current_technique_variant = index;
    }

    #[inline]
    #[must_use]
    pub fn current_technique_variant(&self) -> usize {
        self.current_technique_variant
    }

    /// Descriptor of the selected variant.
    ///
    /// # Panics
    /// Panics if the technique has no variant at the selected index.
    #[inline]
    #[must_use]
    pub fn current_technique_variant_info(&self) -> &TechniqueVariantInfo {
        &self.technique_info.variants[self.current_technique_variant]
    }

    // ========================================================================
    // Database
    // ========================================================================

    pub fn set_database(&mut self, database: Arc<SceneDatabase>) {
        self.database = Some(database);
    }

    /// The finalized scene database, required before any program is emitted.
    pub fn database(&self) -> Result<&SceneDatabase> {
        self.database.as_deref().ok_or(CodegenError::DatabaseMissing)
    }

    // ========================================================================
    // Scene Queries
    // ========================================================================

    /// Resolves an asset path recorded on `object`.
    ///
    /// Absolute paths are kept. Relative ones are resolved against the
    /// directory that declared the object, falling back to the directory of
    /// the scene file.
    #[must_use]
    pub fn handle_path(&self, path: impl AsRef<Path>, object: &Object) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            return path.to_path_buf();
        }

        match &object.base_dir {
            Some(base) => base.join(path),
            None => self
                .file_path
                .parent()
                .map_or_else(|| path.to_path_buf(), |dir| dir.join(path)),
        }
    }

    /// Reads a color property, splatting scalars. Absent properties yield `default`.
    pub fn extract_color(&self, object: &Object, property: &str, default: Vec3) -> Result<Vec3> {
        object.get_vector3(property, default)
    }

    /// Reads an index of refraction given as a number or a dielectric name.
    pub fn extract_ior(&self, object: &Object, property: &str, default: f32) -> Result<f32> {
        match object.property(property) {
            None => Ok(default),
            Some(Property::Number(v)) => Ok(*v),
            Some(Property::Integer(v)) => Ok(*v as f32),
            Some(Property::String(name)) => lookup_ior(name).ok_or_else(|| CodegenError::UnknownIor {
                object: object.name.clone(),
                name: name.clone(),
            }),
            Some(_) => Err(object.mismatch(property, "number or material name")),
        }
    }

    /// Reads a property that is either a registered texture name or a color.
    pub fn extract_texture_color(
        &self,
        object: &Object,
        property: &str,
        default: Vec3,
    ) -> Result<TextureColor> {
        match object.property(property) {
            None => Ok(TextureColor::Color(default)),
            Some(Property::String(texture)) => self
                .resources
                .texture_buffer(texture)
                .map(TextureColor::Texture)
                .ok_or_else(|| CodegenError::UnknownTexture {
                    object: object.name.clone(),
                    property: property.to_string(),
                    texture: texture.clone(),
                }),
            Some(Property::Vector3(v)) => Ok(TextureColor::Color(*v)),
            Some(Property::Number(v)) => Ok(TextureColor::Color(Vec3::splat(*v))),
            Some(Property::Integer(v)) => Ok(TextureColor::Color(Vec3::splat(*v as f32))),
            Some(_) => Err(object.mismatch(property, "texture name, vector3 or number")),
        }
    }

    /// One hit group per material the scene defines.
    #[inline]
    #[must_use]
    pub fn hit_group_count(&self) -> usize {
        self.scene.bsdfs.len()
    }

    /// Aspect ratio of the loading-time film.
    #[must_use]
    pub fn film_aspect(&self) -> f32 {
        if self.film_height == 0 {
            1.0
        } else {
            self.film_width as f32 / self.film_height as f32
        }
    }

    // ========================================================================
    // Resource Registration
    // ========================================================================

    /// Registers every image texture of the scene.
    ///
    /// The resolved file path identifies the image, so two textures sharing a
    /// file share one buffer. Procedural textures are left to the shading tree.
    pub fn register_scene_textures(&mut self) -> Result<()> {
        let scene = Arc::clone(&self.scene);

        for (name, texture) in &scene.textures {
            if texture.plugin_type != "image" {
                log::debug!("Texture '{name}' of type '{}' is not image backed", texture.plugin_type);
                continue;
            }

            let filename = texture
                .get_string("filename")?
                .ok_or_else(|| CodegenError::MissingProperty {
                    object: name.clone(),
                    property: "filename".to_string(),
                })?;
            let path = self.handle_path(filename, texture);
            let average = self.extract_color(texture, "average", DEFAULT_COLOR)?;

            let buffer = self.resources.register_image(&path.to_string_lossy());
            let slot = self.resources.register_texture(name, buffer, average);
            log::debug!("Texture '{name}' -> slot {slot}, image buffer {buffer} ({})", path.display());
        }

        Ok(())
    }
}

fn resolve_technique_type(scene: &Scene, options: &LoaderOptions) -> String {
    options.technique_type.clone().unwrap_or_else(|| {
        scene
            .technique
            .as_ref()
            .map_or_else(|| DEFAULT_TECHNIQUE_TYPE.to_string(), |t| t.plugin_type.clone())
    })
}
