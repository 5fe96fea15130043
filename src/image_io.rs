//! Image Persistence
//!
//! Writes render layers (color, AOVs) as one multi-channel f32 EXR file.

use std::path::{Path, PathBuf};

use exr::prelude::*;
use rustc_hash::FxHashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageSaveError {
    #[error("Expected as many layer names as layers, got {names} names for {layers} layers")]
    LayerMismatch { names: usize, layers: usize },

    #[error("Layer '{name}' has {actual} samples, expected {expected}")]
    LayerSize {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Layer name '{0}' cannot be stored in an EXR header")]
    InvalidLayerName(String),

    #[error("Layer name '{0}' is used more than once")]
    DuplicateLayerName(String),

    #[error("Image size {width}x{height} has no pixels")]
    EmptyImage { width: usize, height: usize },

    #[error("Could not save image {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

/// Saves `layers` as single-channel f32 planes named by `names`.
///
/// Each layer holds `width * height` samples in row-major order. Arguments
/// are validated before the filesystem is touched. Missing parent
/// directories are created.
pub fn save_exr(
    path: impl AsRef<Path>,
    width: usize,
    height: usize,
    layers: &[&[f32]],
    names: &[impl AsRef<str>],
) -> std::result::Result<(), ImageSaveError> {
    let path = path.as_ref();

    if layers.len() != names.len() {
        return Err(ImageSaveError::LayerMismatch {
            names: names.len(),
            layers: layers.len(),
        });
    }

    if width == 0 || height == 0 {
        return Err(ImageSaveError::EmptyImage { width, height });
    }

    let expected = width.saturating_mul(height);
    let mut seen = FxHashSet::default();
    let mut channels = SmallVec::<[AnyChannel<FlatSamples>; 4]>::new();
    for (layer, name) in layers.iter().zip(names) {
        let name = name.as_ref();
        if layer.len() != expected {
            return Err(ImageSaveError::LayerSize {
                name: name.to_string(),
                expected,
                actual: layer.len(),
            });
        }

        if !seen.insert(name) {
            return Err(ImageSaveError::DuplicateLayerName(name.to_string()));
        }

        let text = Text::new_or_none(name).ok_or_else(|| ImageSaveError::InvalidLayerName(name.to_string()))?;
        channels.push(AnyChannel {
            name: text,
            sample_data: FlatSamples::F32(layer.to_vec()),
            quantize_linearly: false,
            sampling: Vec2(1, 1),
        });
    }

    let write_error = |message: String| ImageSaveError::Write {
        path: path.to_path_buf(),
        message,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
    }

    let encoding = Encoding {
        compression: Compression::PIZ,
        blocks: Blocks::ScanLines,
        line_order: LineOrder::Increasing,
    };
    let layer = Layer::new(
        (width, height),
        LayerAttributes::default(),
        encoding,
        AnyChannels::sort(channels),
    );

    Image::from_layer(layer)
        .write()
        .to_file(path)
        .map_err(|e| write_error(e.to_string()))?;

    log::debug!("Saved {} layer(s) of {width}x{height} to {}", layers.len(), path.display());
    Ok(())
}
