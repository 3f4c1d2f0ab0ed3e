//! Grayscale previews of influence maps, for debugging placement logic.
//!
//! This is a one-way export: nothing in the engine reads images back.

use std::path::Path;

use image::{GrayImage, Luma};

use crate::grid::InfluenceMap;
use crate::services::DebugSink;
use crate::types::GridError;

/// Render an influence map to a grayscale image.
///
/// Values are scaled so `threshold` (and anything above it) maps to white;
/// a threshold of 0 renders an all-black image.
pub fn influence_map_to_image(map: &InfluenceMap, threshold: u16) -> GrayImage {
    grid_to_image(map.data(), map.width(), map.height(), threshold)
}

fn grid_to_image(data: &[u16], width: u32, height: u32, threshold: u16) -> GrayImage {
    let mut img = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let value = data[(x + y * width) as usize];
            img.put_pixel(x, y, Luma([value_to_gray(value, threshold)]));
        }
    }
    img
}

fn value_to_gray(value: u16, threshold: u16) -> u8 {
    if threshold == 0 {
        return 0;
    }
    let scaled = (u32::from(value.min(threshold)) * 255) / u32::from(threshold);
    scaled as u8
}

/// [`DebugSink`] that writes PNG files into a directory.
#[derive(Debug, Clone)]
pub struct ImageSink {
    directory: std::path::PathBuf,
}

impl ImageSink {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    fn write(&self, name: &str, img: &GrayImage) -> Result<(), GridError> {
        img.save(self.directory.join(name))
            .map_err(|e| GridError::ServiceUnavailable(format!("image dump failed: {e}")))
    }
}

impl DebugSink for ImageSink {
    fn dump(&mut self, name: &str, data: &[u16], width: u32, height: u32, threshold: u16) {
        // Dumps are best-effort; a failed write never aborts planning.
        let img = grid_to_image(data, width, height, threshold);
        let _ = self.write(name, &img);
    }
}
