//! I/O helpers for grayscale images, label visualizations, and JSON reports.
//!
//! - `load_grayscale`: read a PNG/JPEG/etc. into an owned 8-bit gray buffer.
//! - `save_grayscale_png`: write a `GrayImage` to a grayscale PNG.
//! - `save_label_visualization`: write the colored segmentation PNG.
//! - `label_color`: label → RGB mapping with a fixed nine-entry palette.
//! - `write_json_file`: pretty-print a serializable value to disk.

use super::GrayImage;
use crate::result::IftResult;
use image::{ImageBuffer, Luma, Rgb};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Fixed palette for the first nine labels, starting at label 0 (black).
/// Labels beyond the palette fall back to a grayscale echo of the source.
const LABEL_PALETTE: [[u8; 3]; 9] = [
    [0, 0, 0],       // black
    [255, 0, 0],     // red
    [0, 255, 0],     // green
    [0, 0, 255],     // blue
    [255, 255, 0],   // yellow
    [255, 0, 255],   // magenta
    [0, 255, 255],   // cyan
    [128, 0, 128],   // purple
    [255, 165, 0],   // orange
];

/// Load an image from disk and convert it to 8-bit grayscale.
///
/// Color inputs are collapsed with the usual weighted-channel luma conversion.
pub fn load_grayscale(path: &Path) -> Result<GrayImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    GrayImage::from_raw(width, height, img.into_raw())
}

/// Save an 8-bit grayscale buffer to a PNG (or any format `image` infers).
pub fn save_grayscale_png(buffer: &GrayImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_raw(
        buffer.width() as u32,
        buffer.height() as u32,
        buffer.as_slice().to_vec(),
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    img.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// RGB color for a label; `intensity` backs the out-of-palette fallback.
pub fn label_color(label: i32, intensity: u8) -> [u8; 3] {
    if label >= 0 && (label as usize) < LABEL_PALETTE.len() {
        LABEL_PALETTE[label as usize]
    } else {
        [intensity, intensity, intensity]
    }
}

/// Write an RGB PNG where each pixel is colored by its forest label.
pub fn save_label_visualization(
    image: &GrayImage,
    result: &IftResult,
    path: &Path,
) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let width = image.width();
    let height = image.height();
    let mut out: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width as u32, height as u32);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let pixel = image.pixel(x, y);
            let color = label_color(result.label(pixel), pixel.intensity);
            out.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
