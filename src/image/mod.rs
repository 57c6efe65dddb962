//! Image module: pixels, dense grayscale grids, and neighborhood enumeration.
//!
//! Components
//! - `Pixel`: coordinate + intensity value, freely copied.
//! - `GrayImage`: owned 8-bit grayscale buffer (row-major, dense).
//! - `Connectivity`: 4- or 8-neighborhood adjacency on the grid.
//! - `io`: helpers for loading/saving images and label visualizations.
//!
//! Design goals
//! - Keep the solver's hot loop simple and cache-friendly: one flat `Vec<u8>`,
//!   linear indices `y * w + x`, no ragged rows.
//! - Neighbor enumeration order is fixed so that solver tie-breaking is
//!   deterministic within a run.

pub mod io;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// A single image sample: grid coordinates plus intensity.
///
/// Equality and hashing cover all three fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
    pub intensity: u8,
}

impl Pixel {
    pub fn new(x: i32, y: i32, intensity: u8) -> Self {
        Self { x, y, intensity }
    }

    /// Row-major linear index in an image of width `width`.
    #[inline]
    pub fn linear_index(&self, width: usize) -> usize {
        self.y as usize * width + self.x as usize
    }

    /// Inverse of [`linear_index`](Self::linear_index); intensity is left zero.
    pub fn from_linear_index(index: usize, width: usize) -> Self {
        Self {
            x: (index % width) as i32,
            y: (index / width) as i32,
            intensity: 0,
        }
    }

    /// Euclidean distance between pixel centers.
    pub fn distance_to(&self, other: &Pixel) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.intensity)
    }
}

/// Grid adjacency: axis neighbors only, or axis plus diagonals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    #[default]
    Four,
    Eight,
}

// Enumeration order is part of the solver's tie-breaking contract: axis
// neighbors N, W, E, S; the 8-connected ring adds diagonals in row-major order.
const OFFSETS_4: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
const OFFSETS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl Connectivity {
    fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Connectivity::Four => &OFFSETS_4,
            Connectivity::Eight => &OFFSETS_8,
        }
    }
}

/// Owned 8-bit grayscale image with dense row-major storage.
///
/// Immutable during an IFT run; the solver only reads intensities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImage {
    /// All-zero image. Fails on zero width or height.
    pub fn new(width: usize, height: usize) -> Result<Self, String> {
        Self::filled(width, height, 0)
    }

    /// Image filled with a constant intensity. Fails on zero width or height.
    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!(
                "Image dimensions must be positive, got {width}x{height}"
            ));
        }
        Ok(Self {
            width,
            height,
            data: vec![value; width * height],
        })
    }

    /// Build from a rectangular row matrix. Fails on empty or ragged input.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, String> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err("Image data cannot be empty".to_string());
        }
        let width = rows[0].len();
        let mut data = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(format!(
                    "All rows must have the same width: row {y} has {} elements, expected {width}",
                    row.len()
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            width,
            height: rows.len(),
            data,
        })
    }

    /// Take ownership of a flat row-major buffer.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!(
                "Image dimensions must be positive, got {width}x{height}"
            ));
        }
        if data.len() != width * height {
            return Err(format!(
                "Buffer length {} does not match {width}x{height}",
                data.len()
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total pixel count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> usize {
        assert!(
            self.in_bounds(x, y),
            "pixel ({x},{y}) out of bounds for {}x{} image",
            self.width,
            self.height
        );
        y as usize * self.width + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// Intensity at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn value(&self, x: i32, y: i32) -> u8 {
        self.data[self.idx(x, y)]
    }

    /// Overwrite the intensity at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn set_value(&mut self, x: i32, y: i32, value: u8) {
        let i = self.idx(x, y);
        self.data[i] = value;
    }

    /// Bundle coordinates and intensity. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Pixel {
        Pixel::new(x, y, self.data[self.idx(x, y)])
    }

    /// Every pixel in row-major order.
    pub fn all_pixels(&self) -> Vec<Pixel> {
        let mut pixels = Vec::with_capacity(self.data.len());
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                pixels.push(Pixel::new(
                    x,
                    y,
                    self.data[y as usize * self.width + x as usize],
                ));
            }
        }
        pixels
    }

    /// The 2-to-8 in-bounds neighbors of `p` under the given adjacency.
    ///
    /// The enumeration order is fixed (see the module offsets); the solver
    /// relies on it for deterministic tie-breaking.
    pub fn neighbors(&self, p: Pixel, connectivity: Connectivity) -> Vec<Pixel> {
        let mut neighbors = Vec::with_capacity(8);
        for &(dx, dy) in connectivity.offsets() {
            let nx = p.x + dx;
            let ny = p.y + dy;
            if self.in_bounds(nx, ny) {
                neighbors.push(Pixel::new(
                    nx,
                    ny,
                    self.data[ny as usize * self.width + nx as usize],
                ));
            }
        }
        neighbors
    }

    /// Write the image as a plain-text PGM (P2) file.
    pub fn save_pgm(&self, path: &Path) -> Result<(), String> {
        let mut out = String::with_capacity(self.data.len() * 4 + 32);
        out.push_str("P2\n");
        out.push_str(&format!("{} {}\n255\n", self.width, self.height));
        for y in 0..self.height {
            let row = &self.data[y * self.width..(y + 1) * self.width];
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        fs::write(path, out).map_err(|e| format!("Failed to write {}: {e}", path.display()))
    }
}
