use ift_segmenter::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Diagonal ramp `I(x, y) = step·(x + y)`, clamped to u8.
pub fn diagonal_gradient(width: usize, height: usize, step: u32) -> GrayImage {
    let mut img = GrayImage::new(width, height).expect("positive dimensions");
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let v = (step * (x + y) as u32).min(255) as u8;
            img.set_value(x, y, v);
        }
    }
    img
}

/// Unit-cell checkerboard alternating between two intensities.
pub fn checkerboard(width: usize, height: usize, low: u8, high: u8) -> GrayImage {
    let mut img = GrayImage::new(width, height).expect("positive dimensions");
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let v = if (x + y) & 1 == 0 { low } else { high };
            img.set_value(x, y, v);
        }
    }
    img
}

/// Deterministic pseudo-random intensities from a fixed RNG seed.
pub fn random_image(width: usize, height: usize, seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<u8> = (0..width * height).map(|_| rng.gen()).collect();
    GrayImage::from_raw(width, height, data).expect("positive dimensions")
}
