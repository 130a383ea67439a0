//! Difference-hash image fingerprinting.
//!
//! The fingerprint is a 56-bit dHash: the image is grayscaled and stretched
//! to a fixed 9×8 grid (independent of source resolution or aspect), then
//! each pixel is compared with its right-hand neighbor per row, emitting bit
//! `1` when the left pixel is strictly brighter. Similarity between two
//! fingerprints is the fraction of matching bits.
//!
//! dHash tolerates minor lighting and compression differences while staying
//! cheap to compute and compare. It is a coarse, non-rotation-invariant
//! ranking signal, not an exact-match guarantee.

use std::fmt;

use image::imageops::FilterType;
use image::DynamicImage;

/// Grid width in pixels. Each row contributes `GRID_W - 1` comparisons.
pub const GRID_W: u32 = 9;
/// Grid height in pixels.
pub const GRID_H: u32 = 8;
/// Fingerprint length in bits.
pub const BITS: u32 = GRID_H * (GRID_W - 1);

/// A fixed-length 56-bit image fingerprint. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Compute the dHash of an image.
    ///
    /// Deterministic: the same image always yields the same fingerprint.
    /// Triangle (bilinear) resampling keeps the downscale stable across
    /// source resolutions.
    pub fn from_image(image: &DynamicImage) -> Self {
        let grid = image
            .grayscale()
            .resize_exact(GRID_W, GRID_H, FilterType::Triangle)
            .to_luma8();

        let mut bits = 0u64;
        for y in 0..GRID_H {
            for x in 0..GRID_W - 1 {
                bits <<= 1;
                if grid.get_pixel(x, y)[0] > grid.get_pixel(x + 1, y)[0] {
                    bits |= 1;
                }
            }
        }

        Fingerprint(bits)
    }

    /// Reconstruct a fingerprint from its raw bits (cache deserialization).
    pub fn from_bits(bits: u64) -> Self {
        Fingerprint(bits & (u64::MAX >> (64 - BITS)))
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Count of differing bit positions.
    pub fn hamming(&self, other: &Fingerprint) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// Fraction of matching bits, always in `[0, 1]`. Identical images
    /// (post-resize) score exactly 1.
    pub fn similarity(&self, other: &Fingerprint) -> f64 {
        1.0 - f64::from(self.hamming(other)) / f64::from(BITS)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 56 bits => 14 hex digits
        write!(f, "{:014x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// A horizontal gradient: brightness rises left to right.
    fn gradient(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for (x, _, pixel) in img.enumerate_pixels_mut() {
            let v = (x * 255 / width.max(1)) as u8;
            *pixel = Rgb([v, v, v]);
        }
        DynamicImage::ImageRgb8(img)
    }

    fn checkerboard(width: u32, height: u32, cell: u32) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let on = ((x / cell) + (y / cell)) % 2 == 0;
            let v = if on { 255 } else { 0 };
            *pixel = Rgb([v, v, v]);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_bit_length() {
        assert_eq!(BITS, 56);
    }

    #[test]
    fn test_fingerprint_stable() {
        let img = checkerboard(64, 64, 8);
        let a = Fingerprint::from_image(&img);
        let b = Fingerprint::from_image(&img);
        assert_eq!(a, b);
    }

    #[test]
    fn test_self_similarity_is_one() {
        let img = gradient(120, 80);
        let fp = Fingerprint::from_image(&img);
        assert_eq!(fp.hamming(&fp), 0);
        assert_eq!(fp.similarity(&fp), 1.0);
    }

    #[test]
    fn test_resolution_independent() {
        // Same scene at different resolutions and aspect ratios lands on the
        // same grid, so the fingerprints should be very close.
        let small = gradient(36, 32);
        let large = gradient(360, 240);
        let fp_small = Fingerprint::from_image(&small);
        let fp_large = Fingerprint::from_image(&large);
        assert!(
            fp_small.hamming(&fp_large) <= 4,
            "hamming {} too large",
            fp_small.hamming(&fp_large)
        );
    }

    #[test]
    fn test_gradient_fingerprint_all_dark_to_bright() {
        // Strictly rising brightness: every left pixel is darker than its
        // right neighbor, so no comparison emits a 1.
        let fp = Fingerprint::from_image(&gradient(90, 80));
        assert_eq!(fp.bits(), 0);
    }

    #[test]
    fn test_recompressed_copy_stays_close() {
        use std::io::Cursor;

        let original = checkerboard(64, 64, 8);
        let mut jpeg_bytes = Vec::new();
        original
            .write_to(&mut Cursor::new(&mut jpeg_bytes), image::ImageFormat::Jpeg)
            .unwrap();
        let recompressed = image::load_from_memory(&jpeg_bytes).unwrap();

        let fp_original = Fingerprint::from_image(&original);
        let fp_recompressed = Fingerprint::from_image(&recompressed);
        assert!(
            fp_original.hamming(&fp_recompressed) <= 4,
            "lossy recompression moved the fingerprint by {} bits",
            fp_original.hamming(&fp_recompressed)
        );
    }

    #[test]
    fn test_distinct_images_distinct_fingerprints() {
        let a = Fingerprint::from_image(&checkerboard(64, 64, 8));
        let b = Fingerprint::from_image(&gradient(64, 64));
        assert_ne!(a, b);
        assert!(a.similarity(&b) < 1.0);
        assert!(a.similarity(&b) >= 0.0);
    }

    #[test]
    fn test_similarity_bounds() {
        let zero = Fingerprint::from_bits(0);
        let full = Fingerprint::from_bits(u64::MAX);
        assert_eq!(zero.hamming(&full), BITS);
        assert_eq!(zero.similarity(&full), 0.0);
        assert_eq!(full.similarity(&full), 1.0);
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(Fingerprint::from_bits(0).to_string(), "00000000000000");
        assert_eq!(
            Fingerprint::from_bits(u64::MAX >> (64 - BITS)).to_string(),
            "00ffffffffffff"
        );
    }
}
