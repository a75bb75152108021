//! Overlay compositing.
//!
//! Pure pixel rules; no UI types. The overlay panel shows the mask drawn
//! above the uploaded image with a multiplicative blend at a user-controlled
//! opacity, so the composite for opacity `a` is
//!
//!   out = base * ((1 - a) + a * mask / 255)
//!
//! per channel. At `a = 0` the base is reproduced exactly, at `a = 1` the
//! blend is a full multiply, and a white mask leaves the base unchanged at
//! any opacity.

use crate::state::{MaskResult, SourceImage};

/// Composites `mask` over `source` and returns RGB8 pixels with the source's
/// dimensions. The mask is sampled nearest-neighbor when its dimensions
/// differ from the source. `opacity` is clamped to [0, 1].
pub fn compose(source: &SourceImage, mask: &MaskResult, opacity: f32) -> Vec<u8> {
    let opacity = opacity.clamp(0.0, 1.0);
    let (w, h) = (source.width as usize, source.height as usize);
    let (mw, mh) = (mask.width as usize, mask.height as usize);
    let mut out = Vec::with_capacity(w * h * 3);

    for y in 0..h {
        let my = y * mh / h;
        for x in 0..w {
            let mx = x * mw / w;
            let m = mask.data[my * mw + mx] as f32 / 255.0;
            let factor = (1.0 - opacity) + opacity * m;
            let base = &source.data[(y * w + x) * 3..(y * w + x) * 3 + 3];
            for &channel in base {
                out.push((channel as f32 * factor).round() as u8);
            }
        }
    }

    out
}

/// Expands the Luma8 mask to RGB8 for the standalone binary-mask panel.
pub fn mask_panel_pixels(mask: &MaskResult) -> Vec<u8> {
    let mut out = Vec::with_capacity(mask.data.len() * 3);
    for &luma in &mask.data {
        out.extend_from_slice(&[luma, luma, luma]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_from(pixels: &[u8], width: u32, height: u32) -> SourceImage {
        SourceImage {
            data: pixels.to_vec(),
            width,
            height,
        }
    }

    fn mask_from(pixels: &[u8], width: u32, height: u32) -> MaskResult {
        MaskResult {
            data: pixels.to_vec(),
            width,
            height,
        }
    }

    #[test]
    fn zero_opacity_reproduces_base() {
        let source = source_from(&[10, 20, 30, 200, 150, 100], 2, 1);
        let mask = mask_from(&[0, 255], 2, 1);
        assert_eq!(compose(&source, &mask, 0.0), source.data);
    }

    #[test]
    fn full_opacity_is_a_plain_multiply() {
        let source = source_from(&[200, 100, 50], 1, 1);
        // mask value 128 → factor 128/255
        let mask = mask_from(&[128], 1, 1);
        let out = compose(&source, &mask, 1.0);
        let factor: f32 = 128.0 / 255.0;
        assert_eq!(out[0], (200.0 * factor).round() as u8);
        assert_eq!(out[1], (100.0 * factor).round() as u8);
        assert_eq!(out[2], (50.0 * factor).round() as u8);
    }

    #[test]
    fn white_mask_leaves_base_unchanged() {
        let source = source_from(&[10, 20, 30, 40, 50, 60], 2, 1);
        let mask = mask_from(&[255, 255], 2, 1);
        assert_eq!(compose(&source, &mask, 0.7), source.data);
    }

    #[test]
    fn black_mask_at_full_opacity_is_black() {
        let source = source_from(&[255, 255, 255], 1, 1);
        let mask = mask_from(&[0], 1, 1);
        assert_eq!(compose(&source, &mask, 1.0), vec![0, 0, 0]);
    }

    #[test]
    fn intermediate_opacity_interpolates() {
        let source = source_from(&[200, 200, 200], 1, 1);
        let mask = mask_from(&[0], 1, 1);
        // factor = 1 - 0.5 = 0.5 for a black mask at half opacity
        assert_eq!(compose(&source, &mask, 0.5), vec![100, 100, 100]);
    }

    #[test]
    fn opacity_outside_range_is_clamped() {
        let source = source_from(&[80, 90, 100], 1, 1);
        let mask = mask_from(&[0], 1, 1);
        assert_eq!(compose(&source, &mask, -2.0), source.data);
        assert_eq!(compose(&source, &mask, 3.0), vec![0, 0, 0]);
    }

    #[test]
    fn mask_is_scaled_to_source_dimensions() {
        // 2x2 source, 1x1 mask: every source pixel samples the one mask value.
        let source = source_from(&[100; 12], 2, 2);
        let mask = mask_from(&[0], 1, 1);
        assert_eq!(compose(&source, &mask, 1.0), vec![0; 12]);

        // 1x1 source, 2x2 mask: only the top-left mask pixel is sampled.
        let source = source_from(&[100, 100, 100], 1, 1);
        let mask = mask_from(&[255, 0, 0, 0], 2, 2);
        assert_eq!(compose(&source, &mask, 1.0), vec![100, 100, 100]);
    }

    #[test]
    fn mask_panel_expands_luma_to_rgb() {
        let mask = mask_from(&[0, 255], 2, 1);
        assert_eq!(mask_panel_pixels(&mask), vec![0, 0, 0, 255, 255, 255]);
    }
}
