//! BGR <-> HSV conversion for 8-bit images.
//!
//! Uses the 8-bit HSV convention common in vision tooling: hue lives in
//! `[0, 180)` (degrees halved so it fits a byte), saturation and value in
//! `[0, 255]`. The HSV side is kept in `f32` so a conversion round trip
//! without any adjustment returns the original pixels.

use crate::sample::Image;
use ndarray::{Array3, Axis, Zip};

/// Period of the hue channel.
pub const HUE_PERIOD: f32 = 180.0;

/// Converts a `[H, W, 3]` BGR image to floating-point HSV.
pub fn bgr_to_hsv(image: &Image) -> Array3<f32> {
    let mut hsv = Array3::<f32>::zeros(image.raw_dim());
    Zip::from(hsv.lanes_mut(Axis(2)))
        .and(image.lanes(Axis(2)))
        .for_each(|mut out, px| {
            let (h, s, v) = pixel_to_hsv(px[0] as f32, px[1] as f32, px[2] as f32);
            out[0] = h;
            out[1] = s;
            out[2] = v;
        });
    hsv
}

/// Converts floating-point HSV back to an 8-bit BGR image, rounding and
/// clamping every channel into `[0, 255]`.
pub fn hsv_to_bgr(hsv: &Array3<f32>) -> Image {
    let mut image = Image::zeros(hsv.raw_dim());
    Zip::from(image.lanes_mut(Axis(2)))
        .and(hsv.lanes(Axis(2)))
        .for_each(|mut out, px| {
            let (b, g, r) = pixel_to_bgr(px[0], px[1], px[2]);
            out[0] = to_u8(b);
            out[1] = to_u8(g);
            out[2] = to_u8(r);
        });
    image
}

fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn pixel_to_hsv(b: f32, g: f32, r: f32) -> (f32, f32, f32) {
    let v = b.max(g).max(r);
    let min = b.min(g).min(r);
    let diff = v - min;

    let s = if v > 0.0 { diff / v * 255.0 } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    (h / 2.0, s, v)
}

fn pixel_to_bgr(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let degrees = (h * 2.0).rem_euclid(360.0);
    let chroma = v * (s / 255.0);
    let sector = degrees / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = v - chroma;

    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    (b + m, g + m, r + m)
}
