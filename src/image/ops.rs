//! Blur and resize used to normalize frames before subtraction.
//!
//! Design
//! - Separable Gaussian with a configurable odd kernel size; weights are
//!   sampled from a Gaussian with sigma derived from the kernel size
//!   (`0.3 * ((k - 1) * 0.5 - 1) + 0.8`), the usual auto-sigma convention
//!   when only a kernel size is configured.
//! - Boundary handling uses clamping (replicate border).
//! - Resize is plain bilinear; the scale factor comes from configuration
//!   and is applied before blurring.
use crate::image::ImageF32;

/// Separable Gaussian blur with an odd kernel size (`ksize >= 1`).
///
/// `ksize == 1` is a no-op copy.
pub fn gaussian_blur(inp: &ImageF32, ksize: usize) -> ImageF32 {
    let ksize = ksize | 1; // force odd
    if ksize <= 1 {
        return inp.clone();
    }
    let kernel = gaussian_kernel(ksize);
    let r = ksize / 2;
    let (w, h) = (inp.w, inp.h);

    let mut tmp = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (i, &k) in kernel.iter().enumerate() {
                let xi = (x + i).saturating_sub(r).min(w - 1);
                acc += k * inp.get(xi, y);
            }
            tmp.set(x, y, acc);
        }
    }
    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (i, &k) in kernel.iter().enumerate() {
                let yi = (y + i).saturating_sub(r).min(h - 1);
                acc += k * tmp.get(x, yi);
            }
            out.set(x, y, acc);
        }
    }
    out
}

fn gaussian_kernel(ksize: usize) -> Vec<f32> {
    let sigma = 0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let r = (ksize / 2) as i32;
    let mut k: Vec<f32> = (-r..=r)
        .map(|i| (-(i * i) as f32 / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = k.iter().sum();
    for v in &mut k {
        *v /= sum;
    }
    k
}

/// Bilinear resize by a uniform scale factor.
///
/// `scale == 1.0` returns a copy; output dimensions round down but stay
/// at least 1 pixel.
pub fn resize(inp: &ImageF32, scale: f32) -> ImageF32 {
    if (scale - 1.0).abs() < f32::EPSILON {
        return inp.clone();
    }
    let nw = ((inp.w as f32 * scale) as usize).max(1);
    let nh = ((inp.h as f32 * scale) as usize).max(1);
    let mut out = ImageF32::new(nw, nh);
    let sx = inp.w as f32 / nw as f32;
    let sy = inp.h as f32 / nh as f32;
    for y in 0..nh {
        let fy = (y as f32 + 0.5) * sy - 0.5;
        let y0 = fy.floor().max(0.0) as usize;
        let y1 = (y0 + 1).min(inp.h - 1);
        let ty = (fy - y0 as f32).clamp(0.0, 1.0);
        for x in 0..nw {
            let fx = (x as f32 + 0.5) * sx - 0.5;
            let x0 = fx.floor().max(0.0) as usize;
            let x1 = (x0 + 1).min(inp.w - 1);
            let tx = (fx - x0 as f32).clamp(0.0, 1.0);
            let top = inp.get(x0, y0) * (1.0 - tx) + inp.get(x1, y0) * tx;
            let bot = inp.get(x0, y1) * (1.0 - tx) + inp.get(x1, y1) * tx;
            out.set(x, y, top * (1.0 - ty) + bot * ty);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_preserves_constant_image() {
        let mut img = ImageF32::new(16, 16);
        for v in img.data.iter_mut() {
            *v = 0.5;
        }
        let blurred = gaussian_blur(&img, 11);
        for &v in &blurred.data {
            assert!((v - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn blur_kernel_one_is_identity() {
        let mut img = ImageF32::new(4, 4);
        img.set(2, 2, 1.0);
        let out = gaussian_blur(&img, 1);
        assert_eq!(out.data, img.data);
    }

    #[test]
    fn resize_halves_dimensions() {
        let img = ImageF32::new(64, 48);
        let out = resize(&img, 0.5);
        assert_eq!((out.w, out.h), (32, 24));
    }

    #[test]
    fn resize_unity_is_copy() {
        let mut img = ImageF32::new(8, 8);
        img.set(3, 3, 0.7);
        let out = resize(&img, 1.0);
        assert_eq!(out.data, img.data);
    }
}
