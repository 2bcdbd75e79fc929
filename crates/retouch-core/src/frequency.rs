//! Frequency-domain analysis: 2D DFT, spectrum view, and ideal disc filters.
//!
//! The image is flattened to BT.709 grayscale, transformed with a separable
//! discrete Fourier transform (row pass then column pass, precomputed
//! twiddle tables), and either visualized as a centered log-magnitude
//! spectrum or filtered with an ideal disc mask and reconstructed.
//!
//! The disc radius is `min(width, height) / 20`: the low-pass keeps only
//! frequencies inside that disc (smoothing), the high-pass keeps only the
//! ones outside it (edge emphasis).
//!
//! All four operations replace the working image and are destructive at the
//! session level.

use crate::raster::RasterBuffer;

/// The four frequency-domain operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FrequencyOp {
    /// Centered log-magnitude spectrum as a grayscale image.
    Spectrum,
    /// Forward then inverse transform; reconstructs the grayscale image.
    Reconstruct,
    /// Ideal low-pass: zero everything outside the centered disc.
    LowPass,
    /// Ideal high-pass: zero everything inside the centered disc.
    HighPass,
}

/// Dispatch a frequency operation.
pub fn apply_frequency(src: &RasterBuffer, op: FrequencyOp) -> RasterBuffer {
    match op {
        FrequencyOp::Spectrum => spectrum(src),
        FrequencyOp::Reconstruct => reconstruct(src),
        FrequencyOp::LowPass => disc_filter(src, true),
        FrequencyOp::HighPass => disc_filter(src, false),
    }
}

/// Complex value as (re, im).
type Complex = (f64, f64);

/// Render the centered log-magnitude spectrum.
pub fn spectrum(src: &RasterBuffer) -> RasterBuffer {
    if src.is_empty() {
        return src.clone();
    }
    let (w, h) = (src.width as usize, src.height as usize);
    let mut freq = forward_dft(src);
    shift_center(&mut freq, w, h);

    // log(1 + |F|) compresses the enormous DC peak into visible range
    let magnitudes: Vec<f64> = freq
        .iter()
        .map(|&(re, im)| (1.0 + (re * re + im * im).sqrt()).ln())
        .collect();
    let max = magnitudes.iter().cloned().fold(f64::MIN, f64::max).max(1e-12);

    let gray: Vec<u8> = magnitudes
        .iter()
        .map(|&m| (m / max * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect();
    RasterBuffer::from_gray(src.width, src.height, &gray)
}

/// Forward then inverse transform; the grayscale image comes back intact
/// up to rounding.
pub fn reconstruct(src: &RasterBuffer) -> RasterBuffer {
    if src.is_empty() {
        return src.clone();
    }
    let (w, h) = (src.width as usize, src.height as usize);
    let freq = forward_dft(src);
    let spatial = inverse_dft(&freq, w, h);
    magnitude_image(&spatial, src.width, src.height)
}

/// Ideal disc filter: keep inside (low-pass) or outside (high-pass).
fn disc_filter(src: &RasterBuffer, keep_inside: bool) -> RasterBuffer {
    if src.is_empty() {
        return src.clone();
    }
    let (w, h) = (src.width as usize, src.height as usize);
    let mut freq = forward_dft(src);
    shift_center(&mut freq, w, h);

    let radius = (w.min(h) as f64) / 20.0;
    let radius_sq = radius * radius;
    let cx = (w / 2) as f64;
    let cy = (h / 2) as f64;

    for y in 0..h {
        for x in 0..w {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let inside = dx * dx + dy * dy <= radius_sq;
            if inside != keep_inside {
                freq[y * w + x] = (0.0, 0.0);
            }
        }
    }

    unshift_center(&mut freq, w, h);
    let spatial = inverse_dft(&freq, w, h);
    magnitude_image(&spatial, src.width, src.height)
}

/// Grayscale raster -> unnormalized 2D DFT.
fn forward_dft(src: &RasterBuffer) -> Vec<Complex> {
    let (w, h) = (src.width as usize, src.height as usize);
    let gray: Vec<Complex> = src.to_gray().iter().map(|&v| (v as f64, 0.0)).collect();
    dft_2d(&gray, w, h, false)
}

/// 2D inverse DFT with 1/(W*H) normalization.
fn inverse_dft(freq: &[Complex], w: usize, h: usize) -> Vec<Complex> {
    let mut out = dft_2d(freq, w, h, true);
    let norm = 1.0 / (w * h) as f64;
    for v in &mut out {
        v.0 *= norm;
        v.1 *= norm;
    }
    out
}

/// Separable 2D DFT: transform every row, then every column.
fn dft_2d(input: &[Complex], w: usize, h: usize, inverse: bool) -> Vec<Complex> {
    let mut rows: Vec<Complex> = vec![(0.0, 0.0); input.len()];
    let mut row_buf = vec![(0.0, 0.0); w];
    for y in 0..h {
        row_buf.copy_from_slice(&input[y * w..(y + 1) * w]);
        let transformed = dft_1d(&row_buf, inverse);
        rows[y * w..(y + 1) * w].copy_from_slice(&transformed);
    }

    let mut out: Vec<Complex> = vec![(0.0, 0.0); input.len()];
    let mut col_buf = vec![(0.0, 0.0); h];
    for x in 0..w {
        for y in 0..h {
            col_buf[y] = rows[y * w + x];
        }
        let transformed = dft_1d(&col_buf, inverse);
        for y in 0..h {
            out[y * w + x] = transformed[y];
        }
    }
    out
}

/// Direct 1D DFT with a precomputed twiddle table.
///
/// The table holds e^(±2πi·k/N) for one period; the product index k*n is
/// reduced mod N so every term is a table lookup.
fn dft_1d(input: &[Complex], inverse: bool) -> Vec<Complex> {
    let n = input.len();
    if n <= 1 {
        return input.to_vec();
    }

    let sign = if inverse { 1.0 } else { -1.0 };
    let step = sign * 2.0 * std::f64::consts::PI / n as f64;
    let twiddle: Vec<Complex> = (0..n)
        .map(|k| {
            let angle = step * k as f64;
            (angle.cos(), angle.sin())
        })
        .collect();

    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        let mut re = 0.0;
        let mut im = 0.0;
        for (idx, &(vr, vi)) in input.iter().enumerate() {
            let (tr, ti) = twiddle[(k * idx) % n];
            re += vr * tr - vi * ti;
            im += vr * ti + vi * tr;
        }
        out.push((re, im));
    }
    out
}

/// Move the zero-frequency bin to the center (quadrant swap).
fn shift_center(freq: &mut [Complex], w: usize, h: usize) {
    roll(freq, w, h, w / 2, h / 2);
}

/// Undo [`shift_center`], including odd dimensions.
fn unshift_center(freq: &mut [Complex], w: usize, h: usize) {
    roll(freq, w, h, w - w / 2, h - h / 2);
}

/// Circularly roll the grid right by `dx` and down by `dy`.
fn roll(data: &mut [Complex], w: usize, h: usize, dx: usize, dy: usize) {
    let src = data.to_vec();
    for y in 0..h {
        let ny = (y + dy) % h;
        for x in 0..w {
            let nx = (x + dx) % w;
            data[ny * w + nx] = src[y * w + x];
        }
    }
}

/// Collapse complex values to clamped magnitudes in a gray raster.
fn magnitude_image(values: &[Complex], width: u32, height: u32) -> RasterBuffer {
    let gray: Vec<u8> = values
        .iter()
        .map(|&(re, im)| (re * re + im * im).sqrt().round().clamp(0.0, 255.0) as u8)
        .collect();
    RasterBuffer::from_gray(width, height, &gray)
}
