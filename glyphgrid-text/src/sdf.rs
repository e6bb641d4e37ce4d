//! Alpha coverage → 8-bit signed distance field.
//!
//! Two squared-distance grids are computed with a separable 1D Euclidean
//! distance transform (Felzenszwalb & Huttenlocher): one measuring the
//! distance to ink from outside the glyph, one measuring the distance to
//! empty space from inside. Anti-aliased edge pixels seed both grids with a
//! sub-pixel offset so edges stay smooth.
//!
//! The output value for signed distance `d` (pixels, positive outside) is
//! `255 - 255 * (d / radius + cutoff)`, so the glyph edge sits at
//! `255 * (1 - cutoff)`.

use crate::config::SdfParams;

const INF: f64 = 1e20;

/// A distance field with `params.buffer` pixels of padding on every side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Convert `coverage` (`width × height`, 0 = empty, 255 = full ink) into a
/// padded distance field.
///
/// Missing coverage bytes are treated as empty.
pub fn distance_field(coverage: &[u8], width: u32, height: u32, params: &SdfParams) -> DistanceField {
    let pad = params.buffer as usize;
    let w = width as usize;
    let h = height as usize;
    let out_w = w + 2 * pad;
    let out_h = h + 2 * pad;
    let len = out_w * out_h;

    let mut outer = vec![INF; len];
    let mut inner = vec![0.0f64; len];

    for y in 0..h {
        for x in 0..w {
            let a = coverage.get(y * w + x).copied().unwrap_or(0);
            if a == 0 {
                continue;
            }
            let j = (y + pad) * out_w + x + pad;
            if a == 255 {
                outer[j] = 0.0;
                inner[j] = INF;
            } else {
                let d = 0.5 - f64::from(a) / 255.0;
                outer[j] = if d > 0.0 { d * d } else { 0.0 };
                inner[j] = if d < 0.0 { d * d } else { 0.0 };
            }
        }
    }

    let mut scratch = Scratch::new(out_w.max(out_h));
    edt(&mut outer, 0, 0, out_w, out_h, out_w, &mut scratch);
    edt(&mut inner, pad, pad, w, h, out_w, &mut scratch);

    let radius = f64::from(params.radius);
    let cutoff = f64::from(params.cutoff);
    let data = outer
        .iter()
        .zip(&inner)
        .map(|(o, i)| {
            let d = o.sqrt() - i.sqrt();
            (255.0 - 255.0 * (d / radius + cutoff)).round().clamp(0.0, 255.0) as u8
        })
        .collect();

    DistanceField {
        width: out_w as u32,
        height: out_h as u32,
        data,
    }
}

/// Reusable buffers for the 1D transform.
struct Scratch {
    f: Vec<f64>,
    v: Vec<usize>,
    z: Vec<f64>,
}

impl Scratch {
    fn new(n: usize) -> Self {
        Self {
            f: vec![0.0; n],
            v: vec![0; n],
            z: vec![0.0; n + 1],
        }
    }
}

/// 2D transform over the `width × height` window at `(x0, y0)` of a grid
/// with row stride `stride`: columns first, then rows.
fn edt(
    grid: &mut [f64],
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
    stride: usize,
    s: &mut Scratch,
) {
    for x in x0..x0 + width {
        edt_1d(grid, y0 * stride + x, stride, height, s);
    }
    for y in y0..y0 + height {
        edt_1d(grid, y * stride + x0, 1, width, s);
    }
}

/// Lower envelope of parabolas rooted at each sample.
fn edt_1d(grid: &mut [f64], offset: usize, step: usize, length: usize, s: &mut Scratch) {
    if length == 0 {
        return;
    }
    let Scratch { f, v, z } = s;

    v[0] = 0;
    z[0] = -INF;
    z[1] = INF;
    f[0] = grid[offset];

    let mut k = 0usize;
    for q in 1..length {
        f[q] = grid[offset + q * step];
        let q2 = (q * q) as f64;
        let mut sep;
        loop {
            let r = v[k];
            sep = (f[q] - f[r] + q2 - (r * r) as f64) / (q - r) as f64 / 2.0;
            if sep <= z[k] && k > 0 {
                k -= 1;
            } else {
                break;
            }
        }
        k += 1;
        v[k] = q;
        z[k] = sep;
        z[k + 1] = INF;
    }

    let mut k = 0usize;
    for q in 0..length {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let r = v[k];
        let qr = q.abs_diff(r) as f64;
        grid[offset + q * step] = f[r] + qr * qr;
    }
}
