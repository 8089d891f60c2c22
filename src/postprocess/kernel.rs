//! Filter kernels of the full-screen stages, plus a CPU reference that
//! evaluates one stage over an RGBA float image exactly the way the WGSL
//! does (same tap positions, same sampler rules).
//!
//! The reference exists so stage invariants (idempotent copy, energy
//! preserving blurs) are testable without a GPU.

use crate::postprocess::stage::{SamplerFilter, StageKind};

/// Gaussian weights for offsets 0..=4 texels. The kernel is symmetric:
/// offset 0 is applied once, offsets 1..=4 once on each side.
pub const GAUSSIAN_WEIGHTS: [f32; 5] =
    [0.227_027, 0.194_595, 0.121_622, 0.054_054, 0.016_216];

/// Kawase tap spread, in half-texels.
pub const KAWASE_OFFSET: f32 = 3.0;

/// Default brighten factor.
pub const DEFAULT_BRIGHTNESS: f32 = 2.0;

/// One weighted texture tap, offset in units of `half_texel * KAWASE_OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Offset from the (scaled) fragment coordinate.
    pub offset: [f32; 2],
    /// Tap weight before normalization.
    pub weight: f32,
}

const fn tap(x: f32, y: f32, weight: f32) -> Tap {
    Tap {
        offset: [x, y],
        weight,
    }
}

/// Down-sample taps: the center four times, plus the four diagonals.
pub const KAWASE_DOWN_TAPS: [Tap; 5] = [
    tap(0.0, 0.0, 4.0),
    tap(-1.0, -1.0, 1.0),
    tap(1.0, 1.0, 1.0),
    tap(1.0, -1.0, 1.0),
    tap(-1.0, 1.0, 1.0),
];

/// Up-sample taps: four axis taps at twice the spread, four diagonals
/// weighted double.
pub const KAWASE_UP_TAPS: [Tap; 8] = [
    tap(-2.0, 0.0, 1.0),
    tap(-1.0, 1.0, 2.0),
    tap(0.0, 2.0, 1.0),
    tap(1.0, 1.0, 2.0),
    tap(2.0, 0.0, 1.0),
    tap(1.0, -1.0, 2.0),
    tap(0.0, -2.0, 1.0),
    tap(-1.0, -1.0, 2.0),
];

/// Sum of weights, the divisor that makes a kernel energy preserving.
pub fn normalization(taps: &[Tap]) -> f32 {
    taps.iter().map(|t| t.weight).sum()
}

/// Half a texel of the input texture in UV units.
pub fn half_texel(size: (u32, u32)) -> [f32; 2] {
    [0.5 / size.0.max(1) as f32, 0.5 / size.1.max(1) as f32]
}

/// Linear RGBA image with texel `(0, 0)` at the top-left, matching wgpu
/// texture addressing.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Image {
    /// An image filled with one color.
    pub fn uniform(width: u32, height: u32, color: [f32; 4]) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    /// An image whose texel `(x, y)` is `f(x, y)`.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [f32; 4],
    ) -> Self {
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Image size.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Texel `(x, y)`, with coordinates clamped to the edge. An empty image
    /// reads as transparent black.
    pub fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        if self.width == 0 || self.height == 0 {
            return [0.0; 4];
        }
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }

    /// Sample at normalized `uv` with a clamp-to-edge sampler.
    pub fn sample(&self, uv: [f32; 2], filter: SamplerFilter) -> [f32; 4] {
        let fx = uv[0] * self.width as f32;
        let fy = uv[1] * self.height as f32;
        match filter {
            SamplerFilter::Nearest => {
                self.texel(fx.floor() as i64, fy.floor() as i64)
            }
            SamplerFilter::Linear => {
                let tx = fx - 0.5;
                let ty = fy - 0.5;
                let x0 = tx.floor();
                let y0 = ty.floor();
                let ax = tx - x0;
                let ay = ty - y0;
                let (x0, y0) = (x0 as i64, y0 as i64);
                let top = lerp(self.texel(x0, y0), self.texel(x0 + 1, y0), ax);
                let bottom = lerp(
                    self.texel(x0, y0 + 1),
                    self.texel(x0 + 1, y0 + 1),
                    ax,
                );
                lerp(top, bottom, ay)
            }
        }
    }

    /// Largest per-channel absolute difference to `other`.
    pub fn max_abs_diff(&self, other: &Self) -> f32 {
        self.pixels
            .iter()
            .zip(&other.pixels)
            .flat_map(|(a, b)| a.iter().zip(b).map(|(x, y)| (x - y).abs()))
            .fold(0.0, f32::max)
    }
}

fn lerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

fn add_scaled(acc: &mut [f32; 4], v: [f32; 4], w: f32) {
    for (a, x) in acc.iter_mut().zip(v) {
        *a += x * w;
    }
}

/// Evaluate `stage` over `input` into a same-sized output image.
pub fn apply_stage(stage: StageKind, input: &Image, brightness: f32) -> Image {
    let (w, h) = input.size();
    let filter = stage.filter();
    Image::from_fn(w, h, |x, y| {
        let uv = [(x as f32 + 0.5) / w as f32, (y as f32 + 0.5) / h as f32];
        match stage {
            StageKind::Copy => input.sample(uv, filter),
            StageKind::Brighten => {
                input.sample(uv, filter).map(|c| c * brightness)
            }
            StageKind::BlurHorizontal => {
                gaussian(input, uv, [1.0 / w as f32, 0.0], filter)
            }
            StageKind::BlurVertical => {
                gaussian(input, uv, [0.0, 1.0 / h as f32], filter)
            }
            StageKind::KawaseDown => kawase(
                input,
                [uv[0] * 2.0, uv[1] * 2.0],
                &KAWASE_DOWN_TAPS,
                filter,
            ),
            StageKind::KawaseUp => kawase(
                input,
                [uv[0] / 2.0, uv[1] / 2.0],
                &KAWASE_UP_TAPS,
                filter,
            ),
        }
    })
}

fn gaussian(
    input: &Image,
    uv: [f32; 2],
    step: [f32; 2],
    filter: SamplerFilter,
) -> [f32; 4] {
    let mut acc = [0.0; 4];
    add_scaled(&mut acc, input.sample(uv, filter), GAUSSIAN_WEIGHTS[0]);
    for (i, weight) in GAUSSIAN_WEIGHTS.iter().enumerate().skip(1) {
        let o = [step[0] * i as f32, step[1] * i as f32];
        add_scaled(&mut acc, input.sample([uv[0] + o[0], uv[1] + o[1]], filter), *weight);
        add_scaled(&mut acc, input.sample([uv[0] - o[0], uv[1] - o[1]], filter), *weight);
    }
    acc[3] = 1.0;
    acc
}

fn kawase(
    input: &Image,
    uv: [f32; 2],
    taps: &[Tap],
    filter: SamplerFilter,
) -> [f32; 4] {
    let ht = half_texel(input.size());
    let spread = [ht[0] * KAWASE_OFFSET, ht[1] * KAWASE_OFFSET];
    let mut acc = [0.0; 4];
    for t in taps {
        let p = [
            uv[0] + t.offset[0] * spread[0],
            uv[1] + t.offset[1] * spread[1],
        ];
        add_scaled(&mut acc, input.sample(p, filter), t.weight);
    }
    let norm = normalization(taps);
    acc.map(|c| c / norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> Image {
        Image::from_fn(w, h, |x, y| {
            [
                x as f32 / w as f32,
                y as f32 / h as f32,
                ((x * 7 + y * 13) % 11) as f32 / 11.0,
                1.0,
            ]
        })
    }

    #[test]
    fn symmetric_gaussian_weights_sum_to_one() {
        let sum = GAUSSIAN_WEIGHTS[0] + 2.0 * GAUSSIAN_WEIGHTS[1..].iter().sum::<f32>();
        assert!((sum - 1.0).abs() < 1e-5, "{sum}");
    }

    #[test]
    fn kawase_normalizations() {
        assert_eq!(normalization(&KAWASE_DOWN_TAPS), 8.0);
        assert_eq!(normalization(&KAWASE_UP_TAPS), 12.0);
    }

    #[test]
    fn empty_image_reads_transparent() {
        let empty = Image::from_fn(0, 3, |_, _| [1.0; 4]);
        assert_eq!(empty.texel(0, 0), [0.0; 4]);
        assert_eq!(empty.sample([0.5, 0.5], SamplerFilter::Linear), [0.0; 4]);
        let blurred = apply_stage(StageKind::BlurHorizontal, &empty, 1.0);
        assert_eq!(blurred.size(), (0, 3));
    }

    #[test]
    fn half_texel_is_half_of_one_texel() {
        assert_eq!(half_texel((4, 8)), [0.125, 0.0625]);
    }

    #[test]
    fn copy_twice_is_identity() {
        let img = gradient(17, 9);
        let once = apply_stage(StageKind::Copy, &img, DEFAULT_BRIGHTNESS);
        let twice = apply_stage(StageKind::Copy, &once, DEFAULT_BRIGHTNESS);
        assert_eq!(once, img);
        assert_eq!(twice, img);
    }

    #[test]
    fn brighten_scales_every_channel() {
        let img = Image::uniform(4, 4, [0.1, 0.2, 0.3, 0.5]);
        let out = apply_stage(StageKind::Brighten, &img, 2.0);
        let expected = Image::uniform(4, 4, [0.2, 0.4, 0.6, 1.0]);
        assert!(out.max_abs_diff(&expected) < 1e-6);
    }

    #[test]
    fn blurs_preserve_uniform_images() {
        let img = Image::uniform(12, 7, [0.25, 0.5, 0.75, 1.0]);
        for stage in [StageKind::BlurHorizontal, StageKind::BlurVertical] {
            let out = apply_stage(stage, &img, DEFAULT_BRIGHTNESS);
            assert!(out.max_abs_diff(&img) < 1e-5, "{stage:?}");
        }
    }

    #[test]
    fn kawase_preserves_uniform_images() {
        let img = Image::uniform(16, 16, [0.4, 0.1, 0.9, 1.0]);
        for stage in [StageKind::KawaseDown, StageKind::KawaseUp] {
            let out = apply_stage(stage, &img, DEFAULT_BRIGHTNESS);
            assert!(out.max_abs_diff(&img) < 1e-5, "{stage:?}");
        }
    }

    #[test]
    fn horizontal_blur_does_not_mix_rows() {
        // Rows of distinct constant colors stay distinct.
        let img = Image::from_fn(9, 3, |_, y| [y as f32 / 2.0, 0.0, 0.0, 1.0]);
        let out = apply_stage(StageKind::BlurHorizontal, &img, DEFAULT_BRIGHTNESS);
        assert!(out.max_abs_diff(&img) < 1e-5);
    }

    #[test]
    fn vertical_blur_spreads_a_single_row() {
        let img = Image::from_fn(3, 9, |_, y| {
            if y == 4 { [1.0, 1.0, 1.0, 1.0] } else { [0.0, 0.0, 0.0, 1.0] }
        });
        let out = apply_stage(StageKind::BlurVertical, &img, DEFAULT_BRIGHTNESS);
        assert!((out.texel(1, 4)[0] - GAUSSIAN_WEIGHTS[0]).abs() < 1e-6);
        assert!((out.texel(1, 6)[0] - GAUSSIAN_WEIGHTS[2]).abs() < 1e-6);
        // Row 0 only reaches row 4 through its outermost tap.
        assert!((out.texel(1, 0)[0] - GAUSSIAN_WEIGHTS[4]).abs() < 1e-6);
    }

    #[test]
    fn linear_sampling_at_texel_centers_is_exact() {
        let img = gradient(8, 8);
        let center = img.sample([(3.0 + 0.5) / 8.0, (5.0 + 0.5) / 8.0], SamplerFilter::Linear);
        let texel = img.texel(3, 5);
        for (a, b) in center.iter().zip(texel) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
