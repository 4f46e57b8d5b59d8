//! Seeded 3D gradient (Perlin-style) noise on an implicit integer lattice.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Empirical standard deviation of the interpolated lattice value.
pub const NOISE_SIGMA: f32 = 0.2;

/// How the interpolated lattice value is mapped onto `[0, amplitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseMode {
    /// Linear map `amplitude · 0.5 · (value + 1)`.
    Raw,
    /// Approximate Gaussian CDF of `value / σ`, giving a flatter output
    /// distribution across `[0, amplitude]`.
    Normalized,
}

/// Samples gradient noise at `point`.
///
/// The point is divided by `period` before lattice lookup, so `period` is the
/// wavelength of the noise in world units. The same arguments always return
/// the same value; gradients are derived from `seed` and the lattice corner
/// alone.
///
/// # Arguments
/// * `point` - World-space sample position
/// * `period` - Lattice spacing in world units (must be positive)
/// * `amplitude` - Upper bound of the output range
/// * `seed` - Channel seed
/// * `mode` - Output mapping
pub fn sample(point: Vec3, period: f32, amplitude: f32, seed: u64, mode: NoiseMode) -> f32 {
    let value = lattice_value(point / period, seed);
    match mode {
        NoiseMode::Raw => amplitude * 0.5 * (value + 1.0),
        NoiseMode::Normalized => amplitude * gaussian_cdf(value / NOISE_SIGMA),
    }
}

/// Interpolated gradient noise at a lattice-space position, roughly in `[-1, 1]`.
///
/// Zero at every integer lattice point.
pub fn lattice_value(p: Vec3, seed: u64) -> f32 {
    let cell = p.floor();
    let frac = p - cell;
    let (x0, y0, z0) = (cell.x as i64, cell.y as i64, cell.z as i64);

    let sx = fade(frac.x);
    let sy = fade(frac.y);
    let sz = fade(frac.z);

    let corner = |dx: i64, dy: i64, dz: i64| -> f32 {
        let gradient = lattice_gradient(x0 + dx, y0 + dy, z0 + dz, seed);
        let offset = frac - Vec3::new(dx as f32, dy as f32, dz as f32);
        gradient.dot(offset)
    };

    let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), sx);
    let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), sx);
    let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), sx);
    let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), sx);

    let y0 = lerp(x00, x10, sy);
    let y1 = lerp(x01, x11, sy);

    lerp(y0, y1, sz)
}

/// Logistic-tanh approximation of the standard normal CDF.
pub fn gaussian_cdf(z: f32) -> f32 {
    let inner = 179.0 * z / 23.0 - (111.0 / 2.0) * (37.0 * z / 294.0).atan();
    0.5 * inner.tanh() + 0.5
}

/// Pseudo-random unit gradient for a lattice corner.
///
/// A fresh generator is seeded from the corner and channel seed on every
/// call, then a point is drawn uniformly on the unit sphere by inverse
/// transform (`θ ∈ [0, 2π)`, `z ∈ [-1, 1]`).
fn lattice_gradient(ix: i64, iy: i64, iz: i64, seed: u64) -> Vec3 {
    let mut rng = ChaCha8Rng::seed_from_u64(lattice_seed(ix, iy, iz, seed));
    let theta = TAU * rng.random::<f32>();
    let z = 2.0 * rng.random::<f32>() - 1.0;
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

fn lattice_seed(ix: i64, iy: i64, iz: i64, seed: u64) -> u64 {
    let mut h = mix64(seed ^ 0x9e37_79b9_7f4a_7c15);
    h = mix64(h ^ ix as u64);
    h = mix64(h ^ (iy as u64).rotate_left(21));
    mix64(h ^ (iz as u64).rotate_left(42))
}

// splitmix64 finalizer
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}
