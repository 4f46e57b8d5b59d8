//! Noise generation module for terrain, moisture and cloud synthesis.
//!
//! Gradient noise is a pure function of position and channel seed; no global
//! random state is involved.

mod channels;
mod gradient;

pub use channels::{NoiseChannel, NoiseChannels};
pub use gradient::{gaussian_cdf, lattice_value, sample, NoiseMode, NOISE_SIGMA};
