//! Rotation axis definition and rigid mesh rotations.
//!
//! Bodies are generated with their pole along +Y. [`align_to_axis`] tilts the
//! pole once by the configured elevation (about X) and azimuth (about Z).
//! Per-frame updates then either spin about the tilted pole ([`spin`]) or
//! about the world Y axis only ([`planar_spin`]).

use glam::{Mat3, Vec3};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Mesh;

/// Errors raised when defining a rotation axis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AxisError {
    #[error("Spin direction must be -1 or +1 (got {0})")]
    InvalidSpin(i8),
    #[error("Axis elevation {0} is outside [-90, 90] degrees")]
    ElevationOutOfRange(f32),
    #[error("Axis azimuth {0} is outside [-180, 180] degrees")]
    AzimuthOutOfRange(f32),
}

/// Orientation of a body's rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDefinition {
    /// Spin direction, `-1` or `+1`.
    pub spin: i8,
    /// Tilt of the pole about the X axis, in degrees.
    pub elevation_deg: f32,
    /// Rotation of the tilted pole about the Z (view) axis, in degrees.
    pub azimuth_deg: f32,
}

impl Default for AxisDefinition {
    fn default() -> Self {
        Self {
            spin: 1,
            elevation_deg: 0.0,
            azimuth_deg: 0.0,
        }
    }
}

impl AxisDefinition {
    /// Creates a validated axis.
    pub fn new(spin: i8, elevation_deg: f32, azimuth_deg: f32) -> Result<Self, AxisError> {
        let axis = Self {
            spin,
            elevation_deg,
            azimuth_deg,
        };
        axis.validate()?;
        Ok(axis)
    }

    /// Draws a random spin direction, elevation and azimuth.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let spin = if rng.random::<bool>() { 1 } else { -1 };
        Self {
            spin,
            elevation_deg: rng.random_range(-90.0..=90.0),
            azimuth_deg: rng.random_range(-180.0..=180.0),
        }
    }

    pub fn validate(&self) -> Result<(), AxisError> {
        if self.spin != 1 && self.spin != -1 {
            return Err(AxisError::InvalidSpin(self.spin));
        }
        if !(-90.0..=90.0).contains(&self.elevation_deg) {
            return Err(AxisError::ElevationOutOfRange(self.elevation_deg));
        }
        if !(-180.0..=180.0).contains(&self.azimuth_deg) {
            return Err(AxisError::AzimuthOutOfRange(self.azimuth_deg));
        }
        Ok(())
    }

    /// `Rz(azimuth) · Rx(elevation)`, taking the body frame to the world frame.
    pub fn alignment(&self) -> Mat3 {
        Mat3::from_rotation_z(self.azimuth_deg.to_radians())
            * Mat3::from_rotation_x(self.elevation_deg.to_radians())
    }

    /// Unit pole direction once aligned.
    pub fn pole(&self) -> Vec3 {
        self.alignment() * Vec3::Y
    }

    /// Rotation by `degrees · spin` about the tilted pole.
    ///
    /// Composed as un-rotate azimuth, un-rotate elevation, rotate about Y,
    /// re-rotate elevation, re-rotate azimuth.
    pub fn spin_matrix(&self, degrees: f32) -> Mat3 {
        let az = self.azimuth_deg.to_radians();
        let el = self.elevation_deg.to_radians();
        Mat3::from_rotation_z(az)
            * Mat3::from_rotation_x(el)
            * Mat3::from_rotation_y(self.signed(degrees))
            * Mat3::from_rotation_x(-el)
            * Mat3::from_rotation_z(-az)
    }

    /// Rotation by `degrees · spin` about the world Y axis, ignoring tilt.
    pub fn planar_spin_matrix(&self, degrees: f32) -> Mat3 {
        Mat3::from_rotation_y(self.signed(degrees))
    }

    fn signed(&self, degrees: f32) -> f32 {
        (degrees * self.spin as f32).to_radians()
    }
}

/// Which per-frame rotation an animation applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpinMode {
    /// About the tilted pole.
    #[default]
    Axial,
    /// About the world Y axis only.
    Planar,
}

impl SpinMode {
    pub fn apply(self, mesh: &mut Mesh, axis: &AxisDefinition, degrees: f32) {
        match self {
            SpinMode::Axial => spin(mesh, axis, degrees),
            SpinMode::Planar => planar_spin(mesh, axis, degrees),
        }
    }
}

/// Tilts a freshly generated mesh so its pole matches the axis.
pub fn align_to_axis(mesh: &mut Mesh, axis: &AxisDefinition) {
    rotate(mesh, axis.alignment());
}

/// Spins an aligned mesh about its tilted pole.
pub fn spin(mesh: &mut Mesh, axis: &AxisDefinition, degrees: f32) {
    rotate(mesh, axis.spin_matrix(degrees));
}

/// Spins a mesh about the world Y axis.
pub fn planar_spin(mesh: &mut Mesh, axis: &AxisDefinition, degrees: f32) {
    rotate(mesh, axis.planar_spin_matrix(degrees));
}

fn rotate(mesh: &mut Mesh, m: Mat3) {
    mesh.vertices_mut().par_iter_mut().for_each(|v| *v = m * *v);
}
