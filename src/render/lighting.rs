//! Flat per-face shading with optional atmospheric fog.

use glam::Vec3;

use crate::biomes::Rgba;
use super::RenderError;

/// Share of the base colour always present.
pub const AMBIENT_WEIGHT: f32 = 0.35;
/// Share of the base colour scaled by the light angle.
pub const DIFFUSE_WEIGHT: f32 = 0.65;
/// Diffuse reflection coefficient.
pub const DIFFUSE_COEFFICIENT: f32 = 1.0;

/// A single directional light, stored as a unit vector pointing toward the light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    direction: Vec3,
}

impl Light {
    pub fn new(direction: Vec3) -> Result<Self, RenderError> {
        if !direction.is_finite() {
            return Err(RenderError::NonFiniteLight(direction.to_array()));
        }
        let direction = direction.try_normalize().ok_or(RenderError::ZeroLight)?;
        Ok(Self { direction })
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }
}

impl Default for Light {
    /// Upper left, in front of the viewer.
    fn default() -> Self {
        Self {
            direction: Vec3::new(-1.0, -1.0, 1.5).normalize(),
        }
    }
}

/// Fog parameters for one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub strength: f32,
    pub color: Rgba,
    /// Depth at which the fog is clear, normally the body radius.
    pub reference_height: f32,
}

impl Fog {
    /// Share of the lit colour kept at depth `z`: `exp(-((h - z) / h) · strength)`.
    pub fn factor(&self, z: f32) -> f32 {
        if self.reference_height <= 0.0 {
            return 1.0;
        }
        let depth = (self.reference_height - z) / self.reference_height;
        (-depth * self.strength).exp().clamp(0.0, 1.0)
    }
}

/// Outward unit normal of a triangle on a body centred at the origin.
///
/// Returns `None` for degenerate triangles.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    let n = (b - a).cross(c - a).try_normalize()?;
    if (a + n).length_squared() < a.length_squared() {
        Some(-n)
    } else {
        Some(n)
    }
}

/// Lit and fogged colour of a face.
///
/// `avg_z` is the face centroid depth in body coordinates. Alpha is always 255.
pub fn shade(base: Rgba, normal: Option<Vec3>, light: &Light, fog: Option<&Fog>, avg_z: f32) -> Rgba {
    let diffuse = normal.map_or(0.0, |n| DIFFUSE_COEFFICIENT * n.dot(light.direction).max(0.0));
    let intensity = AMBIENT_WEIGHT + DIFFUSE_WEIGHT * diffuse;

    let mut rgb = [0.0f32; 3];
    for (out, &channel) in rgb.iter_mut().zip(&base[..3]) {
        *out = channel as f32 * intensity;
    }

    if let Some(fog) = fog {
        let keep = fog.factor(avg_z);
        for (out, &channel) in rgb.iter_mut().zip(&fog.color[..3]) {
            *out = *out * keep + channel as f32 * (1.0 - keep);
        }
    }

    let [r, g, b] = rgb.map(|v| v.round().clamp(0.0, 255.0) as u8);
    [r, g, b, 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: Rgba = [200, 100, 60, 128];

    #[test]
    fn test_light_validation() {
        assert_eq!(Light::new(Vec3::ZERO), Err(RenderError::ZeroLight));
        assert!(matches!(
            Light::new(Vec3::new(f32::NAN, 0.0, 1.0)),
            Err(RenderError::NonFiniteLight(_))
        ));
        let light = Light::new(Vec3::new(0.0, 0.0, 5.0)).unwrap();
        assert!((light.direction() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_normal_points_outward() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = Vec3::new(0.0, 0.0, 1.0);
        let expected = Vec3::ONE.normalize();
        assert!((face_normal(a, b, c).unwrap() - expected).length() < 1e-6);
        assert!((face_normal(a, c, b).unwrap() - expected).length() < 1e-6);
        assert!(face_normal(a, a, b).is_none());
    }

    #[test]
    fn test_full_light_and_shadow() {
        let light = Light::new(Vec3::Z).unwrap();
        let lit = shade(GREY, Some(Vec3::Z), &light, None, 0.0);
        assert_eq!(lit, [200, 100, 60, 255]);

        let dark = shade(GREY, Some(-Vec3::Z), &light, None, 0.0);
        assert_eq!(dark, [70, 35, 21, 255]);

        let degenerate = shade(GREY, None, &light, None, 0.0);
        assert_eq!(degenerate, dark);
    }

    #[test]
    fn test_fog_blends_toward_color() {
        let light = Light::new(Vec3::Z).unwrap();
        let fog = Fog {
            strength: 2.0,
            color: [255, 255, 255, 255],
            reference_height: 10.0,
        };
        assert!((fog.factor(10.0) - 1.0).abs() < 1e-6);
        assert!((fog.factor(0.0) - (-2.0f32).exp()).abs() < 1e-6);
        assert_eq!(fog.factor(12.0), 1.0);

        let clear = shade(GREY, Some(Vec3::Z), &light, Some(&fog), 10.0);
        let limb = shade(GREY, Some(Vec3::Z), &light, Some(&fog), 0.0);
        assert_eq!(clear, [200, 100, 60, 255]);
        assert!(limb[0] > clear[0] && limb[1] > clear[1] && limb[2] > clear[2]);
        assert_eq!(limb[3], 255);
    }

    #[test]
    fn test_zero_strength_fog_is_clear() {
        let light = Light::default();
        let fog = Fog {
            strength: 0.0,
            color: [255, 255, 255, 255],
            reference_height: 5.0,
        };
        let n = Some(Vec3::new(0.0, 0.6, 0.8));
        assert_eq!(shade(GREY, n, &light, Some(&fog), -3.0), shade(GREY, n, &light, None, -3.0));
    }
}
