//! Painter's-algorithm rasterizer.
//!
//! Every base face and cloud face of every body goes into one draw list,
//! is shaded, then sorted by centroid depth (farthest first) and filled in
//! that order. Projection is orthographic: `(x, y, z)` lands on
//! `(x + offset.x, y + offset.y)` and `z` only orders the paint.

use glam::{Vec2, Vec3};
use image::RgbaImage;
use rayon::prelude::*;
use tracing::trace;

use crate::biomes::Rgba;
use crate::body::Body;
use crate::geometry::{face_positions, Face, Mesh};
use crate::terrain::CloudLayer;
use super::lighting::{face_normal, shade, Fog, Light};
use super::RenderError;

/// Output frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyCanvas(width, height));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Screen position of the canvas centre.
    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

/// One body's geometry as seen by the rasterizer.
#[derive(Debug, Clone, Copy)]
pub struct DrawSource<'a> {
    pub mesh: &'a Mesh,
    pub clouds: Option<&'a CloudLayer>,
    /// Screen-space translation of the body centre.
    pub offset: Vec2,
    pub fog: Option<Fog>,
}

impl<'a> DrawSource<'a> {
    /// Bare mesh without clouds or fog.
    pub fn mesh(mesh: &'a Mesh, offset: Vec2) -> Self {
        Self {
            mesh,
            clouds: None,
            offset,
            fog: None,
        }
    }

    /// Body with its clouds and, when enabled, its atmosphere.
    pub fn body(body: &'a Body, offset: Vec2) -> Self {
        let atmosphere = body.atmosphere();
        let fog = atmosphere.is_enabled().then(|| Fog {
            strength: atmosphere.strength,
            color: atmosphere.color,
            reference_height: body.radius(),
        });
        Self {
            mesh: body.mesh(),
            clouds: body.clouds(),
            offset,
            fog,
        }
    }
}

/// A shaded, projected triangle waiting to be painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawFace {
    /// Centroid depth; larger is nearer the viewer.
    pub depth: f32,
    pub points: [Vec2; 3],
    pub color: Rgba,
}

/// Builds the depth-sorted draw list for a frame.
///
/// The sort is stable, so faces at equal depth keep their list order.
///
/// # Arguments
/// * `sources` - Bodies to draw, in scene order
/// * `light` - Light shared by every body
///
/// # Returns
/// Shaded faces ordered farthest first
pub fn build_draw_list(sources: &[DrawSource], light: &Light) -> Vec<DrawFace> {
    let mut list = Vec::new();
    for source in sources {
        let vertices = source.mesh.vertices();
        let fog = source.fog.as_ref();

        // Shading is per face and independent, so it runs in parallel;
        // par_extend keeps the input order
        let base = source.mesh.faces().par_iter().map(|face| {
            let positions = face_positions(vertices, face);
            draw_face(positions, face.color, source.offset, light, fog)
        });
        list.par_extend(base);

        // Cloud faces reuse base vertices pushed out to the shell radius
        if let Some(layer) = source.clouds {
            let clouds = layer.faces.par_iter().map(|face| {
                let positions = cloud_positions(vertices, face, layer.radius);
                draw_face(positions, face.color, source.offset, light, fog)
            });
            list.par_extend(clouds);
        }
    }

    // Farthest first; stable for equal depths
    list.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    list
}

/// Renders one frame.
///
/// # Arguments
/// * `sources` - Bodies to draw with their screen offsets
/// * `light` - Light shared by every body
/// * `canvas` - Frame size in pixels
/// * `background` - Colour of every pixel no face covers
pub fn render_frame(sources: &[DrawSource], light: &Light, canvas: Canvas, background: Rgba) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(canvas.width, canvas.height, image::Rgba(background));
    let list = build_draw_list(sources, light);
    for face in &list {
        fill_triangle(&mut image, face.points, face.color);
    }
    trace!(faces = list.len(), "frame rendered");
    image
}

/// Fills every pixel whose centre lies inside or on the triangle.
///
/// Works for either winding; degenerate triangles draw nothing.
///
/// # Arguments
/// * `image` - Frame to paint into
/// * `points` - Triangle corners in pixel coordinates
/// * `color` - Fill colour, written as-is
pub fn fill_triangle(image: &mut RgbaImage, points: [Vec2; 3], color: Rgba) {
    let [a, b, c] = points;

    // Twice the signed area; its sign gives the winding
    let area = edge(a, b, c);
    if area == 0.0 || !area.is_finite() {
        return;
    }

    // Reject triangles entirely off screen, then clip the bounding box
    let (width, height) = (image.width() as f32, image.height() as f32);
    let min = a.min(b).min(c);
    let max = a.max(b).max(c);
    if max.x < 0.0 || max.y < 0.0 || min.x >= width || min.y >= height {
        return;
    }

    let x0 = min.x.floor().max(0.0) as u32;
    let y0 = min.y.floor().max(0.0) as u32;
    let x1 = max.x.ceil().min(width - 1.0) as u32;
    let y1 = max.y.ceil().min(height - 1.0) as u32;

    // Half-space test at pixel centres; multiplying by the sign folds both windings into one check
    let pixel = image::Rgba(color);
    let sign = area.signum();
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(b, c, p) * sign;
            let w1 = edge(c, a, p) * sign;
            let w2 = edge(a, b, p) * sign;
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                image.put_pixel(x, y, pixel);
            }
        }
    }
}

fn draw_face(positions: [Vec3; 3], color: Rgba, offset: Vec2, light: &Light, fog: Option<&Fog>) -> DrawFace {
    let [a, b, c] = positions;
    let depth = (a.z + b.z + c.z) / 3.0;
    DrawFace {
        depth,
        points: positions.map(|p| Vec2::new(p.x, p.y) + offset),
        color: shade(color, face_normal(a, b, c), light, fog, depth),
    }
}

fn cloud_positions(vertices: &[Vec3], face: &Face, radius: f32) -> [Vec3; 3] {
    face_positions(vertices, face).map(|v| v.normalize_or_zero() * radius)
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyConfig;

    const BLACK: Rgba = [0, 0, 0, 255];

    fn flat_triangle(z: f32) -> [Vec3; 3] {
        [
            Vec3::new(-10.0, -10.0, z),
            Vec3::new(10.0, -10.0, z),
            Vec3::new(0.0, 10.0, z),
        ]
    }

    /// Stacked flat triangles facing the viewer, listed front to back.
    fn stacked_mesh(layers: &[(f32, Rgba)]) -> Mesh {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for (i, &(z, color)) in layers.iter().enumerate() {
            vertices.extend(flat_triangle(z));
            let base = 3 * i as u32;
            faces.push(Face::with_color([base, base + 1, base + 2], color));
        }
        Mesh::from_parts(1.0, vertices, faces).unwrap()
    }

    fn pixel(image: &RgbaImage, x: u32, y: u32) -> Rgba {
        image.get_pixel(x, y).0
    }

    #[test]
    fn test_canvas_validation() {
        assert_eq!(Canvas::new(0, 10), Err(RenderError::EmptyCanvas(0, 10)));
        let canvas = Canvas::new(64, 32).unwrap();
        assert_eq!(canvas.centre(), Vec2::new(32.0, 16.0));
    }

    #[test]
    fn test_fill_both_windings() {
        let tri = [Vec2::new(2.0, 2.0), Vec2::new(12.0, 2.0), Vec2::new(2.0, 12.0)];
        for points in [tri, [tri[0], tri[2], tri[1]]] {
            let mut image = RgbaImage::from_pixel(16, 16, image::Rgba(BLACK));
            fill_triangle(&mut image, points, [255, 0, 0, 255]);
            assert_eq!(pixel(&image, 4, 4), [255, 0, 0, 255]);
            assert_eq!(pixel(&image, 11, 11), BLACK);
            assert_eq!(pixel(&image, 0, 0), BLACK);
        }
    }

    #[test]
    fn test_fill_clips_to_image() {
        let mut image = RgbaImage::from_pixel(8, 8, image::Rgba(BLACK));
        let points = [Vec2::new(-50.0, -50.0), Vec2::new(50.0, -50.0), Vec2::new(0.0, 50.0)];
        fill_triangle(&mut image, points, [9, 9, 9, 255]);
        assert_eq!(pixel(&image, 4, 4), [9, 9, 9, 255]);

        let off = [Vec2::new(-50.0, -50.0), Vec2::new(-40.0, -50.0), Vec2::new(-45.0, -40.0)];
        let mut untouched = RgbaImage::from_pixel(8, 8, image::Rgba(BLACK));
        fill_triangle(&mut untouched, off, [9, 9, 9, 255]);
        assert!(untouched.pixels().all(|p| p.0 == BLACK));
    }

    #[test]
    fn test_degenerate_triangle_draws_nothing() {
        let mut image = RgbaImage::from_pixel(8, 8, image::Rgba(BLACK));
        let line = [Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0), Vec2::new(8.0, 8.0)];
        fill_triangle(&mut image, line, [9, 9, 9, 255]);
        assert!(image.pixels().all(|p| p.0 == BLACK));
    }

    #[test]
    fn test_nearest_face_wins() {
        let red = [200, 0, 0, 255];
        let green = [0, 200, 0, 255];
        let blue = [0, 0, 200, 255];
        // Nearest first, so list order alone would paint it over.
        let mesh = stacked_mesh(&[(1.0, red), (0.0, green), (-1.0, blue)]);
        let light = Light::new(Vec3::Z).unwrap();
        let canvas = Canvas::new(64, 64).unwrap();

        let frame = render_frame(&[DrawSource::mesh(&mesh, canvas.centre())], &light, canvas, BLACK);
        assert_eq!(pixel(&frame, 32, 32), red);
        assert_eq!(pixel(&frame, 0, 0), BLACK);

        let list = build_draw_list(&[DrawSource::mesh(&mesh, canvas.centre())], &light);
        let depths: Vec<f32> = list.iter().map(|f| f.depth).collect();
        assert_eq!(depths, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_equal_depth_keeps_list_order() {
        let first = [10, 20, 30, 255];
        let second = [40, 50, 60, 255];
        let mesh = stacked_mesh(&[(2.0, first), (2.0, second)]);
        let light = Light::new(Vec3::Z).unwrap();
        let canvas = Canvas::new(32, 32).unwrap();

        let frame = render_frame(&[DrawSource::mesh(&mesh, canvas.centre())], &light, canvas, BLACK);
        assert_eq!(pixel(&frame, 16, 16), second);
    }

    #[test]
    fn test_bodies_share_one_sort() {
        let light = Light::new(Vec3::Z).unwrap();
        let canvas = Canvas::new(32, 32).unwrap();
        let far = stacked_mesh(&[(-5.0, [0, 0, 200, 255])]);
        let near = stacked_mesh(&[(5.0, [200, 0, 0, 255])]);
        let sources = [
            DrawSource::mesh(&near, canvas.centre()),
            DrawSource::mesh(&far, canvas.centre()),
        ];
        let frame = render_frame(&sources, &light, canvas, BLACK);
        assert_eq!(pixel(&frame, 16, 16), [200, 0, 0, 255]);
    }

    #[test]
    fn test_render_body() {
        let mut config = BodyConfig::terrestrial_oceans(40.0);
        config.subdivision = 2;
        let body = Body::generate(config, 42).unwrap();
        let canvas = Canvas::new(64, 64).unwrap();
        let source = DrawSource::body(&body, canvas.centre());
        assert!(source.fog.is_some());

        let frame = render_frame(&[source], &Light::default(), canvas, BLACK);
        assert_eq!(frame.dimensions(), (64, 64));
        assert_ne!(pixel(&frame, 32, 32), BLACK);
        assert_eq!(pixel(&frame, 0, 0), BLACK);
        assert!(frame.pixels().all(|p| p.0[3] == 255));

        let list = build_draw_list(&[source], &Light::default());
        let clouds = body.clouds().map_or(0, |c| c.len());
        assert_eq!(list.len(), body.mesh().face_count() + clouds);
    }
}
