//! Multi-body scenes and spin animation.

use glam::Vec2;
use image::RgbaImage;
use tracing::debug;

use crate::biomes::Rgba;
use crate::body::Body;
use crate::orientation::SpinMode;
use super::lighting::Light;
use super::raster::{render_frame, Canvas, DrawSource};

/// Frames in one full animation by default.
pub const DEFAULT_FRAME_COUNT: usize = 385;

/// Where a body's centre lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScreenPosition {
    #[default]
    Centre,
    /// Absolute pixel position of the body centre.
    At(f32, f32),
}

impl ScreenPosition {
    fn resolve(self, canvas: &Canvas) -> Vec2 {
        match self {
            ScreenPosition::Centre => canvas.centre(),
            ScreenPosition::At(x, y) => Vec2::new(x, y),
        }
    }
}

/// Bodies composed on one canvas under one light.
#[derive(Debug, Clone)]
pub struct Scene {
    canvas: Canvas,
    background: Rgba,
    light: Light,
    bodies: Vec<(Body, ScreenPosition)>,
}

impl Scene {
    pub fn new(canvas: Canvas, background: Rgba, light: Light) -> Self {
        Self {
            canvas,
            background,
            light,
            bodies: Vec::new(),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn set_light(&mut self, light: Light) {
        self.light = light;
    }

    /// Adds a body and returns its index.
    pub fn add_body(&mut self, body: Body, position: ScreenPosition) -> usize {
        self.bodies.push((body, position));
        self.bodies.len() - 1
    }

    /// Removes and returns the body at `index`, shifting later bodies down.
    pub fn remove_body(&mut self, index: usize) -> Option<Body> {
        (index < self.bodies.len()).then(|| self.bodies.remove(index).0)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().map(|(body, _)| body)
    }

    /// Renders the current pose of every body.
    pub fn render(&self) -> RgbaImage {
        let sources: Vec<DrawSource> = self
            .bodies
            .iter()
            .map(|(body, position)| DrawSource::body(body, position.resolve(&self.canvas)))
            .collect();
        render_frame(&sources, &self.light, self.canvas, self.background)
    }

    /// Spins every body by `degrees`.
    pub fn step(&mut self, degrees: f32, mode: SpinMode) {
        for (body, _) in &mut self.bodies {
            body.spin(degrees, mode);
        }
    }

    /// Renders `frames` frames, spinning every body by `degrees` between them.
    ///
    /// The first frame shows the current pose; the bodies are left in the pose
    /// following the last frame.
    pub fn animate(&mut self, frames: usize, degrees: f32, mode: SpinMode) -> Vec<RgbaImage> {
        debug!(frames, degrees, bodies = self.bodies.len(), "animation started");
        let mut out = Vec::with_capacity(frames);
        for _ in 0..frames {
            out.push(self.render());
            self.step(degrees, mode);
        }
        out
    }
}
