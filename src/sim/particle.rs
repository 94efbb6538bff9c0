use crate::geometry::random;
use crate::surface::{Hsla, Surface};
use fastrand::Rng;
use std::f32::consts::TAU;

/// Positions kept for the trail, newest first.
pub const TRAIL_LEN: usize = 5;

const FRICTION: f32 = 0.95;
const GRAVITY: f32 = 1.0;
const HUE_JITTER: f32 = 20.0;

/// Explosion fragment: decelerates, falls, and fades out.
#[derive(Debug, Clone)]
pub struct Particle {
    x: f32,
    y: f32,
    trail: [(f32, f32); TRAIL_LEN],
    angle: f32,
    speed: f32,
    hue: f32,
    brightness: f32,
    alpha: f32,
    decay: f32,
}

impl Particle {
    /// Fragment at `(x, y)` whose hue is jittered around the ambient `hue`.
    pub fn new(rng: &mut Rng, x: f32, y: f32, hue: f32) -> Self {
        Self {
            x,
            y,
            trail: [(x, y); TRAIL_LEN],
            angle: random(rng, 0.0, TAU),
            speed: random(rng, 1.0, 10.0),
            hue: random(rng, hue - HUE_JITTER, hue + HUE_JITTER),
            brightness: random(rng, 50.0, 80.0),
            alpha: 1.0,
            decay: random(rng, 0.015, 0.03),
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn trail(&self) -> &[(f32, f32)] {
        &self.trail
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    /// Advance one frame. Returns `false` once the particle has faded out
    /// and must be dropped.
    pub fn update(&mut self) -> bool {
        self.trail.rotate_right(1);
        self.trail[0] = (self.x, self.y);

        self.speed *= FRICTION;
        self.x += self.angle.cos() * self.speed;
        self.y += self.angle.sin() * self.speed + GRAVITY;
        self.alpha -= self.decay;

        self.alpha > self.decay
    }

    /// Trail segment from the oldest remembered point to the current one.
    pub fn draw(&self, surface: &mut impl Surface) {
        let color = Hsla::new(self.hue, 100.0, self.brightness, self.alpha);
        surface.stroke_line(self.trail[TRAIL_LEN - 1], (self.x, self.y), color.into());
    }
}
