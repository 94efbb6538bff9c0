use crate::geometry::{distance, random};
use crate::surface::{Hsla, Surface};
use fastrand::Rng;

/// Positions kept for the trail, newest first.
pub const TRAIL_LEN: usize = 3;

const LAUNCH_SPEED: f32 = 2.0;
const ACCELERATION: f32 = 1.05;
const RING_MIN: f32 = 1.0;
const RING_MAX: f32 = 8.0;
const RING_STEP: f32 = 0.3;

/// Outcome of one [`Firework::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flight {
    Climbing,
    /// Reached the target; the shell is spent and bursts at `(x, y)`.
    Detonated { x: f32, y: f32, hue: f32 },
}

/// Shell accelerating from its launch point toward a fixed target.
#[derive(Debug, Clone)]
pub struct Firework {
    x: f32,
    y: f32,
    sx: f32,
    sy: f32,
    tx: f32,
    ty: f32,
    distance_to_target: f32,
    distance_traveled: f32,
    trail: [(f32, f32); TRAIL_LEN],
    angle: f32,
    speed: f32,
    brightness: f32,
    target_radius: f32,
}

impl Firework {
    pub fn new(rng: &mut Rng, sx: f32, sy: f32, tx: f32, ty: f32) -> Self {
        Self {
            x: sx,
            y: sy,
            sx,
            sy,
            tx,
            ty,
            distance_to_target: distance(sx, sy, tx, ty),
            distance_traveled: 0.0,
            trail: [(sx, sy); TRAIL_LEN],
            angle: (ty - sy).atan2(tx - sx),
            speed: LAUNCH_SPEED,
            brightness: random(rng, 50.0, 70.0),
            target_radius: RING_MIN,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn start(&self) -> (f32, f32) {
        (self.sx, self.sy)
    }

    pub fn target(&self) -> (f32, f32) {
        (self.tx, self.ty)
    }

    pub fn trail(&self) -> &[(f32, f32)] {
        &self.trail
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn target_radius(&self) -> f32 {
        self.target_radius
    }

    /// Advance one frame under the ambient `hue`.
    ///
    /// Arrival is judged on the position the shell is *about* to move to:
    /// when that look-ahead point is at least as far from the start as the
    /// target is, the shell detonates in place and does not move this frame.
    pub fn update(&mut self, hue: f32) -> Flight {
        self.trail.rotate_right(1);
        self.trail[0] = (self.x, self.y);

        if self.target_radius < RING_MAX {
            self.target_radius += RING_STEP;
        } else {
            self.target_radius = RING_MIN;
        }

        self.speed *= ACCELERATION;

        let vx = self.angle.cos() * self.speed;
        let vy = self.angle.sin() * self.speed;
        self.distance_traveled = distance(self.sx, self.sy, self.x + vx, self.y + vy);

        if self.distance_traveled >= self.distance_to_target {
            Flight::Detonated { x: self.tx, y: self.ty, hue }
        } else {
            self.x += vx;
            self.y += vy;
            Flight::Climbing
        }
    }

    /// Trail segment in the ambient hue, plus the pulsing ring at the target.
    pub fn draw(&self, surface: &mut impl Surface, hue: f32) {
        let color = Hsla::new(hue, 100.0, self.brightness, 1.0).into();
        surface.stroke_line(self.trail[TRAIL_LEN - 1], (self.x, self.y), color);
        surface.stroke_circle((self.tx, self.ty), self.target_radius, color);
    }
}
