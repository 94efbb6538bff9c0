//! Live fireworks, live particles, and the counters that pace launches.

use super::firework::Firework;
use super::particle::Particle;
use crate::geometry::random;
use fastrand::Rng;

/// Ambient hue the display starts from.
pub const START_HUE: f32 = 120.0;
/// Frames between automatic launches.
pub const AUTO_LAUNCH_FRAMES: u32 = 80;
/// Frames between launches while the pointer is held.
pub const POINTER_LAUNCH_FRAMES: u32 = 5;

/// Frame-counted cadence gate.
///
/// The counter climbs one step per frame up to `total` and parks there until
/// a launch is allowed, so a gate held closed fires on the first open frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    tick: u32,
    total: u32,
}

impl RateLimiter {
    pub const fn new(total: u32) -> Self {
        Self { tick: 0, total }
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Count this frame; returns `true` (and rearms) when a launch fires.
    pub fn poll(&mut self, allowed: bool) -> bool {
        if self.tick < self.total {
            self.tick += 1;
        }
        if self.tick >= self.total && allowed {
            self.tick = 0;
            true
        } else {
            false
        }
    }
}

/// Last known pointer state, fed by input handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub held: bool,
    pub x: f32,
    pub y: f32,
}

pub struct Simulation {
    pub fireworks: Vec<Firework>,
    pub particles: Vec<Particle>,
    pub hue: f32,
    pub timer: RateLimiter,
    pub limiter: RateLimiter,
    pub pointer: Pointer,
    pub(super) rng: Rng,
    width: f32,
    height: f32,
}

impl Simulation {
    pub fn new(width: f32, height: f32, rng: Rng) -> Self {
        Self {
            fireworks: Vec::new(),
            particles: Vec::new(),
            hue: START_HUE,
            timer: RateLimiter::new(AUTO_LAUNCH_FRAMES),
            limiter: RateLimiter::new(POINTER_LAUNCH_FRAMES),
            pointer: Pointer::default(),
            rng,
            width,
            height,
        }
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// New bounds apply to future launches only; live entities keep their
    /// stored positions and targets.
    pub fn resize(&mut self, width: f32, height: f32) {
        log::debug!("viewport {}x{} -> {}x{}", self.width, self.height, width, height);
        self.width = width;
        self.height = height;
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.pointer = Pointer { held: true, x, y };
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.x = x;
        self.pointer.y = y;
    }

    pub fn pointer_up(&mut self) {
        self.pointer.held = false;
    }

    /// Launch from bottom center toward a random point in the upper half.
    pub fn launch_random(&mut self) {
        let tx = random(&mut self.rng, 0.0, self.width);
        let ty = random(&mut self.rng, 0.0, self.height / 2.0);
        self.launch_toward(tx, ty);
    }

    /// Launch from bottom center toward `(tx, ty)`.
    pub fn launch_toward(&mut self, tx: f32, ty: f32) {
        let (sx, sy) = (self.width / 2.0, self.height);
        log::trace!("launch ({sx:.0}, {sy:.0}) -> ({tx:.0}, {ty:.0})");
        let firework = Firework::new(&mut self.rng, sx, sy, tx, ty);
        self.fireworks.push(firework);
    }
}
