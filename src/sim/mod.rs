//! Fireworks simulation: shells, burst particles, and the per-frame driver.

pub mod firework;
pub mod particle;
pub mod state;
pub mod tick;

pub use firework::{Firework, Flight};
pub use particle::Particle;
pub use state::{Pointer, RateLimiter, Simulation};
pub use tick::{FrameStats, tick};
