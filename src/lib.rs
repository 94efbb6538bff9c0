//! Terminal gift box that opens into an interactive fireworks show.

pub mod config;
pub mod effects;
pub mod embed;
pub mod geometry;
pub mod reveal;
pub mod sim;
pub mod surface;
