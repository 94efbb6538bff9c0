use crate::config::Options;
use crossterm::event::Event;
use std::io::Write;

pub mod giftbox;

pub trait Effect {
    /// `width` x `height` in half-block pixels (rows count twice).
    fn new(width: usize, height: usize, options: &Options) -> Self
    where
        Self: Sized;
    fn update(&mut self, dt: f32);
    fn render(&mut self, out: &mut impl Write) -> std::io::Result<()>;
    fn resize(&mut self, width: usize, height: usize);
    fn handle_event(&mut self, _event: &Event) {}
}
