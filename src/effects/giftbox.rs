use super::Effect;
use crate::config::{self, Options};
use crate::embed::VideoEmbed;
use crate::reveal::{RevealEvent, RevealSequencer};
use crate::sim::{self, Simulation};
use crate::surface::{BlendMode, Canvas, Hsla, Surface};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use fastrand::Rng;
use noise::{NoiseFn, Perlin};
use std::io::Write;
use std::time::Instant;

/// Logical units per half-block pixel. Keeps the browser-sized physics
/// constants in proportion on an 80-column terminal.
pub const SCALE: f32 = 6.0;

const PAPER_HUE: f32 = 350.0;
const RIBBON: Hsla = Hsla::new(45.0, 90.0, 55.0, 1.0);
const GLOW: Hsla = Hsla::new(50.0, 100.0, 60.0, 0.25);
const PROMPT: &str = "Press Enter or click to open your gift";

// Text colors for overlays
const TEXT_FG: (u8, u8, u8) = (255, 240, 200);
const CARD_BG: (u8, u8, u8) = (20, 20, 28);
const CARD_BORDER: (u8, u8, u8) = (255, 200, 80);

pub struct GiftboxEffect {
    canvas: Canvas,
    sim: Simulation,
    sequencer: RevealSequencer,
    embed: Option<VideoEmbed>,
    paper: Perlin,
    time: f32,
    clock: Instant,
    frames: u64,
    output_buf: Vec<u8>,
}

impl Effect for GiftboxEffect {
    fn new(width: usize, height: usize, options: &Options) -> Self {
        let mut rng = options.seed.map_or_else(Rng::new, Rng::with_seed);
        let paper = Perlin::new(rng.u32(..));
        let canvas = Canvas::new(width, height, SCALE);
        let sim = Simulation::new(canvas.width(), canvas.height(), rng);

        let mut effect = Self {
            canvas,
            sim,
            sequencer: RevealSequencer::new(),
            embed: None,
            paper,
            time: 0.0,
            clock: Instant::now(),
            frames: 0,
            output_buf: Vec::with_capacity(width * height * 25),
        };

        if options.skip_reveal {
            if let Some(event) = effect.sequencer.reveal_now() {
                effect.on_reveal(event, Instant::now());
            }
        }
        effect
    }

    fn update(&mut self, dt: f32) {
        self.time += dt;
        // Wrap time to prevent floating point precision issues
        if self.time > 10000.0 {
            self.time -= 10000.0;
        }
        self.advance(Instant::now());
    }

    fn render(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        self.canvas.present(&mut self.output_buf, config::bg_color())?;

        if self.sequencer.is_waiting() {
            self.write_prompt()?;
        }
        if let Some(embed) = &self.embed {
            if embed.is_visible(self.clock) {
                let embed = embed.clone();
                self.write_card(&embed)?;
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()?;
        Ok(())
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.canvas.resize(width as f32 * SCALE, height as f32 * SCALE);
        self.sim.resize(self.canvas.width(), self.canvas.height());
    }

    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Enter | KeyCode::Char(' '),
                kind: KeyEventKind::Press,
                ..
            }) => self.trigger(Instant::now()),
            Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                let (x, y) = self.canvas.to_logical(*column as f32, *row as f32 * 2.0 + 0.5);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.sim.pointer_down(x, y);
                        self.trigger(Instant::now());
                    }
                    MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                        self.sim.pointer_moved(x, y);
                    }
                    MouseEventKind::Up(MouseButton::Left) => self.sim.pointer_up(),
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

impl GiftboxEffect {
    fn trigger(&mut self, now: Instant) {
        if let Some(event) = self.sequencer.trigger(now) {
            self.on_reveal(event, now);
        }
    }

    /// One frame at wall-clock `now`: run due reveal steps, then either the
    /// fireworks loop or the gift box.
    fn advance(&mut self, now: Instant) {
        self.clock = now;
        while let Some(event) = self.sequencer.poll(now) {
            self.on_reveal(event, now);
        }

        if self.sequencer.is_revealed() {
            let stats = sim::tick(&mut self.sim, &mut self.canvas);
            self.frames += 1;
            if stats.detonated > 0 {
                log::debug!("{} detonation(s), {} particles live", stats.detonated, self.sim.particles.len());
            }
            if self.frames % 600 == 0 {
                log::debug!(
                    "frame {}: {} fireworks, {} particles",
                    self.frames,
                    self.sim.fireworks.len(),
                    self.sim.particles.len()
                );
            }
        } else {
            self.canvas.clear();
            self.draw_giftbox();
        }
    }

    fn on_reveal(&mut self, event: RevealEvent, now: Instant) {
        if event != RevealEvent::Revealed {
            return;
        }
        // The box goes transparent; whatever was drawn of it is dropped
        self.canvas.clear();
        log::info!("starting fireworks");
        self.embed = Some(VideoEmbed::request(self.sim.viewport().0, now));
    }

    fn draw_giftbox(&mut self) {
        let step = self.sequencer.step();
        let (w, h) = (self.canvas.width(), self.canvas.height());

        let bw = (w * 0.35).min(h * 0.45);
        let bh = bw * 0.75;
        let lw = bw * 1.1;
        let lh = bh * 0.25;

        let shake = match step {
            Some(1) => (self.time * 40.0).sin() * SCALE,
            _ => 0.0,
        };
        let lift = match step {
            Some(2) => lh * 1.5,
            Some(3) => lh * 4.0,
            _ => 0.0,
        };

        let body_x = w / 2.0 - bw / 2.0 + shake;
        let body_y = h * 0.85 - bh;
        let lid_x = w / 2.0 - lw / 2.0 + shake;
        let lid_y = body_y - lh - lift;
        let ribbon_w = bw * 0.14;
        let ribbon = RIBBON.into();

        self.canvas.set_blend_mode(BlendMode::SourceOver);
        self.paint_paper(body_x, body_y, bw, bh);
        self.paint_paper(lid_x, lid_y, lw, lh);
        self.canvas.fill_rect(w / 2.0 - ribbon_w / 2.0 + shake, body_y, ribbon_w, bh, ribbon);
        self.canvas.fill_rect(w / 2.0 - ribbon_w / 2.0 + shake, lid_y, ribbon_w, lh, ribbon);

        // Bow loops either side of the ribbon
        let loop_w = lw * 0.2;
        let loop_h = lh * 0.6;
        let loop_y = lid_y - loop_h;
        self.canvas.fill_rect(w / 2.0 - ribbon_w / 2.0 - loop_w + shake, loop_y, loop_w, loop_h, ribbon);
        self.canvas.fill_rect(w / 2.0 + ribbon_w / 2.0 + shake, loop_y, loop_w, loop_h, ribbon);

        if step == Some(3) {
            self.canvas.set_blend_mode(BlendMode::Lighter);
            self.canvas.fill_rect(body_x, lid_y + lh, bw, body_y - lid_y - lh, GLOW.into());
            self.canvas.set_blend_mode(BlendMode::SourceOver);
        }
    }

    /// Wrapping paper with a slow Perlin shimmer, one fill per pixel.
    fn paint_paper(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let x0 = (x / SCALE).floor().max(0.0) as usize;
        let y0 = (y / SCALE).floor().max(0.0) as usize;
        let x1 = ((x + w) / SCALE).ceil().max(0.0) as usize;
        let y1 = ((y + h) / SCALE).ceil().max(0.0) as usize;

        for py in y0..y1.min(self.canvas.pixel_height()) {
            for px in x0..x1.min(self.canvas.pixel_width()) {
                let n = self.paper.get([px as f64 * 0.3, py as f64 * 0.3, self.time as f64 * 0.5]) as f32;
                let color = Hsla::new(PAPER_HUE, 80.0, 42.0 + n * 8.0, 1.0);
                self.canvas.fill_rect(px as f32 * SCALE, py as f32 * SCALE, SCALE, SCALE, color.into());
            }
        }
    }

    fn terminal_size(&self) -> (usize, usize) {
        (self.canvas.pixel_width(), self.canvas.pixel_height().div_ceil(2))
    }

    fn write_prompt(&mut self) -> std::io::Result<()> {
        let (cols, rows) = self.terminal_size();
        let text: String = PROMPT.chars().take(cols).collect();
        let col = (cols - text.chars().count()) / 2;
        let row = (rows * 9 / 10).min(rows.saturating_sub(1));
        overlay_text(&mut self.output_buf, row, col, &text, TEXT_FG, config::bg_color())
    }

    /// Framed caption standing in for the video player.
    fn write_card(&mut self, embed: &VideoEmbed) -> std::io::Result<()> {
        let (cols, rows) = self.terminal_size();
        let card_w = ((embed.width as f32 / SCALE).ceil() as usize).min(cols.saturating_sub(2));
        let card_h = ((embed.height as f32 / (SCALE * 2.0)).ceil() as usize).min(rows.saturating_sub(2));
        if card_w < 4 || card_h < 3 {
            return Ok(());
        }
        let left = (cols - card_w) / 2;
        let top = rows - card_h - 1;
        let inner = card_w - 2;

        let lines = [
            format!("▶ {}", embed.title),
            String::new(),
            embed.src.to_string(),
            String::new(),
            "open the link in a browser to play".to_string(),
        ];

        for r in 0..card_h {
            let text = if r == 0 {
                format!("┌{}┐", "─".repeat(inner))
            } else if r == card_h - 1 {
                format!("└{}┘", "─".repeat(inner))
            } else {
                let body = lines.get(r - 1).map(String::as_str).unwrap_or("");
                let body: String = body.chars().take(inner).collect();
                let pad = inner - body.chars().count();
                format!("│{}{}│", body, " ".repeat(pad))
            };
            let fg = if r == 0 || r == card_h - 1 { CARD_BORDER } else { TEXT_FG };
            overlay_text(&mut self.output_buf, top + r, left, &text, fg, CARD_BG)?;
        }
        Ok(())
    }
}

/// Write `text` at zero-based terminal `(row, col)`.
fn overlay_text(
    buf: &mut Vec<u8>,
    row: usize,
    col: usize,
    text: &str,
    fg: (u8, u8, u8),
    bg: (u8, u8, u8),
) -> std::io::Result<()> {
    write!(
        buf,
        "\x1b[{};{}H\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        row + 1,
        col + 1,
        fg.0,
        fg.1,
        fg.2,
        bg.0,
        bg.1,
        bg.2,
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::VIDEO_TITLE;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn effect() -> GiftboxEffect {
        let options = Options { seed: Some(1), ..Default::default() };
        GiftboxEffect::new(80, 48, &options)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    fn rendered(effect: &mut GiftboxEffect) -> String {
        let mut out = Vec::new();
        effect.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_waiting_box_shows_prompt() {
        let mut fx = effect();
        fx.advance(Instant::now());
        assert!(fx.sequencer.is_waiting());
        assert!(rendered(&mut fx).contains(PROMPT));
        // Box is drawn somewhere on the canvas
        let lit = (0..fx.canvas.pixel_height())
            .flat_map(|y| (0..fx.canvas.pixel_width()).map(move |x| (x, y)))
            .filter(|&(x, y)| fx.canvas.pixel(x, y)[3] > 0.0)
            .count();
        assert!(lit > 0);
    }

    #[test]
    fn test_enter_triggers_once() {
        let mut fx = effect();
        let enter = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        fx.handle_event(&enter);
        assert_eq!(fx.sequencer.step(), Some(1));
        fx.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert_eq!(fx.sequencer.step(), Some(1));
        assert!(!rendered(&mut fx).contains(PROMPT));
    }

    #[test]
    fn test_reveal_starts_fireworks_and_requests_video() {
        let mut fx = effect();
        let t0 = Instant::now();
        fx.trigger(t0);
        fx.advance(t0 + Duration::from_millis(4999));
        assert!(fx.embed.is_none());
        assert!(fx.sim.fireworks.is_empty());

        let reveal_at = t0 + Duration::from_millis(5000);
        fx.advance(reveal_at);
        assert!(fx.sequencer.is_revealed());
        let embed = fx.embed.clone().unwrap();
        // 80 columns * 6 is a compact viewport
        assert_eq!((embed.width, embed.height), (255, 155));

        for i in 1..80 {
            fx.advance(reveal_at + Duration::from_millis(16 * i));
        }
        assert_eq!(fx.sim.fireworks.len(), 1);
        assert!(rendered(&mut fx).contains(VIDEO_TITLE));
    }

    #[test]
    fn test_skip_reveal_option() {
        let options = Options { seed: Some(2), skip_reveal: true, ..Default::default() };
        let fx = GiftboxEffect::new(80, 48, &options);
        assert!(fx.sequencer.is_revealed());
        assert!(fx.embed.is_some());
    }

    #[test]
    fn test_mouse_maps_to_logical_pointer() {
        let mut fx = effect();
        fx.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
        assert!(fx.sim.pointer.held);
        assert_eq!((fx.sim.pointer.x, fx.sim.pointer.y), (63.0, 66.0));
        // The click also opened the box
        assert_eq!(fx.sequencer.step(), Some(1));

        fx.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0));
        assert_eq!((fx.sim.pointer.x, fx.sim.pointer.y), (3.0, 6.0));
        fx.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 0));
        assert!(!fx.sim.pointer.held);
    }

    #[test]
    fn test_resize_updates_viewport() {
        let mut fx = effect();
        fx.resize(100, 60);
        assert_eq!(fx.sim.viewport(), (600.0, 360.0));
        assert_eq!(fx.terminal_size(), (100, 30));
    }
}
