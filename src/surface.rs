//! 2D raster drawing surface.
//!
//! Coordinates handed to a [`Surface`] are logical units. The terminal
//! [`Canvas`] maps them onto half-block pixels (one column wide, half a row
//! tall) by dividing through a fixed scale, so the simulation can keep its
//! browser-sized constants.

use std::io::Write;

/// How a draw call combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Paint over the destination.
    #[default]
    SourceOver,
    /// Add source to destination, saturating.
    Lighter,
    /// Erase the destination by the source alpha.
    DestinationOut,
}

/// Straight (non-premultiplied) color, channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    fn premultiplied(self) -> [f32; 4] {
        let a = self.a.clamp(0.0, 1.0);
        [self.r * a, self.g * a, self.b * a, a]
    }
}

/// Color in CSS `hsla()` terms: hue in degrees (any value, taken modulo 360),
/// saturation and lightness in percent, alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

impl Hsla {
    pub const fn new(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        Self { hue, saturation, lightness, alpha }
    }
}

impl From<Hsla> for Rgba {
    fn from(c: Hsla) -> Self {
        let h = c.hue.rem_euclid(360.0) / 60.0;
        let s = (c.saturation / 100.0).clamp(0.0, 1.0);
        let l = (c.lightness / 100.0).clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        Rgba::new(r + m, g + m, b + m, c.alpha.clamp(0.0, 1.0))
    }
}

/// The drawing contract the fireworks loop and the gift box render against.
///
/// Blend mode is sticky, like a canvas context's composite operation: it
/// applies to every draw until changed.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn resize(&mut self, width: f32, height: f32);
    fn blend_mode(&self) -> BlendMode;
    fn set_blend_mode(&mut self, mode: BlendMode);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba);
    fn stroke_circle(&mut self, center: (f32, f32), radius: f32, color: Rgba);
}

/// Premultiplied RGBA raster presented with half-block characters.
pub struct Canvas {
    width: usize,
    height: usize,
    scale: f32,
    pixels: Vec<[f32; 4]>,
    blend: BlendMode,
}

impl Canvas {
    /// `width` x `height` raster pixels, each covering `scale` logical units.
    pub fn new(width: usize, height: usize, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
            pixels: vec![[0.0; 4]; width * height],
            blend: BlendMode::default(),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pixel_width(&self) -> usize {
        self.width
    }

    pub fn pixel_height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    /// Premultiplied value of one raster pixel.
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 4] {
        self.pixels[y * self.width + x]
    }

    /// Logical coordinates of the center of a raster pixel.
    pub fn to_logical(&self, px: f32, py: f32) -> (f32, f32) {
        ((px + 0.5) * self.scale, (py + 0.5) * self.scale)
    }

    fn plot(&mut self, x: i32, y: i32, src: [f32; 4]) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let dst = &mut self.pixels[y as usize * self.width + x as usize];
        match self.blend {
            BlendMode::SourceOver => {
                for i in 0..4 {
                    dst[i] = src[i] + dst[i] * (1.0 - src[3]);
                }
            }
            BlendMode::Lighter => {
                for i in 0..4 {
                    dst[i] = (dst[i] + src[i]).min(1.0);
                }
            }
            BlendMode::DestinationOut => {
                for channel in dst.iter_mut() {
                    *channel *= 1.0 - src[3];
                }
            }
        }
    }

    fn raster(&self, x: f32, y: f32) -> (f32, f32) {
        (x / self.scale, y / self.scale)
    }

    /// Composite over `bg` and encode as half-block rows into `out`.
    pub fn present(&self, out: &mut Vec<u8>, bg: (u8, u8, u8)) -> std::io::Result<()> {
        let mut prev_top: (u8, u8, u8) = (255, 255, 255);
        let mut prev_bot: (u8, u8, u8) = (255, 255, 255);

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = composite(self.pixels[y * self.width + x], bg);
                let bot = if y + 1 < self.height {
                    composite(self.pixels[(y + 1) * self.width + x], bg)
                } else {
                    bg
                };

                if top != prev_top {
                    write!(out, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = top;
                }
                if bot != prev_bot {
                    write!(out, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = bot;
                }

                out.extend_from_slice("▄".as_bytes());
            }
            out.extend_from_slice(b"\x1b[0m");
            prev_top = (255, 255, 255);
            prev_bot = (255, 255, 255);
            if y + 2 < self.height {
                out.extend_from_slice(b"\r\n");
            }
        }
        Ok(())
    }
}

fn composite(px: [f32; 4], bg: (u8, u8, u8)) -> (u8, u8, u8) {
    let channel = |c: f32, b: u8| -> u8 {
        let v = b as f32 / 255.0 * (1.0 - px[3]) + c;
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    (channel(px[0], bg.0), channel(px[1], bg.1), channel(px[2], bg.2))
}

impl Surface for Canvas {
    fn width(&self) -> f32 {
        self.width as f32 * self.scale
    }

    fn height(&self) -> f32 {
        self.height as f32 * self.scale
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = (width / self.scale).ceil().max(0.0) as usize;
        self.height = (height / self.scale).ceil().max(0.0) as usize;
        self.pixels = vec![[0.0; 4]; self.width * self.height];
    }

    fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let src = color.premultiplied();
        let (x0, y0) = self.raster(x, y);
        let (x1, y1) = self.raster(x + w, y + h);
        let x0 = x0.floor().max(0.0) as i32;
        let y0 = y0.floor().max(0.0) as i32;
        let x1 = x1.ceil().min(self.width as f32) as i32;
        let y1 = y1.ceil().min(self.height as f32) as i32;

        for py in y0..y1 {
            for px in x0..x1 {
                self.plot(px, py, src);
            }
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba) {
        let src = color.premultiplied();
        let (ax, ay) = self.raster(from.0, from.1);
        let (bx, by) = self.raster(to.0, to.1);
        let steps = (bx - ax).abs().max((by - ay).abs()).ceil().max(1.0) as usize;

        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let p = (
                (ax + (bx - ax) * t).floor() as i32,
                (ay + (by - ay) * t).floor() as i32,
            );
            // Additive blending must not hit a pixel twice in one stroke.
            if last != Some(p) {
                self.plot(p.0, p.1, src);
                last = Some(p);
            }
        }
    }

    fn stroke_circle(&mut self, center: (f32, f32), radius: f32, color: Rgba) {
        let src = color.premultiplied();
        let (cx, cy) = self.raster(center.0, center.1);
        let r = radius / self.scale;
        let steps = ((std::f32::consts::TAU * r).ceil() as usize).max(8);

        let mut points: Vec<(i32, i32)> = (0..steps)
            .map(|i| {
                let theta = i as f32 / steps as f32 * std::f32::consts::TAU;
                (
                    (cx + theta.cos() * r).floor() as i32,
                    (cy + theta.sin() * r).floor() as i32,
                )
            })
            .collect();
        points.sort_unstable();
        points.dedup();

        for (x, y) in points {
            self.plot(x, y, src);
        }
    }
}
