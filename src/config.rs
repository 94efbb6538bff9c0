use clap::Parser;
use std::path::PathBuf;
use std::sync::OnceLock;

static BG_COLOR: OnceLock<(u8, u8, u8)> = OnceLock::new();

/// Background every effect composites over; black unless set at startup.
pub fn bg_color() -> (u8, u8, u8) {
    *BG_COLOR.get().unwrap_or(&(0, 0, 0))
}

pub fn set_bg_color(color: Rgb) {
    let _ = BG_COLOR.set(color.into());
}

/// Gift box that opens into a fireworks show.
///
/// Click the box or press Enter/Space to open it. Once the show starts,
/// hold the mouse button to aim fireworks. Press 'q', ESC, or Ctrl+C to exit.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "giftbox", version)]
pub struct Options {
    /// Background color as hex (e.g. --bg-color 1a1b26)
    #[arg(long, value_name = "RRGGBB", value_parser = parse_hex_color)]
    pub bg_color: Option<Rgb>,

    /// Seed for the random number generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write log output to this file (RUST_LOG sets the level)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Skip the gift box and start the fireworks right away
    #[arg(long)]
    pub skip_reveal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<Rgb> for (u8, u8, u8) {
    fn from(c: Rgb) -> Self {
        (c.0, c.1, c.2)
    }
}

pub fn parse_hex_color(hex: &str) -> Result<Rgb, String> {
    let invalid = || format!("invalid hex color '{hex}', expected RRGGBB (e.g. 1a1b26)");
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).map_err(|_| invalid());
    Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
