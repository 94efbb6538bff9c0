//! Celebration video requested once the gift box is revealed.
//!
//! The terminal cannot play it, so the host shows it as a caption card.

use std::time::{Duration, Instant};

pub const VIDEO_SRC: &str = "https://www.youtube.com/embed/Q4s2AsXCRmY?si=zgonKazFfHrHI19V";
pub const VIDEO_TITLE: &str = "Birthday Celebration Video";
pub const VIDEO_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

/// Viewports at least this wide get the larger player.
const DESKTOP_MIN_WIDTH: f32 = 1000.0;
const DESKTOP_SIZE: (u32, u32) = (295, 185);
const COMPACT_SIZE: (u32, u32) = (255, 155);
/// Delay between inserting the player and showing it.
const FADE_IN: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEmbed {
    pub src: &'static str,
    pub title: &'static str,
    pub allow: &'static str,
    pub allow_fullscreen: bool,
    pub width: u32,
    pub height: u32,
    visible_at: Instant,
}

impl VideoEmbed {
    /// Player sized for a viewport `viewport_width` logical units wide.
    pub fn request(viewport_width: f32, now: Instant) -> Self {
        let (width, height) = if viewport_width >= DESKTOP_MIN_WIDTH {
            DESKTOP_SIZE
        } else {
            COMPACT_SIZE
        };
        log::info!("video embed requested: {VIDEO_SRC} ({width}x{height})");
        Self {
            src: VIDEO_SRC,
            title: VIDEO_TITLE,
            allow: VIDEO_ALLOW,
            allow_fullscreen: true,
            width,
            height,
            visible_at: now + FADE_IN,
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now >= self.visible_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_by_viewport() {
        let now = Instant::now();
        let desktop = VideoEmbed::request(1000.0, now);
        assert_eq!((desktop.width, desktop.height), (295, 185));
        let compact = VideoEmbed::request(999.0, now);
        assert_eq!((compact.width, compact.height), (255, 155));
        assert!(compact.allow_fullscreen);
        assert_eq!(compact.src, VIDEO_SRC);
    }

    #[test]
    fn test_fades_in_after_delay() {
        let now = Instant::now();
        let embed = VideoEmbed::request(500.0, now);
        assert!(!embed.is_visible(now));
        assert!(!embed.is_visible(now + Duration::from_millis(299)));
        assert!(embed.is_visible(now + Duration::from_millis(300)));
    }
}
