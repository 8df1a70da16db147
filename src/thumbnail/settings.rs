//! Thumbnail export settings.

use crate::config::ThumbnailConfig;

/// Smallest thumbnail width accepted.
pub const MIN_WIDTH: u32 = 64;
/// Highest AVIF quality.
pub const MAX_QUALITY: u8 = 100;
/// Highest encoder effort.
pub const MAX_EFFORT: u8 = 9;

/// Clamped thumbnail export settings.
///
/// `effort` runs from 0 (fastest) to 9 (slowest) and is translated to the
/// AVIF encoder's speed scale with [`ThumbnailSettings::encoder_speed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSettings {
    width: u32,
    quality: u8,
    effort: u8,
}

impl ThumbnailSettings {
    pub fn new(width: u32, quality: u8, effort: u8) -> Self {
        Self {
            width: width.max(MIN_WIDTH),
            quality: quality.min(MAX_QUALITY),
            effort: effort.min(MAX_EFFORT),
        }
    }

    /// Settings from config, with optional per-run overrides.
    pub fn from_config(
        config: &ThumbnailConfig,
        width: Option<u32>,
        quality: Option<u8>,
        effort: Option<u8>,
    ) -> Self {
        Self::new(
            width.unwrap_or(config.width),
            quality.unwrap_or(config.quality),
            effort.unwrap_or(config.effort),
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn effort(&self) -> u8 {
        self.effort
    }

    /// Encoder speed, 1 (slowest) to 10 (fastest).
    pub fn encoder_speed(&self) -> u8 {
        10 - self.effort
    }
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self::from_config(&ThumbnailConfig::default(), None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = ThumbnailSettings::default();
        assert_eq!(s.width(), 1000);
        assert_eq!(s.quality(), 75);
        assert_eq!(s.effort(), 4);
        assert_eq!(s.encoder_speed(), 6);
    }

    #[test]
    fn clamps() {
        let s = ThumbnailSettings::new(10, 250, 42);
        assert_eq!(s.width(), MIN_WIDTH);
        assert_eq!(s.quality(), 100);
        assert_eq!(s.effort(), 9);
        assert_eq!(s.encoder_speed(), 1);

        let s = ThumbnailSettings::new(2048, 0, 0);
        assert_eq!(s.width(), 2048);
        assert_eq!(s.quality(), 0);
        assert_eq!(s.encoder_speed(), 10);
    }

    #[test]
    fn overrides_win_over_config() {
        let config = ThumbnailConfig {
            width: 800,
            ..Default::default()
        };
        let s = ThumbnailSettings::from_config(&config, None, Some(50), None);
        assert_eq!(s.width(), 800);
        assert_eq!(s.quality(), 50);
        assert_eq!(s.effort(), 4);
    }
}
