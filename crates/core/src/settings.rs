use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.1;

const MIN_AUTOPLAY_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub flip_speed: FlipSpeed,
    pub zoom: f32,
    pub autoplay_enabled: bool,
    pub autoplay_interval_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Sepia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipSpeed {
    Slow,
    Normal,
    Fast,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Sepia => "sepia",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "sepia" => Ok(Theme::Sepia),
            _ => Err("unknown theme"),
        }
    }
}

impl FlipSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlipSpeed::Slow => "slow",
            FlipSpeed::Normal => "normal",
            FlipSpeed::Fast => "fast",
        }
    }

    /// Latency of one animated page flip.
    pub fn duration(&self) -> Duration {
        match self {
            FlipSpeed::Slow => Duration::from_millis(1_200),
            FlipSpeed::Normal => Duration::from_millis(800),
            FlipSpeed::Fast => Duration::from_millis(500),
        }
    }
}

impl std::fmt::Display for FlipSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FlipSpeed {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(FlipSpeed::Slow),
            "normal" => Ok(FlipSpeed::Normal),
            "fast" => Ok(FlipSpeed::Fast),
            _ => Err("unknown flip speed"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            flip_speed: FlipSpeed::Normal,
            zoom: 1.0,
            autoplay_enabled: false,
            autoplay_interval_ms: 5_000,
        }
    }
}

impl Settings {
    pub fn normalize(&mut self) {
        if !self.zoom.is_finite() {
            self.zoom = 1.0;
        }
        self.zoom = self.zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        self.autoplay_interval_ms = self.autoplay_interval_ms.max(MIN_AUTOPLAY_INTERVAL_MS);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
        self.normalize();
    }

    pub fn cycle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Sepia,
            Theme::Sepia => Theme::Light,
        };
    }

    pub fn cycle_flip_speed(&mut self) {
        self.flip_speed = match self.flip_speed {
            FlipSpeed::Slow => FlipSpeed::Normal,
            FlipSpeed::Normal => FlipSpeed::Fast,
            FlipSpeed::Fast => FlipSpeed::Slow,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_normalized() {
        let mut settings = Settings::default();
        let before = settings.clone();
        settings.normalize();
        assert_eq!(settings, before);
    }

    #[test]
    fn zoom_setter_clamps_both_ends() {
        let mut settings = Settings::default();
        settings.set_zoom(5.0);
        assert_eq!(settings.zoom, 3.0);
        settings.set_zoom(0.1);
        assert_eq!(settings.zoom, 0.5);
    }

    #[test]
    fn zoom_steps_stay_in_bounds() {
        let mut settings = Settings::default();
        settings.set_zoom(ZOOM_MAX);
        settings.zoom_in();
        assert_eq!(settings.zoom, ZOOM_MAX);
        settings.set_zoom(ZOOM_MIN);
        settings.zoom_out();
        assert_eq!(settings.zoom, ZOOM_MIN);
    }

    #[test]
    fn normalize_repairs_nan_zoom() {
        let mut settings = Settings {
            zoom: f32::NAN,
            ..Settings::default()
        };
        settings.normalize();
        assert_eq!(settings.zoom, 1.0);
    }

    #[test]
    fn normalize_floors_autoplay_interval() {
        let mut settings = Settings {
            autoplay_interval_ms: 10,
            ..Settings::default()
        };
        settings.normalize();
        assert_eq!(settings.autoplay_interval_ms, 1_000);
    }

    #[test]
    fn cycle_theme_rotates() {
        let mut settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        settings.cycle_theme();
        assert_eq!(settings.theme, Theme::Dark);
        settings.cycle_theme();
        assert_eq!(settings.theme, Theme::Sepia);
        settings.cycle_theme();
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn theme_parses_strings() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(" SEPIA ".parse::<Theme>().unwrap(), Theme::Sepia);
        assert!("violet".parse::<Theme>().is_err());
    }

    #[test]
    fn flip_speed_maps_to_latency() {
        assert_eq!(FlipSpeed::Slow.duration(), Duration::from_millis(1_200));
        assert_eq!(FlipSpeed::Normal.duration(), Duration::from_millis(800));
        assert_eq!(FlipSpeed::Fast.duration(), Duration::from_millis(500));
    }

    #[test]
    fn flip_speed_parses_strings() {
        assert_eq!("slow".parse::<FlipSpeed>().unwrap(), FlipSpeed::Slow);
        assert_eq!("Fast".parse::<FlipSpeed>().unwrap(), FlipSpeed::Fast);
        assert!("warp".parse::<FlipSpeed>().is_err());
    }
}
