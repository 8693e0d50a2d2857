//! Startup parameters.
//!
//! Every option has a default matching the classic demo layout: a
//! 1280×720 window looking at a 16×9 plane, 10 units deep, backed by a
//! 640×360 paint buffer.

use clap::{Parser, ValueEnum};

use crate::world::PaintPlane;

/// Largest paint buffer accepted, in cells (8192 × 8192).
pub const MAX_BUFFER_CELLS: usize = 1 << 26;

/// Where finger frames come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Hold the left mouse button to paint under the cursor.
    Mouse,
    /// Ultraleap / Leap Motion device via LeapC (needs the `leapmotion` feature).
    Leap,
}

#[derive(Parser, Clone, Debug, PartialEq)]
#[command(
    name = "fingerpaint",
    version,
    about = "Paint on a virtual canvas with a tracked fingertip",
    long_about = "Space toggles scene rotation, C clears the canvas, Esc quits."
)]
pub struct Config {
    #[arg(long, default_value_t = 1280)]
    pub window_width: usize,

    #[arg(long, default_value_t = 720)]
    pub window_height: usize,

    /// Paint buffer columns.
    #[arg(long, default_value_t = 640)]
    pub buffer_width: usize,

    /// Paint buffer rows.
    #[arg(long, default_value_t = 360)]
    pub buffer_height: usize,

    /// Plane width in world units.
    #[arg(long, default_value_t = 16.0)]
    pub plane_width: f32,

    /// Plane height in world units.
    #[arg(long, default_value_t = 9.0)]
    pub plane_height: f32,

    /// Z coordinate of the plane (negative is into the screen).
    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    pub plane_depth: f32,

    #[arg(long, value_enum, default_value_t = SourceKind::Mouse)]
    pub source: SourceKind,

    #[arg(long, default_value_t = 60)]
    pub target_fps: usize,

    /// Don't draw the finger skeleton.
    #[arg(long)]
    pub hide_bones: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            buffer_width: 640,
            buffer_height: 360,
            plane_width: 16.0,
            plane_height: 9.0,
            plane_depth: -10.0,
            source: SourceKind::Mouse,
            target_fps: 60,
            hide_bones: false,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("window size {0}x{1} must be non-zero")]
    Window(usize, usize),

    #[error("buffer size {0}x{1} must be non-zero and at most {MAX_BUFFER_CELLS} cells")]
    Buffer(usize, usize),

    #[error("plane size {0}x{1} must be positive and finite")]
    PlaneSize(f32, f32),

    #[error("plane depth {0} must be finite")]
    PlaneDepth(f32),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Window(self.window_width, self.window_height));
        }
        let cells = self.buffer_width.checked_mul(self.buffer_height);
        if !matches!(cells, Some(n) if n > 0 && n <= MAX_BUFFER_CELLS) {
            return Err(ConfigError::Buffer(self.buffer_width, self.buffer_height));
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.plane_width) || !positive(self.plane_height) {
            return Err(ConfigError::PlaneSize(self.plane_width, self.plane_height));
        }
        if !self.plane_depth.is_finite() {
            return Err(ConfigError::PlaneDepth(self.plane_depth));
        }
        Ok(())
    }

    pub fn plane(&self) -> PaintPlane {
        PaintPlane {
            depth: self.plane_depth,
            width: self.plane_width,
            height: self.plane_height,
            columns: self.buffer_width,
            rows: self.buffer_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_default_impl() {
        let parsed = Config::try_parse_from(["fingerpaint"]).unwrap();
        assert_eq!(parsed, Config::default());
        assert_eq!(parsed.validate(), Ok(()));
    }

    #[test]
    fn parses_negative_depth_and_sizes() {
        let c = Config::try_parse_from([
            "fingerpaint",
            "--plane-depth",
            "-25",
            "--buffer-width",
            "320",
            "--buffer-height",
            "180",
            "--source",
            "leap",
            "--hide-bones",
        ])
        .unwrap();
        assert_eq!(c.plane_depth, -25.0);
        assert_eq!((c.buffer_width, c.buffer_height), (320, 180));
        assert_eq!(c.source, SourceKind::Leap);
        assert!(c.hide_bones);
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let c = Config {
            buffer_width: 0,
            ..Config::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::Buffer(0, 360)));

        let c = Config {
            plane_height: 0.0,
            ..Config::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::PlaneSize(..))));

        let c = Config {
            plane_depth: f32::NAN,
            ..Config::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::PlaneDepth(_))));

        let c = Config {
            window_height: 0,
            ..Config::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::Window(1280, 0)));
    }

    #[test]
    fn rejects_oversized_buffer() {
        let c = Config {
            buffer_width: 1 << 32,
            buffer_height: 1 << 32,
            ..Config::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::Buffer(1 << 32, 1 << 32)));

        let c = Config {
            buffer_width: 100_000,
            buffer_height: 100_000,
            ..Config::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::Buffer(..))));

        let c = Config {
            buffer_width: 8192,
            buffer_height: 8192,
            ..Config::default()
        };
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn plane_mirrors_config() {
        let p = Config::default().plane();
        assert_eq!((p.columns, p.rows), (640, 360));
        assert_eq!((p.width, p.height, p.depth), (16.0, 9.0, -10.0));
    }
}
