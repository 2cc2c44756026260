//! Window geometry restore and clamping (made by FontLab https://www.fontlab.com/)

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Space kept free at the right and bottom edges for the title bar and
/// window-manager affordances.
pub const EDGE_MARGIN: i32 = 40;

pub const DEFAULT_WIDTH: i32 = 800;
pub const DEFAULT_HEIGHT: i32 = 600;
pub const DEFAULT_X: i32 = 100;
pub const DEFAULT_Y: i32 = 100;

/// Persisted window size and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            x: DEFAULT_X,
            y: DEFAULT_Y,
        }
    }
}

/// Visible screen area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

/// Fit a persisted geometry onto the current screen.
///
/// Sizes are clamped first so that re-centering works with the final size.
pub fn clamp_to_screen(geometry: WindowGeometry, screen: ScreenSize) -> WindowGeometry {
    let screen_width = screen.width.max(0);
    let screen_height = screen.height.max(0);

    let width = geometry.width.clamp(0, screen_width);
    let height = geometry.height.clamp(0, screen_height);

    let mut x = geometry.x.max(0);
    let mut y = geometry.y.max(0);

    let x_limit = (screen_width - EDGE_MARGIN).max(0);
    let y_limit = (screen_height - EDGE_MARGIN).max(0);
    if x > x_limit {
        x = x_limit;
    }
    if y > y_limit {
        y = y_limit;
    }

    // width <= screen_width here, so the subtraction cannot overflow
    if x > screen_width - width {
        x = (screen_width - width) / 2;
    }
    if y > screen_height - height {
        y = (screen_height - height) / 2;
    }

    WindowGeometry {
        width,
        height,
        x,
        y,
    }
}

impl fmt::Display for WindowGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WIDTHxHEIGHT`.
impl FromStr for ScreenSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (width, height) = split_size(s)?;
        if width <= 0 || height <= 0 {
            return Err(anyhow!("screen size must be positive: {s}"));
        }
        Ok(Self { width, height })
    }
}

/// Parses `WIDTHxHEIGHT+X+Y`; offsets may be negative (`+-20`).
impl FromStr for WindowGeometry {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().splitn(3, '+');
        let size = parts.next().unwrap_or_default();
        let (width, height) = split_size(size)?;
        let x = parts
            .next()
            .ok_or_else(|| anyhow!("missing x offset in geometry: {s}"))?;
        let y = parts
            .next()
            .ok_or_else(|| anyhow!("missing y offset in geometry: {s}"))?;

        Ok(Self {
            width,
            height,
            x: parse_int(x)?,
            y: parse_int(y)?,
        })
    }
}

fn split_size(s: &str) -> Result<(i32, i32)> {
    let (w, h) = s
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got {s:?}"))?;
    Ok((parse_int(w)?, parse_int(h)?))
}

fn parse_int(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .with_context(|| format!("invalid integer: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(width: i32, height: i32, x: i32, y: i32) -> WindowGeometry {
        WindowGeometry {
            width,
            height,
            x,
            y,
        }
    }

    const HD: ScreenSize = ScreenSize {
        width: 1920,
        height: 1080,
    };

    #[test]
    fn oversized_window_is_shrunk_and_recentered() {
        let clamped = clamp_to_screen(geom(2000, 1500, 1900, 10), HD);
        assert_eq!(clamped, geom(1920, 1080, 0, 0));
    }

    #[test]
    fn fitting_window_is_untouched() {
        let g = geom(800, 600, 100, 100);
        assert_eq!(clamp_to_screen(g, HD), g);
    }

    #[test]
    fn negative_position_moves_to_origin() {
        assert_eq!(
            clamp_to_screen(geom(800, 600, -300, -5), HD),
            geom(800, 600, 0, 0)
        );
    }

    #[test]
    fn offscreen_position_is_recentered() {
        let clamped = clamp_to_screen(geom(800, 600, 5000, 5000), HD);
        assert_eq!(clamped, geom(800, 600, 560, 240));
    }

    #[test]
    fn position_inside_margin_stays_when_window_fits() {
        let clamped = clamp_to_screen(geom(30, 30, 1890, 1045), HD);
        assert_eq!(clamped, geom(30, 30, 1880, 1040));
    }

    #[test]
    fn tiny_screen_never_yields_negative_offsets() {
        let screen = ScreenSize {
            width: 30,
            height: 20,
        };
        let clamped = clamp_to_screen(geom(10, 10, 50, 50), screen);
        assert!(clamped.x >= 0 && clamped.y >= 0);
        assert!(clamped.x + clamped.width <= screen.width);
        assert!(clamped.y + clamped.height <= screen.height);
    }

    #[test]
    fn huge_screens_do_not_overflow() {
        let screen = ScreenSize {
            width: i32::MAX,
            height: 1080,
        };
        let clamped = clamp_to_screen(geom(i32::MAX, 100, i32::MAX - 47, 0), screen);
        assert_eq!(clamped, geom(i32::MAX, 100, 0, 0));

        let extreme = ScreenSize {
            width: i32::MIN,
            height: i32::MIN,
        };
        assert_eq!(clamp_to_screen(geom(5, 5, 5, 5), extreme), geom(0, 0, 0, 0));
    }

    #[test]
    fn parses_geometry_strings() {
        let g: WindowGeometry = "1024x768+-20+30".parse().expect("parse");
        assert_eq!(g, geom(1024, 768, -20, 30));
        assert_eq!(g.to_string(), "1024x768+-20+30");

        let s: ScreenSize = "1920X1080".parse().expect("parse");
        assert_eq!(s, HD);

        assert!("1920".parse::<ScreenSize>().is_err());
        assert!("0x1080".parse::<ScreenSize>().is_err());
        assert!("800x600+10".parse::<WindowGeometry>().is_err());
    }
}
