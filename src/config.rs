//! Launcher settings that arrive as strings, such as `--grid-size 64x64` or `--origin 3,4`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::Coord;
use crate::grid::Grid;
use crate::grid::GridError;
use crate::parse_util;
use crate::parse_util::ConvertError;

/// Grid size used when none is given
pub const DEFAULT_GRID_SIZE: GridSize = GridSize {
    width: 64,
    height: 64,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid size string \"{got}\", expected \"<width>x<height>\"")]
    SizeSyntax { got: String },

    #[error("Invalid origin \"{got}\", expected \"<x>,<y>\"")]
    OriginSyntax { got: String },

    #[error("Invalid number: {0}")]
    Number(#[from] ConvertError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Width and height of a grid, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    /// Checks signed dimensions before they ever become a grid size. Zero, negative and
    /// larger-than-`u32` dimensions are all rejected.
    pub fn new(width: i64, height: i64) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDimensions { width, height };

        if width <= 0 || height <= 0 {
            return Err(invalid);
        }

        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(invalid);
        };

        Ok(Self {
            width: w,
            height: h,
        })
    }

    /// Build an empty grid of this size.
    pub fn grid(&self) -> Result<Grid, GridError> {
        Grid::new(self.width, self.height)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        DEFAULT_GRID_SIZE
    }
}

impl FromStr for GridSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((w, h)) = s.split_once('x') else {
            return Err(ConfigError::SizeSyntax { got: s.to_string() });
        };

        let width = parse_util::convert(w.as_bytes())?;
        let height = parse_util::convert(h.as_bytes())?;

        Ok(Self::new(width, height)?)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Where a pattern's top-left cell lands on the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Origin {
    pub x: Coord,
    pub y: Coord,
}

impl FromStr for Origin {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((x, y)) = s.split_once(',') else {
            return Err(ConfigError::OriginSyntax { got: s.to_string() });
        };

        Ok(Self {
            x: parse_util::convert(x.as_bytes())?,
            y: parse_util::convert(y.as_bytes())?,
        })
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigError;
    use super::GridSize;
    use super::Origin;
    use crate::grid::GridError;

    #[test]
    fn parse_size() {
        let size: GridSize = "120x80".parse().unwrap();

        assert_eq!(
            size,
            GridSize {
                width: 120,
                height: 80
            }
        );
        assert_eq!(size.to_string(), "120x80");
    }

    #[test]
    fn size_syntax() {
        assert!(matches!(
            "120".parse::<GridSize>(),
            Err(ConfigError::SizeSyntax { .. })
        ));
        assert!(matches!(
            "12ax3".parse::<GridSize>(),
            Err(ConfigError::Number(_))
        ));
    }

    #[test]
    fn non_positive_sizes() {
        assert!(matches!(
            "0x10".parse::<GridSize>(),
            Err(ConfigError::Grid(GridError::InvalidDimensions {
                width: 0,
                height: 10
            }))
        ));
        assert!(matches!(
            "-5x10".parse::<GridSize>(),
            Err(ConfigError::Grid(GridError::InvalidDimensions { width: -5, .. }))
        ));
        assert!(GridSize::new(1 << 40, 1).is_err());
    }

    #[test]
    fn size_builds_grid() {
        let grid = GridSize::new(7, 3).unwrap().grid().unwrap();

        assert_eq!((grid.width(), grid.height()), (7, 3));
    }

    #[test]
    fn parse_origin() {
        assert_eq!("3, -4".parse::<Origin>().unwrap(), Origin { x: 3, y: -4 });
        assert!(matches!(
            "3".parse::<Origin>(),
            Err(ConfigError::OriginSyntax { .. })
        ));
    }
}
