use std::fmt;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;
use tracing::info;

use crate::ErrorKind;
use crate::config::Origin;
use crate::grid::Grid;
use crate::parse_plaintext;
use crate::parse_plaintext::PlaintextError;
use crate::parse_rle;
use crate::parse_rle::RleError;

/// The pattern file formats we can read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternFormat {
    /// See: https://conwaylife.com/wiki/Plaintext
    Plaintext,

    /// See: https://conwaylife.com/wiki/Run_Length_Encoded
    Rle,
}

impl PatternFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();

        match ext.as_str() {
            "cells" | "txt" => Some(Self::Plaintext),
            "rle" => Some(Self::Rle),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown pattern format \"{0}\", expected one of 'plaintext', 'cells' or 'rle'")]
pub struct UnknownFormatError(String);

impl FromStr for PatternFormat {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plaintext" | "cells" => Ok(Self::Plaintext),
            "rle" => Ok(Self::Rle),
            _ => Err(UnknownFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for PatternFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plaintext => write!(f, "plaintext"),
            Self::Rle => write!(f, "rle"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read pattern file {path:?}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Can't tell the pattern format of {path:?}, use a .cells or .rle extension")]
    UnknownFormat { path: PathBuf },

    #[error("Plaintext pattern {path:?}: {source}")]
    Plaintext {
        path: PathBuf,
        #[source]
        source: PlaintextError,
    },

    #[error("RLE pattern {path:?}: {source}")]
    Rle {
        path: PathBuf,
        #[source]
        source: RleError,
    },
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceUnavailable { .. } => ErrorKind::PatternSourceUnavailable,
            Self::UnknownFormat { .. } => ErrorKind::UnknownFormat,
            Self::Plaintext {
                source: PlaintextError::OutOfBounds { .. },
                ..
            } => ErrorKind::PatternOutOfBounds,
            Self::Rle { source, .. } => match source {
                RleError::OutOfBounds { .. } => ErrorKind::PatternOutOfBounds,
                RleError::Encoding(_) => ErrorKind::MalformedRle,
                RleError::Header(_) => ErrorKind::MalformedHeader,
            },
        }
    }
}

/// What a successful load learned about the pattern.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PatternInfo {
    pub name: Option<String>,

    /// Pattern bounding box, when the file declares or implies one
    pub size: Option<(u32, u32)>,
}

/// Read the pattern at `path` into `grid`, its top-left cell at `origin`.
///
/// With no `format`, it's guessed from the file extension. On error the grid keeps whatever cells
/// were written before the failure.
pub fn load_pattern(
    grid: &mut Grid,
    path: &Path,
    format: Option<PatternFormat>,
    origin: Origin,
) -> Result<PatternInfo, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let format = match format.or_else(|| PatternFormat::from_path(path)) {
        Some(format) => format,
        None => {
            return Err(LoadError::UnknownFormat {
                path: path.to_path_buf(),
            });
        }
    };

    debug!(path = %path.display(), %format, bytes = bytes.len(), "Loading pattern");

    let info = load_pattern_bytes(grid, &bytes, format, origin, path)?;

    info!(
        path = %path.display(),
        %format,
        x = origin.x,
        y = origin.y,
        population = grid.population(),
        "Loaded pattern {}",
        info.name.as_deref().unwrap_or("(unnamed)")
    );

    Ok(info)
}

/// Like [`load_pattern`], for a pattern already in memory. `path` only labels errors.
pub fn load_pattern_bytes(
    grid: &mut Grid,
    bytes: &[u8],
    format: PatternFormat,
    origin: Origin,
    path: &Path,
) -> Result<PatternInfo, LoadError> {
    let Origin { x, y } = origin;
    let sink = |x, y, alive| grid.set_cell(x, y, alive);

    match format {
        PatternFormat::Plaintext => {
            let file = parse_plaintext::read_plaintext(bytes, x, y, sink).map_err(|source| {
                LoadError::Plaintext {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

            Ok(PatternInfo {
                name: file.name.map(crate::parse_util::show),
                size: u32::try_from(file.width).ok().zip(u32::try_from(file.height).ok()),
            })
        }
        PatternFormat::Rle => {
            let file = parse_rle::read_rle(bytes, x, y, sink).map_err(|source| LoadError::Rle {
                path: path.to_path_buf(),
                source,
            })?;

            Ok(PatternInfo {
                name: file.name.map(crate::parse_util::show),
                size: file.width.zip(file.height),
            })
        }
    }
}
