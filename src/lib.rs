pub mod camera;
pub mod config;
pub mod events;
pub mod grid;
pub mod parse_plaintext;
pub mod parse_rle;
pub mod parse_util;
pub mod pattern;
pub mod perf;

/// A signed grid coordinate. Negative values are representable so they can be rejected by bounds
/// checks instead of wrapping around.
pub type Coord = i64;

/// The failure categories a caller can act on, shared by grid construction and pattern loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidDimensions,
    PatternSourceUnavailable,
    UnknownFormat,
    PatternOutOfBounds,
    MalformedRle,
    MalformedHeader,
}
