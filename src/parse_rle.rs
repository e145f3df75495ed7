use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::Coord;
use crate::parse_util;
use crate::parse_util::ConvertError;

/// Rulestrings that all mean Conway's Game of Life.
const LIFE_RULES: [&str; 3] = ["B3/S23", "S23/B3", "23/3"];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RleFile<'a> {
    pub name: Option<&'a [u8]>,
    pub author: Option<&'a [u8]>,
    pub comments: Vec<&'a [u8]>,

    /// Pattern width, as declared by the header line
    pub width: Option<u32>,

    /// Pattern height, as declared by the header line
    pub height: Option<u32>,

    pub rule: Option<&'a [u8]>,
}

#[derive(Debug, Error)]
pub enum RleError {
    #[error("Header error: {0}")]
    Header(#[from] RleHeaderError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] RleEncodingError),

    #[error("Cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: Coord, y: Coord },
}

/// Parse the RLE file format, writing every cell through `f` relative to `(ox, oy)`.
///
/// `f` receives grid coordinates and whether the cell is alive, and returns `false` if it could
/// not store the cell. Cells written before a failure are left in place.
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle<F>(bytes: &[u8], ox: Coord, oy: Coord, f: F) -> Result<RleFile<'_>, RleError>
where
    F: FnMut(Coord, Coord, bool) -> bool,
{
    let mut file = RleFile::default();

    let (content, first_line) = skip_header(bytes, &mut file)?;

    read_encoding(content, first_line, ox, oy, f)?;

    Ok(file)
}

/// Reads header lines until the first line that isn't one. Returns the input starting at that
/// line, and its 1-based line number.
fn skip_header<'a>(
    mut bytes: &'a [u8],
    file: &mut RleFile<'a>,
) -> Result<(&'a [u8], usize), RleHeaderError> {
    let mut line_no = 1;

    loop {
        let Some((line, rest)) = parse_util::take_line(bytes) else {
            return Err(RleHeaderError::NoContent { lines: line_no - 1 });
        };

        let line = parse_util::take_ws(line);

        if let Some(comment) = line.strip_prefix(b"#") {
            read_line_comment(comment, file);
        } else if let Some(fields) = header_fields(line) {
            if let Err(e) = read_line_header(fields, file) {
                warn!("Ignoring malformed RLE header on line {line_no}: {e}");
            }
        } else {
            // `bytes` still starts at this line
            return Ok((bytes, line_no));
        }

        bytes = rest;
        line_no += 1;
    }
}

/// `Some` if `line` is an `x = ..` header line.
fn header_fields(line: &[u8]) -> Option<&[u8]> {
    let rest = parse_util::strip_keyword(b"x", line)?;

    rest.starts_with(b"=").then_some(line)
}

fn read_line_comment<'a>(comment: &'a [u8], file: &mut RleFile<'a>) {
    let (Some(b), rest) = parse_util::take_1(comment) else {
        warn!("Ignoring RLE comment line without a type");
        return;
    };
    let text = parse_util::take_ws(rest);

    match b {
        b'C' | b'c' => file.comments.push(text),

        // Pattern name
        b'N' => {
            if file.name.is_some() {
                warn!("RLE file name already defined. Using latest");
            }
            debug!(name = %parse_util::show(text), "RLE pattern name");

            file.name = Some(text);
        }

        // Pattern author
        b'O' => {
            if file.author.is_some() {
                warn!("RLE author already defined. Using latest");
            }
            debug!(author = %parse_util::show(text), "RLE pattern author");

            file.author = Some(text);
        }

        // Pattern rules, as in `#r 23/3`
        b'r' => check_rule(text, file),

        b => warn!("Ignoring RLE comment line of type '{}'", b as char),
    }
}

#[derive(Debug, Error)]
pub enum RleHeaderError {
    #[error("No pattern content after {lines} header line(s)")]
    NoContent { lines: usize },

    #[error("Invalid header field \"{field}\"")]
    InvalidField { field: String },

    #[error("Invalid value for '{key}': {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: ConvertError,
    },
}

/// Parses `x = <w>, y = <h>[, rule = <r>]` into `file`.
fn read_line_header<'a>(line: &'a [u8], file: &mut RleFile<'a>) -> Result<(), RleHeaderError> {
    for field in line.split(|&b| b == b',') {
        let Some(eq) = field.iter().position(|&b| b == b'=') else {
            return Err(RleHeaderError::InvalidField {
                field: parse_util::show(field),
            });
        };
        let key = field[..eq].trim_ascii();
        let value = field[eq + 1..].trim_ascii();

        let dimension = |value: &[u8]| {
            parse_util::convert::<u32>(value).map_err(|source| RleHeaderError::InvalidValue {
                key: parse_util::show(key),
                source,
            })
        };

        match key {
            b"x" => file.width = Some(dimension(value)?),
            b"y" => file.height = Some(dimension(value)?),
            b"rule" => check_rule(value, file),
            _ => {
                return Err(RleHeaderError::InvalidField {
                    field: parse_util::show(field),
                });
            }
        }
    }

    debug!(width = ?file.width, height = ?file.height, "RLE header");

    Ok(())
}

fn check_rule<'a>(rule: &'a [u8], file: &mut RleFile<'a>) {
    let upper = parse_util::show(rule).to_ascii_uppercase();

    if !LIFE_RULES.contains(&upper.as_str()) {
        warn!("Pattern declares rule \"{upper}\", but it will be simulated as B3/S23");
    }

    file.rule = Some(rule);
}

#[derive(Debug, Error)]
pub enum RleEncodingError {
    #[error("Failed to convert run length on line {line}, column {col}: {source}")]
    RunLength {
        line: usize,
        col: usize,
        #[source]
        source: ConvertError,
    },

    #[error("Unexpected tag '{got}' on line {line}, column {col}, expected 'b', 'o' or '$'")]
    UnexpectedTag { got: char, line: usize, col: usize },
}

/// What the content lexer expects next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LexState {
    /// Accumulating the digits of a run count
    ReadingNumber,

    /// Expecting `b`, `o` or `$`
    ReadingTag,
}

fn read_encoding<F>(
    bytes: &[u8],
    first_line: usize,
    ox: Coord,
    oy: Coord,
    mut f: F,
) -> Result<(), RleError>
where
    F: FnMut(Coord, Coord, bool) -> bool,
{
    let mut input = bytes.iter().copied();

    let mut state = LexState::ReadingNumber;

    // The byte that ended a run count, re-read as a tag
    let mut pending: Option<u8> = None;

    let mut digits = Vec::new();
    let mut count: u32 = 1;

    let (mut x, mut y): (Coord, Coord) = (0, 0);
    let (mut line, mut col) = (first_line, 0);

    loop {
        let b = match pending.take() {
            Some(b) => b,
            None => {
                let Some(b) = input.next() else { break };

                if b == b'\n' {
                    line += 1;
                    col = 0;
                } else {
                    col += 1;
                }

                b
            }
        };

        // End of pattern
        if b == b'!' {
            break;
        }

        if parse_util::is_ws(b) {
            continue;
        }

        match state {
            LexState::ReadingNumber if b.is_ascii_digit() => digits.push(b),

            LexState::ReadingNumber => {
                if !digits.is_empty() {
                    count = parse_util::convert(&digits)
                        .map_err(|source| RleEncodingError::RunLength { line, col, source })?;
                    digits.clear();
                }

                pending = Some(b);
                state = LexState::ReadingTag;
            }

            LexState::ReadingTag => {
                match b {
                    b'b' | b'o' => {
                        for _ in 0..count {
                            let pos = ox.checked_add(x).zip(oy.checked_add(y));
                            if !pos.is_some_and(|(gx, gy)| f(gx, gy, b == b'o')) {
                                return Err(RleError::OutOfBounds {
                                    x: ox.saturating_add(x),
                                    y: oy.saturating_add(y),
                                });
                            }

                            x += 1;
                        }
                    }

                    // End of line
                    b'$' => {
                        y = y.saturating_add(count.into());
                        x = 0;
                    }

                    got => {
                        let got = got as char;
                        return Err(RleEncodingError::UnexpectedTag { got, line, col }.into());
                    }
                }

                count = 1;
                state = LexState::ReadingNumber;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::RleEncodingError;
    use super::RleError;
    use super::RleHeaderError;
    use super::read_rle;
    use crate::Coord;

    fn live_cells(bytes: &[u8]) -> Result<Vec<(Coord, Coord)>, RleError> {
        let mut live = Vec::new();

        read_rle(bytes, 0, 0, |x, y, alive| {
            if alive {
                live.push((x, y));
            }
            true
        })?;

        Ok(live)
    }

    #[test]
    fn runs_and_lines() {
        let live = live_cells(b"2o$bo$3o!").unwrap();

        assert_eq!(live, vec![(0, 0), (1, 0), (1, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn dead_cells_are_written() {
        let mut dead = Vec::new();

        read_rle(b"2bo!", 3, 4, |x, y, alive| {
            if !alive {
                dead.push((x, y));
            }
            true
        })
        .unwrap();

        assert_eq!(dead, vec![(3, 4), (4, 4)]);
    }

    #[test]
    fn multi_line_skip() {
        let live = live_cells(b"o3$o!").unwrap();

        assert_eq!(live, vec![(0, 0), (0, 3)]);
    }

    #[test]
    fn whitespace_is_ignored() {
        let live = live_cells(b"1 2o\r\n\tb o!").unwrap();

        assert_eq!(live.len(), 13);
        assert_eq!(live.last(), Some(&(13, 0)));
    }

    #[test]
    fn bang_ends_pattern() {
        let live = live_cells(b"o!this is ignored").unwrap();

        assert_eq!(live, vec![(0, 0)]);
    }

    #[test]
    fn end_of_input_ends_pattern() {
        let live = live_cells(b"bo$o").unwrap();

        assert_eq!(live, vec![(1, 0), (0, 1)]);
    }

    #[test]
    fn header_is_skipped() {
        let bytes = b"#N Glider\n#O Richard K. Guy\n#C The smallest spaceship\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n";
        let mut live = 0;

        let file = read_rle(bytes, 0, 0, |_, _, alive| {
            live += alive as usize;
            true
        })
        .unwrap();

        assert_eq!(live, 5);
        assert_eq!(file.name, Some(&b"Glider"[..]));
        assert_eq!(file.author, Some(&b"Richard K. Guy"[..]));
        assert_eq!(file.comments, vec![&b"The smallest spaceship"[..]]);
        assert_eq!((file.width, file.height), (Some(3), Some(3)));
        assert_eq!(file.rule, Some(&b"B3/S23"[..]));
    }

    #[test]
    fn malformed_header_is_not_fatal() {
        let live = live_cells(b"x = three, y = 1\n3o!").unwrap();

        assert_eq!(live.len(), 3);
    }

    #[test]
    fn header_without_content() {
        let res = live_cells(b"#C nothing here\nx = 0, y = 0\n");

        assert!(matches!(
            res,
            Err(RleError::Header(RleHeaderError::NoContent { lines: 2 }))
        ));
    }

    #[test]
    fn empty_input() {
        let res = live_cells(b"");

        assert!(matches!(
            res,
            Err(RleError::Header(RleHeaderError::NoContent { lines: 0 }))
        ));
    }

    #[test]
    fn unexpected_tag() {
        let res = live_cells(b"x = 2, y = 1\n2o$\n3q!");

        assert!(matches!(
            res,
            Err(RleError::Encoding(RleEncodingError::UnexpectedTag {
                got: 'q',
                line: 3,
                col: 2
            }))
        ));
    }

    #[test]
    fn run_length_overflow() {
        let res = live_cells(b"99999999999o!");

        assert!(matches!(
            res,
            Err(RleError::Encoding(RleEncodingError::RunLength { .. }))
        ));
    }

    #[test]
    fn sink_failure_is_out_of_bounds() {
        let res = read_rle(b"5o!", 0, 0, |x, _, _| x < 3);

        assert!(matches!(res, Err(RleError::OutOfBounds { x: 3, y: 0 })));
    }

    #[test]
    fn origin_at_coordinate_limit() {
        let res = read_rle(b"$o!", 0, Coord::MAX, |_, _, _| true);

        assert!(matches!(
            res,
            Err(RleError::OutOfBounds { x: 0, y: Coord::MAX })
        ));

        let mut writes = 0;
        let res = read_rle(b"3o!", Coord::MAX, 0, |_, _, _| {
            writes += 1;
            true
        });

        assert!(matches!(
            res,
            Err(RleError::OutOfBounds { x: Coord::MAX, y: 0 })
        ));
        assert_eq!(writes, 1);
    }
}
