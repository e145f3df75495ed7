use thiserror::Error;
use tracing::debug;

use crate::Coord;
use crate::parse_util;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlaintextFile<'a> {
    pub name: Option<&'a [u8]>,
    pub comments: Vec<&'a [u8]>,

    /// Longest row
    pub width: usize,

    /// Number of rows
    pub height: usize,
}

#[derive(Debug, Error)]
pub enum PlaintextError {
    #[error("Cell ({x}, {y}) of pattern row {row} is outside the grid")]
    OutOfBounds { x: Coord, y: Coord, row: usize },
}

/// Parse the Plaintext file format, writing every cell through `f` relative to `(ox, oy)`.
///
/// `f` receives grid coordinates and whether the cell is alive, and returns `false` if it could
/// not store the cell. Cells written before a failure are left in place.
///
/// See: https://conwaylife.com/wiki/Plaintext
pub fn read_plaintext<F>(
    bytes: &[u8],
    ox: Coord,
    oy: Coord,
    mut f: F,
) -> Result<PlaintextFile<'_>, PlaintextError>
where
    F: FnMut(Coord, Coord, bool) -> bool,
{
    let mut file = PlaintextFile::default();
    let mut row = 0;

    for line in parse_util::lines(bytes) {
        if let Some(comment) = line.strip_prefix(b"!") {
            read_comment(comment, &mut file);
            continue;
        }

        for (col, &b) in line.iter().enumerate() {
            let (dx, dy) = (col as Coord, row as Coord);

            // A cell past the end of the coordinate space is as out of bounds as any other
            let pos = ox.checked_add(dx).zip(oy.checked_add(dy));
            if !pos.is_some_and(|(x, y)| f(x, y, b == b'O')) {
                return Err(PlaintextError::OutOfBounds {
                    x: ox.saturating_add(dx),
                    y: oy.saturating_add(dy),
                    row,
                });
            }
        }

        file.width = file.width.max(line.len());
        row += 1;
    }

    file.height = row;

    Ok(file)
}

fn read_comment<'a>(comment: &'a [u8], file: &mut PlaintextFile<'a>) {
    if let Some(name) = parse_util::strip_keyword(b"Name:", comment) {
        debug!(name = %parse_util::show(name), "Plaintext pattern name");
        file.name = Some(name);
    } else {
        file.comments.push(comment);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::PlaintextError;
    use super::read_plaintext;
    use crate::Coord;

    fn sink(max: Coord) -> (HashMap<(Coord, Coord), bool>, impl Fn(Coord, Coord) -> bool) {
        (HashMap::new(), move |x, y| x < max && y < max)
    }

    #[test]
    fn comments_do_not_advance_rows() {
        let (mut cells, fits) = sink(10);

        let file = read_plaintext(b"!Name: Glider\n!\n.O\n..O\nOOO\n", 0, 0, |x, y, alive| {
            cells.insert((x, y), alive);
            fits(x, y)
        })
        .unwrap();

        assert_eq!(file.name, Some(&b"Glider"[..]));
        assert_eq!(file.comments, vec![&b""[..]]);
        assert_eq!((file.width, file.height), (3, 3));
        assert_eq!(cells.get(&(1, 0)), Some(&true));
        assert_eq!(cells.get(&(0, 0)), Some(&false));
        assert_eq!(cells.values().filter(|&&a| a).count(), 5);
    }

    #[test]
    fn origin_offset() {
        let mut live = Vec::new();

        read_plaintext(b"O\n.O", 4, 7, |x, y, alive| {
            if alive {
                live.push((x, y));
            }
            true
        })
        .unwrap();

        assert_eq!(live, vec![(4, 7), (5, 8)]);
    }

    #[test]
    fn any_other_byte_is_dead() {
        let mut live = 0;

        read_plaintext(b"*.xoO", 0, 0, |_, _, alive| {
            live += alive as usize;
            true
        })
        .unwrap();

        assert_eq!(live, 1);
    }

    #[test]
    fn out_of_bounds_aborts() {
        let (_, fits) = sink(2);
        let mut writes = 0;

        let res = read_plaintext(b"OO\nOOO\nOO", 0, 0, |x, y, _| {
            writes += 1;
            fits(x, y)
        });

        assert!(matches!(
            res,
            Err(PlaintextError::OutOfBounds { x: 2, y: 1, row: 1 })
        ));
        assert_eq!(writes, 5);
    }

    #[test]
    fn origin_at_coordinate_limit() {
        let mut writes = Vec::new();

        let res = read_plaintext(b"O\nO", 0, Coord::MAX, |x, y, _| {
            writes.push((x, y));
            true
        });

        assert!(matches!(
            res,
            Err(PlaintextError::OutOfBounds { x: 0, y: Coord::MAX, row: 1 })
        ));
        assert_eq!(writes, vec![(0, Coord::MAX)]);

        let res = read_plaintext(b"OO", Coord::MAX, 0, |_, _, _| true);

        assert!(matches!(
            res,
            Err(PlaintextError::OutOfBounds { x: Coord::MAX, y: 0, row: 0 })
        ));
    }
}
