use std::path::Path;

use gridlife::camera::Camera;
use gridlife::config::Origin;
use gridlife::grid::Grid;
use gridlife::pattern::PatternFormat;
use gridlife::pattern::load_pattern_bytes;

fn glider_grid() -> Grid {
    let mut grid = Grid::new(6, 6).unwrap();
    load_pattern_bytes(
        &mut grid,
        b"x = 3, y = 3\nbo$2bo$3o!",
        PatternFormat::Rle,
        Origin { x: 1, y: 1 },
        Path::new("glider.rle"),
    )
    .unwrap();
    grid
}

#[test]
fn glider_text() {
    let grid = glider_grid();

    insta::assert_snapshot!(grid.to_string().trim_end(), @r"
    ......
    ..O...
    ...O..
    .OOO..
    ......
    ......
    ");
}

#[test]
fn glider_text_after_step() {
    let mut grid = glider_grid();
    grid.step();

    insta::assert_snapshot!(grid.to_string().trim_end(), @r"
    ......
    ......
    .O.O..
    ..OO..
    ..O...
    ......
    ");
}

#[test]
fn plaintext_display_reloads() {
    let grid = glider_grid();
    let text = grid.to_string();

    let mut reloaded = Grid::new(6, 6).unwrap();
    load_pattern_bytes(
        &mut reloaded,
        text.as_bytes(),
        PatternFormat::Plaintext,
        Origin::default(),
        Path::new("glider.cells"),
    )
    .unwrap();

    assert_eq!(reloaded, grid);
}

#[test]
fn glider_braille() {
    let grid = glider_grid();
    let mut cam = Camera::new(3, 2);

    cam.draw(&grid);

    // (1, 3) is the bottom right dot of the first character, the rest share the second
    assert_eq!(cam.render(), "\u{2880}\u{28E2}\u{2800}\n\u{2800}\u{2800}\u{2800}");
}
