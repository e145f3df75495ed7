use std::path::Path;

use gridlife::camera::Camera;
use gridlife::config::Origin;
use gridlife::grid::Grid;
use gridlife::pattern::load_pattern;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let path = args.get(1).map(Path::new).expect("A pattern file is required");

    let mut grid = Grid::new(100, 100)?;
    let info = load_pattern(&mut grid, path, None, Origin::default())?;

    let mut cam = Camera::new(50, 25);
    cam.draw(&grid);

    println!("{}", info.name.as_deref().unwrap_or("(unnamed)"));
    println!("{}", cam.render());

    Ok(())
}
