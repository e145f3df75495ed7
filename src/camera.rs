use crate::Coord;
use crate::grid::Grid;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// How far, in pixels, one pan moves the view
const PAN_STEP: Coord = 8;

/// A window onto a [`Grid`], rendered as braille characters. Every character covers a 2x4 block of
/// pixels, and every pixel is one cell.
pub struct Camera {
    /// The cell buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width of the cell buffer, in pixels
    w: usize,

    /// Height of the cell buffer, in pixels
    h: usize,

    /// `x` offset from the grid origin
    x: Coord,

    /// `y` offset from the grid origin
    y: Coord,
}

impl Camera {
    /// A camera covering `cols` by `rows` terminal characters.
    pub fn new(cols: u16, rows: u16) -> Self {
        let (w, h) = (2 * cols as usize, 4 * rows as usize);

        // Each braille character is 3 bytes in UTF-8, and every row but the last ends with a
        // newline.
        let (bw, bh) = (cols as usize, rows as usize);

        Self {
            cb: vec![false; w * h],
            fb: String::with_capacity(3 * (bw * bh) + bh),
            cp: vec![BRAILLE_EMPTY; bw * bh],
            w,
            h,
            x: 0,
            y: 0,
        }
    }

    /// Width in terminal characters
    pub fn cols(&self) -> usize {
        self.w / 2
    }

    /// Height in terminal characters
    pub fn rows(&self) -> usize {
        self.h / 4
    }

    /// Change the view size, keeping the current offset.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (x, y) = (self.x, self.y);

        *self = Self::new(cols, rows);
        self.x = x;
        self.y = y;
    }

    pub fn move_up(&mut self) {
        self.y -= PAN_STEP;
    }

    pub fn move_down(&mut self) {
        self.y += PAN_STEP;
    }

    pub fn move_left(&mut self) {
        self.x -= PAN_STEP;
    }

    pub fn move_right(&mut self) {
        self.x += PAN_STEP;
    }

    pub fn reset_view(&mut self) {
        self.x = 0;
        self.y = 0;
    }

    /// Reset the cell buffer
    pub fn reset(&mut self) {
        self.cb.fill(false);
    }

    /// Copy every live cell of `grid` inside the view into the cell buffer.
    pub fn draw(&mut self, grid: &Grid) {
        for py in 0..self.h {
            for px in 0..self.w {
                let (x, y) = (self.x + px as Coord, self.y + py as Coord);

                if grid.is_alive(x, y) {
                    let i = self.xy_from(px, py);
                    self.cb[i] = true;
                }
            }
        }
    }

    /// Turn the cell buffer into text, one line per row of characters.
    pub fn render(&mut self) -> &str {
        let bw = self.cols();

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            let (x, y) = self.xy_to(n);

            if px {
                self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
            }
        }

        // update framebuffer
        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            self.fb.push(char::from_u32(c).unwrap_or(' '));
        }

        &self.fb
    }

    fn xy_to(&self, n: usize) -> (usize, usize) {
        (n % self.w, n / self.w)
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Camera;
    use crate::grid::Grid;

    #[test]
    fn block_in_one_character() {
        let mut grid = Grid::new(4, 4).unwrap();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            grid.set_cell(x, y, true);
        }

        let mut cam = Camera::new(2, 1);
        cam.draw(&grid);

        assert_eq!(cam.render(), "\u{281B}\u{2800}");
    }

    #[test]
    fn pan_moves_view() {
        let mut grid = Grid::new(16, 16).unwrap();
        grid.set_cell(8, 0, true);

        let mut cam = Camera::new(1, 1);
        cam.draw(&grid);
        assert_eq!(cam.render(), "\u{2800}");

        cam.move_right();
        cam.reset();
        cam.draw(&grid);
        assert_eq!(cam.render(), "\u{2801}");

        cam.reset_view();
        cam.reset();
        cam.draw(&grid);
        assert_eq!(cam.render(), "\u{2800}");
    }

    #[test]
    fn resize_keeps_offset() {
        let mut cam = Camera::new(4, 2);
        cam.move_down();

        cam.resize(10, 5);

        assert_eq!((cam.cols(), cam.rows()), (10, 5));
        assert_eq!(cam.y, 8);
    }
}
