use crate::Coord;
use crate::grid::Grid;

/// Blank braille pattern, U+2800. Each raised dot adds its bit from [`DOTS`].
const BRAILLE_EMPTY: u32 = 0x2800;

/// Bit of each dot in a 2x4 braille cell, indexed by `[row][column]`.
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
const DOTS: [[u32; 2]; 4] = [[0x1, 0x8], [0x2, 0x10], [0x4, 0x20], [0x40, 0x80]];

/// Renders a [`Grid`] as braille text, one dot per cell.
///
/// The camera looks at a `w × h` window of the board whose top left corner sits at `(y, x)`.
/// Since the board wraps, any offset is valid and panning never runs off an edge.
pub struct Camera {
    /// The frame buffer.
    fb: String,

    /// One codepoint per braille character, row-major
    cp: Vec<u32>,

    /// Width of the view, in cells
    w: usize,

    /// Height of the view, in cells
    h: usize,

    /// Column of the board shown in the leftmost column
    x: Coord,

    /// Row of the board shown in the top row
    y: Coord,
}

impl Camera {
    pub fn new(w: usize, h: usize) -> Self {
        let mut cam = Self {
            fb: String::new(),
            cp: Vec::new(),
            w: 0,
            h: 0,
            x: 0,
            y: 0,
        };

        cam.resize(w, h);
        cam
    }

    /// A camera exactly as large as `grid`.
    pub fn fit(grid: &Grid) -> Self {
        Self::new(grid.size(), grid.size())
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        // Each braille character takes 3 bytes of UTF-8 and each line one more for the newline.
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));

        self.cp = vec![BRAILLE_EMPTY; bw * bh];
        self.fb = String::with_capacity(3 * (bw * bh) + bh);
        self.w = w;
        self.h = h;
    }

    pub fn offset_x(&mut self, offset: Coord) {
        self.x += offset;
    }

    pub fn offset_y(&mut self, offset: Coord) {
        self.y += offset;
    }

    pub fn reset_view(&mut self) {
        self.x = 0;
        self.y = 0;
    }

    /// Blank every braille character.
    fn clear(&mut self) {
        self.cp.fill(BRAILLE_EMPTY);
    }

    /// Raise a dot for every live cell in the visible window of `grid`, replacing the last frame.
    pub fn draw(&mut self, grid: &Grid) {
        let bw = self.w.div_ceil(2);
        self.clear();

        for row in 0..self.h {
            for col in 0..self.w {
                if grid.is_alive(self.y + row as Coord, self.x + col as Coord) {
                    self.cp[(row / 4) * bw + col / 2] |= DOTS[row % 4][col % 2];
                }
            }
        }
    }

    /// The last drawn frame, one line of braille per four rows of cells.
    pub fn render(&mut self) -> &str {
        let bw = self.w.div_ceil(2);
        self.fb.clear();

        for line in self.cp.chunks(bw.max(1)) {
            // every codepoint is U+2800 plus at most 0xFF
            self.fb.extend(
                line.iter()
                    .map(|&c| char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER)),
            );
            self.fb.push('\n');
        }

        &self.fb
    }
}
