use std::ops::Index;

/// One cell of the paint buffer: 8-bit RGB.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uniform gray.
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Pack into the window's pixel format (0x00RRGGBB).
    #[inline]
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Fill colour after a clear (10 % gray).
pub const BACKGROUND: Rgb = Rgb::gray(0x1A);

/// Colour stamped under the pointer.
pub const MARK: Rgb = Rgb::new(0xFF, 0x00, 0x00);

/// Fixed-size W×H grid of colours, row-major.
///
/// * Row `0` is the **bottom** edge of the paint plane (world y = 0).
/// * Allocated once; [`clear`](Self::clear) and [`paint`](Self::paint)
///   mutate in place and never reallocate.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintBuffer {
    width: usize,
    height: usize,
    cells: Vec<Rgb>,
}

impl PaintBuffer {
    /// Allocate a `width × height` buffer already cleared to [`BACKGROUND`].
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BACKGROUND; width * height],
        }
    }

    /// Reset every cell to [`BACKGROUND`].
    pub fn clear(&mut self) {
        self.cells.fill(BACKGROUND);
    }

    /// Overwrite cell `(x, y)` with `color`.
    ///
    /// Out-of-range coordinates are ignored. Returns `true` when a cell was
    /// written.
    pub fn paint(&mut self, x: i32, y: i32, color: Rgb) -> bool {
        match self.offset(x, y) {
            Some(idx) => {
                self.cells[idx] = color;
                true
            }
            None => false,
        }
    }

    /// Bounds-checked read.
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.offset(x, y).map(|idx| self.cells[idx])
    }

    /// Read-only view of all cells, row-major, bottom row first.
    pub fn cells(&self) -> &[Rgb] {
        &self.cells
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl Index<(usize, usize)> for PaintBuffer {
    type Output = Rgb;
    fn index(&self, (x, y): (usize, usize)) -> &Rgb {
        &self.cells[y * self.width + x]
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
