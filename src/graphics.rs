pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;
pub const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// The 64x32 monochrome display of the `Chip8`.
///
/// Sprites are XORed into the grid with per-pixel wraparound on both axes.
/// The buffer is only ever cleared by the clear-screen instruction.
#[derive(Clone, Copy)]
pub struct GraphicsBuffer {
    vram: [bool; PIXEL_COUNT],
}

impl Default for GraphicsBuffer {
    fn default() -> Self {
        Self {
            vram: [false; PIXEL_COUNT],
        }
    }
}

impl GraphicsBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws one 8-pixel sprite row at the given coordinates.
    /// Returns whether a previously set pixel was cleared.
    pub fn draw_byte(&mut self, x: usize, y: usize, data: u8) -> bool {
        let row = y % HEIGHT;
        let mut collision = false;
        for b in 0..8 {
            if data & (0x80 >> b) == 0 {
                continue;
            }
            let pos = row * WIDTH + (x + b) % WIDTH;
            collision |= self.vram[pos];
            self.vram[pos] ^= true;
        }
        collision
    }

    /// The current pixel grid, for the rendering collaborator.
    pub fn snapshot(&self) -> &[bool; PIXEL_COUNT] {
        &self.vram
    }

    /// Whether the pixel at `(x, y)` is set.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.vram[(y % HEIGHT) * WIDTH + x % WIDTH]
    }

    /// Clear the whole grid.
    #[inline]
    pub fn clear(&mut self) {
        self.vram = [false; PIXEL_COUNT];
    }
}
