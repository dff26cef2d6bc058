//! Text cells: the unit the view composes into and a screen compositor
//! consumes.

use std::io::{self, Write};

use super::color::Color;

/// One character cell with colors and attribute bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextCell {
    /// A one-character-wide UTF-8 grapheme. Supports combining
    /// characters, non-latin unicode, etc.
    pub character: &'static str,
    pub foreground: Color,
    pub background: Color,
    pub attributes: u8,
}

impl TextCell {
    pub const BOLD: u8 = 1 << 0;
    pub const UNDERLINE: u8 = 1 << 1;
}

impl Default for TextCell {
    fn default() -> Self {
        Self {
            character: "\u{1FBC4}", // 🯄, conspicuous when a cell is missed
            foreground: Color::WHITE,
            background: Color::BLACK,
            attributes: 0,
        }
    }
}

/// Row-major grid of text cells.
pub struct TextCellGrid {
    width: usize,
    height: usize,
    cells: Vec<TextCell>,
}

impl TextCellGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![TextCell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> &TextCell {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) out of bounds");
        &self.cells[y * self.width + x]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut TextCell {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) out of bounds");
        &mut self.cells[y * self.width + x]
    }

    /// Compose the grid as escape-sequenced text, one line per row,
    /// attributes reset after every cell.
    pub fn write_ansi(&self, out: &mut impl Write) -> io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.get(x, y);
                if cell.attributes & TextCell::BOLD != 0 {
                    out.write_all(b"\x1b[1m")?;
                }
                if cell.attributes & TextCell::UNDERLINE != 0 {
                    out.write_all(b"\x1b[4m")?;
                }
                write!(
                    out,
                    "{}{}{}\x1b[0m",
                    cell.foreground.fg(),
                    cell.background.bg(),
                    cell.character
                )?;
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}
