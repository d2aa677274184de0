//! 128×128 grayscale frames and the patch rectangles drawn on them.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, IoContext, Result};

/// Side length of a square frame, in pixels.
pub const FRAME_SIDE: usize = 128;
/// Number of bytes in one frame.
pub const FRAME_LEN: usize = FRAME_SIDE * FRAME_SIDE;

/// A 128×128 8-bit grayscale frame stored row-major.
///
/// The buffer always holds exactly [`FRAME_LEN`] bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<u8>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::filled(0)
    }
}

impl Frame {
    /// A frame with every pixel set to `value`.
    pub fn filled(value: u8) -> Self {
        Self {
            pixels: vec![value; FRAME_LEN],
        }
    }

    /// Wraps an owned buffer, rejecting anything that is not one frame long.
    pub fn from_vec(pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != FRAME_LEN {
            return Err(Error::BufferSize {
                expected: FRAME_LEN,
                actual: pixels.len(),
            });
        }
        Ok(Self { pixels })
    }

    /// Reads a flat raw file holding exactly one frame.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pixels = std::fs::read(path).at(path)?;
        if pixels.len() != FRAME_LEN {
            return Err(Error::FrameSize {
                path: path.to_path_buf(),
                expected: FRAME_LEN,
                actual: pixels.len(),
            });
        }
        Ok(Self { pixels })
    }

    /// Writes the frame as a flat raw file, replacing any existing file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path).at(path)?);
        writer.write_all(&self.pixels).at(path)?;
        writer.flush().at(path)
    }

    /// Raw row-major bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the frame, returning its buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel at column `x`, row `y`, or `None` outside the frame.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= FRAME_SIDE || y >= FRAME_SIDE {
            return None;
        }
        Some(self.pixels[y * FRAME_SIDE + x])
    }

    /// Iterates over the rows of the frame, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(FRAME_SIDE)
    }

    /// Overwrites `patch`, clipped to the frame, with `intensity`.
    ///
    /// Returns the rectangle actually written, which is empty when the patch
    /// lies entirely outside the frame.
    pub fn fill_patch(&mut self, patch: Patch, intensity: u8) -> Patch {
        let clipped = patch.clipped();
        for row in clipped.y..clipped.y + clipped.height {
            let start = row * FRAME_SIDE + clipped.x;
            self.pixels[start..start + clipped.width].fill(intensity);
        }
        clipped
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.pixels
    }
}

/// An axis-aligned rectangle in frame coordinates.
///
/// `x` is the column and `y` the row of the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Patch {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Patch {
    /// Creates a patch with its top-left corner at (`x`, `y`).
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersection of the patch with the frame.
    pub fn clipped(self) -> Self {
        let x = self.x.min(FRAME_SIDE);
        let y = self.y.min(FRAME_SIDE);
        Self {
            x,
            y,
            width: self.width.min(FRAME_SIDE - x),
            height: self.height.min(FRAME_SIDE - y),
        }
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether (`x`, `y`) falls inside the patch.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.x..self.x + self.width).contains(&x) && (self.y..self.y + self.height).contains(&y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_rejects_short_buffers() {
        let err = Frame::from_vec(vec![0; FRAME_LEN - 1]).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferSize {
                expected: FRAME_LEN,
                actual
            } if actual == FRAME_LEN - 1
        ));
    }

    #[test]
    fn fill_patch_inside_frame() {
        let mut frame = Frame::default();
        let drawn = frame.fill_patch(Patch::new(70, 21, 20, 20), 128);
        assert_eq!(drawn, Patch::new(70, 21, 20, 20));
        assert_eq!(frame.as_bytes().iter().filter(|&&p| p == 128).count(), 400);
        assert_eq!(frame.get(70, 21), Some(128));
        assert_eq!(frame.get(89, 40), Some(128));
        assert_eq!(frame.get(90, 40), Some(0));
        assert_eq!(frame.get(89, 41), Some(0));
    }

    #[test]
    fn fill_patch_shrinks_at_right_and_bottom_edges() {
        let mut frame = Frame::default();
        let drawn = frame.fill_patch(Patch::new(120, 125, 20, 20), 255);
        assert_eq!(drawn, Patch::new(120, 125, 8, 3));
        assert_eq!(frame.as_bytes().iter().filter(|&&p| p == 255).count(), 24);
    }

    #[test]
    fn fill_patch_outside_frame_writes_nothing() {
        let mut frame = Frame::filled(7);
        let drawn = frame.fill_patch(Patch::new(FRAME_SIDE, 0, 10, 10), 0);
        assert_eq!(drawn.area(), 0);
        assert_eq!(frame, Frame::filled(7));
    }

    #[test]
    fn rows_cover_whole_frame() {
        let frame = Frame::filled(3);
        assert_eq!(frame.rows().count(), FRAME_SIDE);
        assert!(frame.rows().all(|row| row.len() == FRAME_SIDE));
    }

    #[test]
    fn get_outside_is_none() {
        let frame = Frame::default();
        assert_eq!(frame.get(FRAME_SIDE, 0), None);
        assert_eq!(frame.get(0, FRAME_SIDE), None);
    }
}
