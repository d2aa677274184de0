//! Inspection helpers for raw frames: text dumps, PNG renders and GIF animations.

use std::fs::File;
use std::io::BufWriter;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, GrayImage, ImageFormat};
use tracing::{debug, info, warn};

use crate::error::{Error, IoContext, Result};
use crate::frame::{Frame, FRAME_LEN, FRAME_SIDE};
use crate::sequence::{frame_index, SequenceConfig};

/// Loads one raw frame, rejecting files of the wrong size.
pub fn load_frame(path: impl AsRef<Path>) -> Result<Frame> {
    Frame::read_from(path)
}

/// Formats the whole frame as text, one row per line, each value padded to
/// three columns.
pub fn format_grid(frame: &Frame) -> String {
    frame
        .rows()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|value| format!("{value:>3}")).collect();
            cells.join(" ") + "\n"
        })
        .collect()
}

fn to_gray(frame: &Frame) -> Result<GrayImage> {
    let side = FRAME_SIDE as u32;
    GrayImage::from_raw(side, side, frame.as_bytes().to_vec()).ok_or(Error::BufferSize {
        expected: FRAME_LEN,
        actual: frame.as_bytes().len(),
    })
}

/// Saves the frame as an 8-bit grayscale PNG.
pub fn render_png(frame: &Frame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    to_gray(frame)?.save_with_format(path, ImageFormat::Png)?;
    info!(path = %path.display(), "rendered frame");
    Ok(())
}

/// Encodes `frames` as a looping GIF, showing each for `delay_ms` milliseconds.
pub fn animate<'a>(
    frames: impl IntoIterator<Item = &'a Frame>,
    path: impl AsRef<Path>,
    delay_ms: u32,
) -> Result<usize> {
    let path = path.as_ref();
    let writer = BufWriter::new(File::create(path).at(path)?);
    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(Repeat::Infinite)?;
    let delay = Delay::from_numer_denom_ms(delay_ms, 1);
    let mut count = 0;
    for frame in frames {
        let rgba = DynamicImage::ImageLuma8(to_gray(frame)?).to_rgba8();
        encoder.encode_frame(image::Frame::from_parts(rgba, 0, 0, delay))?;
        count += 1;
    }
    if count == 0 {
        warn!(path = %path.display(), "animation written without frames");
    } else {
        info!(frames = count, path = %path.display(), "animation written");
    }
    Ok(count)
}

/// Lists the frame files of a sequence found in `config.output_dir`, sorted by
/// index and optionally restricted to `indices`.
pub fn sequence_paths(
    config: &SequenceConfig,
    indices: Option<RangeInclusive<usize>>,
) -> Result<Vec<PathBuf>> {
    let dir = &config.output_dir;
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).at(dir)? {
        let path = entry.at(dir)?.path();
        let Some(index) = frame_index(config, &path) else {
            continue;
        };
        if indices.as_ref().is_some_and(|range| !range.contains(&index)) {
            continue;
        }
        found.push((index, path));
    }
    found.sort_by_key(|(index, _)| *index);
    debug!(frames = found.len(), dir = %dir.display(), "found sequence frames");
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// Loads and animates a written sequence; returns the number of frames encoded.
///
/// Fails with [`Error::EmptySequence`] before creating `gif` when no frame
/// matches.
pub fn animate_sequence(
    config: &SequenceConfig,
    indices: Option<RangeInclusive<usize>>,
    gif: impl AsRef<Path>,
    delay_ms: u32,
) -> Result<usize> {
    let paths = sequence_paths(config, indices)?;
    if paths.is_empty() {
        return Err(Error::EmptySequence {
            dir: config.output_dir.clone(),
        });
    }
    let frames = paths
        .iter()
        .map(load_frame)
        .collect::<Result<Vec<_>>>()?;
    animate(&frames, gif, delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Patch;

    #[test]
    fn grid_has_one_line_per_row() {
        let grid = format_grid(&Frame::default());
        let lines: Vec<_> = grid.lines().collect();
        assert_eq!(lines.len(), FRAME_SIDE);
        assert_eq!(lines[0], vec!["  0"; FRAME_SIDE].join(" "));
    }

    #[test]
    fn grid_lines_are_fixed_width() {
        let grid = format_grid(&Frame::filled(255));
        assert!(grid.ends_with('\n'));
        assert!(grid.lines().all(|line| line.len() == FRAME_SIDE * 4 - 1));
        assert_eq!(grid.len(), FRAME_LEN * 4);
    }

    #[test]
    fn grid_shows_patch_values() {
        let mut frame = Frame::default();
        frame.fill_patch(Patch::new(1, 2, 1, 1), 255);
        let line = format_grid(&frame).lines().nth(2).unwrap().to_owned();
        assert!(line.starts_with("  0 255   0"));
    }
}
