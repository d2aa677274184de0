//! Synthetic frame sequences: a constant-intensity patch sliding over bank
//! backgrounds.
//!
//! Each frame copies one bank image, draws the patch at the current origin and
//! then moves the origin one pixel along the axis of the image's [`Direction`].
//! The origin is clamped to the frame on every step and the patch is clipped at
//! the right and bottom edges, so no write ever leaves the frame.

use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bank::{Direction, ImageBank};
use crate::error::{Error, IoContext, Result};
use crate::frame::{Frame, Patch, FRAME_SIDE};

/// How the background of each frame is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Uniformly random bank image per frame.
    #[default]
    Random,
    /// Always the image registered under the given direction.
    Fixed(Direction),
}

/// Top-left corner of the patch in the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

/// Parameters of a generated sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Number of frames to produce.
    pub frame_count: usize,
    /// Index of the first frame, used in its file name.
    pub first_index: usize,
    /// Patch origin in the first frame.
    pub start: Origin,
    /// Patch width in pixels.
    pub patch_width: usize,
    /// Patch height in pixels.
    pub patch_height: usize,
    /// Value written over the patch.
    pub intensity: u8,
    /// Background selection.
    pub selection: Selection,
    /// Seed for background selection. Drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Directory the frames are written to.
    pub output_dir: PathBuf,
    /// File name prefix, followed by the frame index.
    pub file_prefix: String,
    /// File extension, without the dot.
    pub file_extension: String,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            frame_count: 100,
            first_index: 1,
            start: Origin { x: 70, y: 21 },
            patch_width: 20,
            patch_height: 20,
            intensity: 128,
            selection: Selection::Random,
            seed: None,
            output_dir: PathBuf::from("images"),
            file_prefix: "img".to_owned(),
            file_extension: "raw".to_owned(),
        }
    }
}

impl SequenceConfig {
    /// Path of the frame with the given index.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}.{}",
            self.file_prefix, index, self.file_extension
        ))
    }
}

/// One frame of a sequence together with how it was made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFrame {
    /// Sequence index, starting at [`SequenceConfig::first_index`].
    pub index: usize,
    /// Direction of the background used.
    pub direction: Direction,
    /// Rectangle actually overwritten, after clipping.
    pub patch: Patch,
    /// The frame itself.
    pub frame: Frame,
}

/// Outcome of [`SequenceGenerator::write_all`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceSummary {
    /// Directory the frames were written to.
    pub output_dir: PathBuf,
    /// Written files, in sequence order.
    pub paths: Vec<PathBuf>,
}

/// Produces the frames of one sequence.
///
/// ```
/// use rawseq::{Direction, Frame, ImageBank, SequenceConfig, SequenceGenerator, Selection};
///
/// let bank = ImageBank::from_frames([(Direction::Right, Frame::default())]);
/// let config = SequenceConfig {
///     frame_count: 3,
///     selection: Selection::Fixed(Direction::Right),
///     ..SequenceConfig::default()
/// };
/// let xs: Vec<usize> = SequenceGenerator::new(&bank, config)?
///     .map(|generated| generated.patch.x)
///     .collect();
/// assert_eq!(xs, [70, 71, 72]);
/// # Ok::<(), rawseq::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct SequenceGenerator<'a> {
    candidates: Vec<(Direction, &'a Frame)>,
    rng: ChaCha20Rng,
    config: SequenceConfig,
    x: usize,
    y: usize,
    produced: usize,
}

impl<'a> SequenceGenerator<'a> {
    /// Constructs a generator seeded from `config.seed`, or from the OS when unset.
    pub fn new(bank: &'a ImageBank, config: SequenceConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self::from_rng(bank, config, rng)
    }

    /// Constructs a generator from an existing RNG source, ignoring `config.seed`.
    pub fn from_rng(bank: &'a ImageBank, config: SequenceConfig, rng: ChaCha20Rng) -> Result<Self> {
        let candidates: Vec<_> = match config.selection {
            Selection::Fixed(direction) => {
                let frame = bank
                    .get(direction)
                    .ok_or(Error::DirectionUnavailable(direction))?;
                vec![(direction, frame)]
            }
            Selection::Random => (0..bank.len()).filter_map(|i| bank.nth(i)).collect(),
        };
        if candidates.is_empty() {
            return Err(Error::EmptyBank);
        }
        if config.frame_count > 0
            && config
                .first_index
                .checked_add(config.frame_count - 1)
                .is_none()
        {
            return Err(Error::IndexOverflow {
                first_index: config.first_index,
                frame_count: config.frame_count,
            });
        }
        let x = config.start.x.min(FRAME_SIDE - 1);
        let y = config.start.y.min(FRAME_SIDE - 1);
        if (x, y) != (config.start.x, config.start.y) {
            warn!(
                x = config.start.x,
                y = config.start.y,
                clamped_x = x,
                clamped_y = y,
                "patch start lies outside the frame, clamped"
            );
        }
        Ok(Self {
            candidates,
            rng,
            config,
            x,
            y,
            produced: 0,
        })
    }

    /// Configuration the generator runs with.
    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Current patch origin as `(x, y)`.
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Produces the next frame, or `None` once `frame_count` frames were made.
    pub fn next_frame(&mut self) -> Option<GeneratedFrame> {
        if self.produced >= self.config.frame_count {
            return None;
        }
        let (direction, background) = self.pick();
        let mut frame = background.clone();
        let patch = frame.fill_patch(
            Patch::new(
                self.x,
                self.y,
                self.config.patch_width,
                self.config.patch_height,
            ),
            self.config.intensity,
        );
        let index = self.config.first_index + self.produced;
        self.produced += 1;
        self.advance(direction);
        Some(GeneratedFrame {
            index,
            direction,
            patch,
            frame,
        })
    }

    /// Generates the remaining frames in memory.
    pub fn generate(&mut self) -> Vec<GeneratedFrame> {
        self.by_ref().collect()
    }

    /// Writes the remaining frames under `config.output_dir`, creating it if needed.
    pub fn write_all(mut self) -> Result<SequenceSummary> {
        let output_dir = self.config.output_dir.clone();
        std::fs::create_dir_all(&output_dir).at(&output_dir)?;
        let mut paths = Vec::with_capacity(self.config.frame_count - self.produced);
        while let Some(generated) = self.next_frame() {
            let path = self.config.frame_path(generated.index);
            generated.frame.write_to(&path)?;
            debug!(
                index = generated.index,
                direction = %generated.direction,
                x = generated.patch.x,
                y = generated.patch.y,
                path = %path.display(),
                "wrote frame"
            );
            paths.push(path);
        }
        info!(frames = paths.len(), dir = %output_dir.display(), "sequence written");
        Ok(SequenceSummary { output_dir, paths })
    }

    fn pick(&mut self) -> (Direction, &'a Frame) {
        let index = match self.config.selection {
            Selection::Fixed(_) => 0,
            Selection::Random => self.rng.gen_range(0..self.candidates.len()),
        };
        self.candidates[index]
    }

    fn advance(&mut self, direction: Direction) {
        let (dx, dy) = direction.drift();
        let x = clamp_axis(self.x as isize + dx);
        let y = clamp_axis(self.y as isize + dy);
        if x as isize != self.x as isize + dx || y as isize != self.y as isize + dy {
            debug!(x, y, %direction, "patch origin held at frame edge");
        }
        self.x = x;
        self.y = y;
    }
}

impl Iterator for SequenceGenerator<'_> {
    type Item = GeneratedFrame;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.config.frame_count - self.produced;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SequenceGenerator<'_> {}

fn clamp_axis(value: isize) -> usize {
    value.clamp(0, FRAME_SIDE as isize - 1) as usize
}

/// Lists the files [`SequenceGenerator::write_all`] would produce for `config`.
///
/// Indices past `usize::MAX` are left out.
pub fn planned_paths(config: &SequenceConfig) -> Vec<PathBuf> {
    (0..config.frame_count)
        .map_while(|offset| config.first_index.checked_add(offset))
        .map(|index| config.frame_path(index))
        .collect()
}

/// Whether `path` looks like a frame of `config` and, if so, its index.
pub fn frame_index(config: &SequenceConfig, path: &Path) -> Option<usize> {
    if path.extension()?.to_str()? != config.file_extension {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix(config.file_prefix.as_str())?
        .parse()
        .ok()
}
