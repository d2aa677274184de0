//! The bank of background images, one per drift direction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::frame::Frame;

/// The movement a bank image depicts, which also decides how the patch drifts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Object moving towards smaller columns.
    Left,
    /// Object moving down the frame.
    Vertical,
    /// Object moving towards larger columns.
    Right,
}

impl Direction {
    /// All directions, in bank order.
    pub const ALL: [Direction; 3] = [Direction::Left, Direction::Vertical, Direction::Right];

    /// Per-frame drift of the patch origin as `(dx, dy)`.
    pub fn drift(self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Vertical => (0, 1),
            Direction::Right => (1, 0),
        }
    }

    /// File name the image is stored under in a default bank.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Direction::Left => "left1",
            Direction::Vertical => "vertical",
            Direction::Right => "right1",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Left => "left",
            Direction::Vertical => "vertical",
            Direction::Right => "right",
        })
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "vertical" => Ok(Direction::Vertical),
            "right" => Ok(Direction::Right),
            other => Err(format!(
                "unknown direction `{other}`, expected left, vertical or right"
            )),
        }
    }
}

/// One file of the bank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEntry {
    /// Direction the image is registered under.
    pub direction: Direction,
    /// File name relative to the bank directory.
    pub file: String,
}

/// Where the bank lives and which files it is made of.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// Directory holding the bank files.
    pub dir: PathBuf,
    /// Files to load, in bank order.
    pub entries: Vec<BankEntry>,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("imageBib"),
            entries: Direction::ALL
                .iter()
                .map(|&direction| BankEntry {
                    direction,
                    file: direction.default_file_name().to_owned(),
                })
                .collect(),
        }
    }
}

impl BankConfig {
    fn path_of(&self, entry: &BankEntry) -> PathBuf {
        self.dir.join(&entry.file)
    }
}

/// Background images keyed by direction.
#[derive(Clone, Debug, Default)]
pub struct ImageBank {
    images: Vec<(Direction, Frame)>,
}

impl ImageBank {
    /// Builds a bank from frames already in memory.
    ///
    /// A direction given twice keeps the last frame.
    pub fn from_frames(frames: impl IntoIterator<Item = (Direction, Frame)>) -> Self {
        let mut bank = Self::default();
        for (direction, frame) in frames {
            bank.insert(direction, frame);
        }
        bank
    }

    /// Loads every file named by `config`, stopping at the first problem.
    pub fn load(config: &BankConfig) -> Result<Self> {
        let mut bank = Self::default();
        for entry in &config.entries {
            let path = config.path_of(entry);
            let frame = load_entry(entry.direction, &path)?;
            debug!(direction = %entry.direction, path = %path.display(), "loaded bank image");
            bank.insert(entry.direction, frame);
        }
        info!(images = bank.len(), dir = %config.dir.display(), "image bank ready");
        Ok(bank)
    }

    /// Checks every file named by `config` without keeping the images.
    ///
    /// Returns all problems found; an empty list means [`ImageBank::load`]
    /// will succeed.
    pub fn check(config: &BankConfig) -> Vec<Error> {
        config
            .entries
            .iter()
            .filter_map(|entry| load_entry(entry.direction, &config.path_of(entry)).err())
            .collect()
    }

    fn insert(&mut self, direction: Direction, frame: Frame) {
        match self.images.iter_mut().find(|(d, _)| *d == direction) {
            Some(slot) => slot.1 = frame,
            None => self.images.push((direction, frame)),
        }
    }

    /// Image registered under `direction`.
    pub fn get(&self, direction: Direction) -> Option<&Frame> {
        self.images
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|(_, frame)| frame)
    }

    /// Image at position `index` in bank order.
    pub fn nth(&self, index: usize) -> Option<(Direction, &Frame)> {
        self.images.get(index).map(|(d, frame)| (*d, frame))
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the bank holds no image.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Directions present, in bank order.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.images.iter().map(|(d, _)| *d)
    }
}

fn load_entry(direction: Direction, path: &Path) -> Result<Frame> {
    if !path.is_file() {
        return Err(Error::MissingBankImage {
            direction,
            path: path.to_path_buf(),
        });
    }
    Frame::read_from(path)
}
