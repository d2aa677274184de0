use std::path::PathBuf;

use thiserror::Error;

use crate::bank::Direction;

/// Errors produced while loading, generating or writing raw data.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing `path` failed.
    #[error("I/O error on {}", .path.display())]
    Io {
        /// File the operation was performed on.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A bank image required by the generator does not exist.
    #[error("bank image for {direction} is missing: {}", .path.display())]
    MissingBankImage {
        /// Direction the image was registered under.
        direction: Direction,
        /// Expected location of the image.
        path: PathBuf,
    },

    /// The bank holds no image to draw backgrounds from.
    #[error("image bank is empty")]
    EmptyBank,

    /// A fixed selection names a direction the bank does not hold.
    #[error("image bank has no image for {0}")]
    DirectionUnavailable(Direction),

    /// The frame indices of a sequence run past `usize::MAX`.
    #[error("frames {first_index}.. ({frame_count} frames) overflow the index range")]
    IndexOverflow {
        /// Configured first index.
        first_index: usize,
        /// Configured number of frames.
        frame_count: usize,
    },

    /// A sequence directory holds no frame to animate.
    #[error("no sequence frames found in {}", .dir.display())]
    EmptySequence {
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// A raw frame file does not hold exactly one frame.
    #[error("{} holds {actual} bytes, expected {expected}", .path.display())]
    FrameSize {
        /// Offending file.
        path: PathBuf,
        /// Required length in bytes.
        expected: usize,
        /// Length found on disk.
        actual: usize,
    },

    /// An in-memory buffer does not hold exactly one frame.
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// Required length in bytes.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },

    /// A sensor trace file is not a whole number of 16-bit samples.
    #[error("{} holds {len} bytes, not a whole number of u16 samples", .path.display())]
    TraceSize {
        /// Offending file.
        path: PathBuf,
        /// Length found on disk.
        len: usize,
    },

    /// The sensor distribution parameters are unusable.
    #[error("invalid normal distribution (mean {mean}, std_dev {std_dev})")]
    Distribution {
        /// Requested mean.
        mean: f64,
        /// Requested standard deviation.
        std_dev: f64,
    },

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Encoding a rendered image or animation failed.
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Attaches a path to an [`std::io::Error`].
pub(crate) trait IoContext<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
