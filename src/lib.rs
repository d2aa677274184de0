#![deny(missing_docs)]
//! # rawseq
//!
//! `rawseq` generates synthetic test input for image and sensor processing:
//! sequences of 128×128 8-bit grayscale raw frames in which a patch slides
//! across a background taken from a small image bank, and flat 16-bit sensor
//! traces drawn from a normal distribution.
//!
//! # Examples
//! ```
//! use rawseq::{Direction, Frame, ImageBank, SequenceConfig, SequenceGenerator};
//!
//! let bank = ImageBank::from_frames(Direction::ALL.map(|d| (d, Frame::default())));
//! let config = SequenceConfig { frame_count: 5, seed: Some(2), ..SequenceConfig::default() };
//! let frames = SequenceGenerator::new(&bank, config)?.generate();
//! assert_eq!(frames.len(), 5);
//! assert!(frames.iter().all(|f| f.frame.as_bytes().len() == rawseq::FRAME_LEN));
//! # Ok::<(), rawseq::Error>(())
//! ```
//!
//! # Crate Features
//! **f32** - Draws sensor samples in f32 instead of the default f64.
//!

pub mod bank;
pub mod config;
mod error;
pub mod frame;
pub mod sensor;
pub mod sequence;
pub mod viewer;

pub use bank::{BankConfig, BankEntry, Direction, ImageBank};
pub use config::Config;
pub use error::{Error, Result};
pub use frame::{Frame, Patch, FRAME_LEN, FRAME_SIDE};
pub use sensor::{SampleConversion, SensorConfig, SensorTrace};
pub use sequence::{
    GeneratedFrame, Origin, Selection, SequenceConfig, SequenceGenerator, SequenceSummary,
};
