//! Command-line front end for synthetic raw data generation.
//!
//! Subcommands:
//! 1. **frames:** Write a synthetic frame sequence from an image bank.
//! 2. **sensor:** Write a synthetic 16-bit sensor trace.
//! 3. **check:** Report every missing or malformed bank image.
//! 4. **show / render / animate:** Inspect raw frames as text, PNG or GIF.

use std::error::Error as _;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rawseq::{
    viewer, Config, Direction, ImageBank, Result, SampleConversion, Selection, SensorTrace,
    SequenceGenerator,
};

#[derive(Parser, Debug)]
#[command(
    name = "rawseq",
    author,
    version,
    about = "Synthetic raw frame sequences and sensor traces",
    long_about = "Generate 128x128 8-bit raw frame sequences and 16-bit sensor traces, and inspect raw frames.\n\nAll parameters default to the reference data set; a JSON file given with --config overrides them and flags override the file.\n\nExamples:\n  rawseq frames --bank imageBib --out images --seed 1\n  rawseq sensor --out sensorData.txt\n  rawseq animate images --gif images.gif"
)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a frame sequence.
    Frames(FramesArgs),

    /// Generate a sensor trace.
    Sensor(SensorArgs),

    /// Check that every bank image exists and has the right size.
    Check(CheckArgs),

    /// Print a raw frame as a grid of values.
    Show {
        /// Raw frame file.
        file: PathBuf,
    },

    /// Render a raw frame to PNG.
    Render {
        /// Raw frame file.
        file: PathBuf,

        /// PNG output.
        #[arg(long)]
        png: PathBuf,
    },

    /// Animate a written sequence as a looping GIF.
    Animate(AnimateArgs),
}

#[derive(Args, Debug)]
struct FramesArgs {
    /// Image bank directory.
    #[arg(long)]
    bank: Option<PathBuf>,

    /// Output directory.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Number of frames.
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Seed for background selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Always use the bank image of this direction (left, vertical, right).
    #[arg(long)]
    direction: Option<Direction>,
}

impl FramesArgs {
    /// Overrides the configuration with every flag given.
    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.bank {
            config.bank.dir = dir;
        }
        if let Some(dir) = self.out {
            config.sequence.output_dir = dir;
        }
        if let Some(count) = self.count {
            config.sequence.frame_count = count;
        }
        if self.seed.is_some() {
            config.sequence.seed = self.seed;
        }
        if let Some(direction) = self.direction {
            config.sequence.selection = Selection::Fixed(direction);
        }
    }
}

#[derive(Args, Debug)]
struct SensorArgs {
    /// Output file.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Number of samples.
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Wrap out-of-range samples modulo 2^16 instead of clamping.
    #[arg(long)]
    wrap: bool,
}

impl SensorArgs {
    fn apply(self, config: &mut Config) {
        if let Some(path) = self.out {
            config.sensor.output = path;
        }
        if let Some(count) = self.count {
            config.sensor.sample_count = count;
        }
        if self.seed.is_some() {
            config.sensor.seed = self.seed;
        }
        if self.wrap {
            config.sensor.conversion = SampleConversion::Wrap;
        }
    }
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Image bank directory.
    #[arg(long)]
    bank: Option<PathBuf>,
}

impl CheckArgs {
    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.bank {
            config.bank.dir = dir;
        }
    }
}

#[derive(Args, Debug)]
struct AnimateArgs {
    /// Directory holding the sequence.
    dir: PathBuf,

    /// GIF output.
    #[arg(long)]
    gif: PathBuf,

    /// First frame index to include.
    #[arg(long)]
    first: Option<usize>,

    /// Last frame index to include.
    #[arg(long)]
    last: Option<usize>,

    /// Delay between frames in milliseconds.
    #[arg(long, default_value_t = 100)]
    delay: u32,
}

impl AnimateArgs {
    /// Inclusive index range selected by `--first` / `--last`; open ends are unbounded.
    fn indices(&self) -> Option<RangeInclusive<usize>> {
        match (self.first, self.last) {
            (None, None) => None,
            (first, last) => Some(first.unwrap_or(0)..=last.unwrap_or(usize::MAX)),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{err}");
        let mut source = err.source();
        while let Some(cause) = source {
            error!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::from_json_file(path),
        None => Ok(Config::default()),
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Frames(args) => {
            args.apply(&mut config);
            let bank = ImageBank::load(&config.bank)?;
            let summary = SequenceGenerator::new(&bank, config.sequence)?.write_all()?;
            println!(
                "Wrote {} frames to {}",
                summary.paths.len(),
                summary.output_dir.display()
            );
        }
        Commands::Sensor(args) => {
            args.apply(&mut config);
            let trace = SensorTrace::generate(&config.sensor)?;
            trace.write_to(&config.sensor.output)?;
            println!(
                "Wrote {} samples to {}",
                trace.len(),
                config.sensor.output.display()
            );
        }
        Commands::Check(args) => {
            args.apply(&mut config);
            let problems = ImageBank::check(&config.bank);
            if problems.is_empty() {
                println!(
                    "Bank {} is complete ({} images)",
                    config.bank.dir.display(),
                    config.bank.entries.len()
                );
            } else {
                for problem in &problems {
                    error!("{problem}");
                }
                process::exit(1);
            }
        }
        Commands::Show { file } => {
            let frame = viewer::load_frame(&file)?;
            print!("{}", viewer::format_grid(&frame));
        }
        Commands::Render { file, png } => {
            let frame = viewer::load_frame(&file)?;
            viewer::render_png(&frame, &png)?;
        }
        Commands::Animate(args) => {
            let indices = args.indices();
            config.sequence.output_dir = args.dir;
            let count = viewer::animate_sequence(&config.sequence, indices, &args.gif, args.delay)?;
            info!(frames = count, "animation done");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const FILE_CONFIG: &str = r#"{
        "bank": { "dir": "from-file/bank" },
        "sequence": {
            "output_dir": "from-file/images",
            "frame_count": 7,
            "seed": 3,
            "selection": { "fixed": "left" }
        },
        "sensor": { "output": "from-file/trace", "sample_count": 9, "seed": 4 }
    }"#;

    fn parse(args: &[&str]) -> Commands {
        let mut argv = vec!["rawseq"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    fn file_config() -> Config {
        Config::from_json_str(FILE_CONFIG).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn frames_flags_override_file_values() {
        let mut config = file_config();
        let Commands::Frames(args) = parse(&[
            "frames",
            "--bank",
            "cli/bank",
            "--out",
            "cli/images",
            "-n",
            "12",
            "--seed",
            "99",
            "--direction",
            "right",
        ]) else {
            panic!("expected frames");
        };
        args.apply(&mut config);
        assert_eq!(config.bank.dir, PathBuf::from("cli/bank"));
        assert_eq!(config.sequence.output_dir, PathBuf::from("cli/images"));
        assert_eq!(config.sequence.frame_count, 12);
        assert_eq!(config.sequence.seed, Some(99));
        assert_eq!(config.sequence.selection, Selection::Fixed(Direction::Right));
    }

    #[test]
    fn absent_frames_flags_keep_file_values() {
        let mut config = file_config();
        let Commands::Frames(args) = parse(&["frames"]) else {
            panic!("expected frames");
        };
        args.apply(&mut config);
        assert_eq!(config, file_config());
    }

    #[test]
    fn sensor_flags_override_file_values() {
        let mut config = file_config();
        let Commands::Sensor(args) = parse(&["sensor", "--out", "cli/trace", "--wrap"]) else {
            panic!("expected sensor");
        };
        args.apply(&mut config);
        assert_eq!(config.sensor.output, PathBuf::from("cli/trace"));
        assert_eq!(config.sensor.conversion, SampleConversion::Wrap);
        assert_eq!(config.sensor.sample_count, 9);
        assert_eq!(config.sensor.seed, Some(4));
    }

    #[test]
    fn check_flag_overrides_bank_dir() {
        let mut config = file_config();
        let Commands::Check(args) = parse(&["check", "--bank", "cli/bank"]) else {
            panic!("expected check");
        };
        args.apply(&mut config);
        assert_eq!(config.bank.dir, PathBuf::from("cli/bank"));
    }

    #[test]
    fn global_config_flag_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["rawseq", "sensor", "--config", "run.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("run.json")));
    }

    #[test]
    fn unknown_direction_is_a_parse_error() {
        assert!(Cli::try_parse_from(["rawseq", "frames", "--direction", "up"]).is_err());
    }

    fn animate_indices(args: &[&str]) -> Option<RangeInclusive<usize>> {
        let mut argv = vec!["animate", "images", "--gif", "out.gif"];
        argv.extend_from_slice(args);
        let Commands::Animate(args) = parse(&argv) else {
            panic!("expected animate");
        };
        args.indices()
    }

    #[test]
    fn animate_range_from_first_and_last() {
        assert_eq!(animate_indices(&[]), None);
        assert_eq!(animate_indices(&["--first", "3", "--last", "8"]), Some(3..=8));
        assert_eq!(animate_indices(&["--first", "3"]), Some(3..=usize::MAX));
        assert_eq!(animate_indices(&["--last", "8"]), Some(0..=8));
    }
}
