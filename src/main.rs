use clap::{Args, Parser, Subcommand};
use image_intake::{ImageIntake, ImageSource, IntakeConfig, PipelineResult, SaveOptions, SaveReport};
use image_intake::{config, naming, output};
use log::LevelFilter;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

/// The image input shared by `check` and `save`.
#[derive(Args, Clone)]
struct InputArgs {
    /// Image file to ingest
    file: PathBuf,

    /// Treat FILE as a trusted local file: skip [limits], never store an origin
    #[arg(long)]
    trusted: bool,
}

#[derive(Args, Clone)]
struct SaveArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output filename for every written file (default: the input's name)
    #[arg(long)]
    filename: Option<String>,

    /// Output format, e.g. png or jpg (default: from the filename extension)
    #[arg(long)]
    format: Option<String>,

    /// Do not store the full-size original
    #[arg(long)]
    no_origin: bool,

    /// Print the result and report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
#[command(name = "image-intake")]
#[command(about = "Validate an image and write its resized and cropped variants")]
#[command(long_about = "\
Validate an image and write its resized and cropped variants

Without --trusted the file is read into memory and handled as an upload:
the [limits] section applies and the original is stored under [origin].

Each [dimensions.<name>] table describes one variant:

  crop   scale to cover the box, then center-crop to exactly fill it
  scale  keep the aspect ratio; set one axis and leave the other 0

Exit status: 0 on success, 1 when the image is rejected or a write fails,
2 when the config or input file cannot be read.

Run 'image-intake gen-config' to generate a documented intake.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = empty config)
    #[arg(long, default_value = "intake.toml", global = true)]
    config: PathBuf,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate an image against the configured limits
    Check(InputArgs),
    /// Validate an image, then write the origin and every variant
    Save(SaveArgs),
    /// Print a stock intake.toml with all options documented
    GenConfig,
}

/// JSON shape printed by `save --json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: PipelineResult,
    report: Option<&'a SaveReport>,
}

const EXIT_REJECTED: u8 = 1;
const EXIT_UNREADABLE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(EXIT_UNREADABLE)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(input) => {
            let config = IntakeConfig::load_or_default(&cli.config)?;
            let mut intake = ImageIntake::new(config, Some(read_source(&input)?));

            if intake.validate().is_err() {
                output::print_failure(&intake.result());
                return Ok(ExitCode::from(EXIT_REJECTED));
            }
            let dimensions = intake.probe_dimensions()?;
            output::print_check_output(
                intake.filename().unwrap_or_default(),
                input.trusted,
                dimensions,
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Save(args) => {
            let config = IntakeConfig::load_or_default(&cli.config)?;
            let mut intake = ImageIntake::new(config, Some(read_source(&args.input)?));

            let mut options = SaveOptions::new();
            options.filename = args.filename;
            options.format = args.format;
            options.save_origin = !args.no_origin;

            let outcome = intake.save(&options);
            if args.json {
                let json = JsonReport {
                    result: intake.result(),
                    report: outcome.as_ref().ok(),
                };
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else {
                match &outcome {
                    Ok(report) => {
                        output::print_save_output(intake.filename().unwrap_or_default(), report)
                    }
                    Err(_) => output::print_failure(&intake.result()),
                }
            }

            Ok(if outcome.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_REJECTED)
            })
        }
    }
}

/// Trusted inputs stay on disk; everything else is read and handled as an
/// upload named after the file.
fn read_source(input: &InputArgs) -> std::io::Result<ImageSource> {
    if input.trusted {
        return Ok(ImageSource::from_path(&input.file));
    }
    let bytes = std::fs::read(&input.file)?;
    let name = naming::file_name_of(&input.file)
        .unwrap_or_else(|| input.file.to_string_lossy().into_owned());
    Ok(ImageSource::from_buffer(bytes, name))
}
