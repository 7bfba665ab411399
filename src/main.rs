use clap::{Parser, Subcommand};
use passport_photo::background::Background;
use passport_photo::pipeline::{self, PipelineOutcome};
use passport_photo::remover::PhotoInput;
use passport_photo::{config, library, output};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "passport-photo")]
#[command(about = "Make passport photos from ordinary portraits")]
#[command(long_about = "\
Make passport photos from ordinary portraits

Each photo goes through four steps:

  1. the background is removed (rembg)
  2. the picture is cropped around the first detected face
  3. the crop is scaled to cover the canvas and centered
  4. the result is placed on a color or backdrop image and saved as JPEG

Working directories (configurable in passport.toml):

  original/     sample photos, usable by name:  passport-photo make portrait.jpg
  bg/           sample backgrounds:             --background beach.png
  masked/       matted intermediates, one per run and photo

Run 'passport-photo gen-config' to generate a documented passport.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "passport.toml", global = true)]
    config: PathBuf,

    /// Log debug detail to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Produce passport photos from one or more inputs
    Make(MakeArgs),
    /// List sample photos and backgrounds
    List,
    /// Print a stock passport.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct MakeArgs {
    /// Photo paths, sample names from the originals directory, or `-` for stdin
    #[arg(required = true)]
    inputs: Vec<String>,

    /// `#rgb` / `#rrggbb` color, background name, or image path
    #[arg(long, short, default_value = "#ffffff")]
    background: String,

    /// Output JPEG (numbered when several inputs are given)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Skip photos without a face instead of stopping the batch
    #[arg(long)]
    per_item: bool,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

/// JSON summary written by `make --report`.
#[derive(Serialize)]
struct Report {
    status: &'static str,
    inputs: usize,
    outputs: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_face: Option<String>,
}

impl Report {
    fn new(outcome: &PipelineOutcome, inputs: usize) -> Self {
        match outcome {
            PipelineOutcome::Completed(photos) => Self {
                status: "completed",
                inputs,
                outputs: photos.iter().map(|p| p.output.clone()).collect(),
                no_face: None,
            },
            PipelineOutcome::NoFaceDetected { input } => Self {
                status: "no-face",
                inputs,
                outputs: Vec::new(),
                no_face: Some(input.clone()),
            },
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut app_config = config::load_config(&cli.config)?;

    match cli.command {
        Command::Make(args) => {
            if let Some(width) = args.width {
                app_config.canvas.width = width;
            }
            if let Some(height) = args.height {
                app_config.canvas.height = height;
            }
            if args.per_item {
                app_config.batch.policy = pipeline::BatchPolicy::PerItem;
            }
            app_config.validate()?;

            let background =
                Background::parse(&args.background, Path::new(&app_config.paths.backgrounds))?;
            let output_path = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&app_config.output.path));
            let inputs = resolve_inputs(&args.inputs)?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_process_event(&event);
                }
            });
            let outcome =
                pipeline::process(&inputs, &background, &output_path, &app_config, Some(tx))?;
            printer.join().map_err(|_| "progress printer panicked")?;
            output::print_outcome(&outcome, inputs.len());

            if let Some(report_path) = &args.report {
                let json = serde_json::to_string_pretty(&Report::new(&outcome, inputs.len()))?;
                std::fs::write(report_path, json)?;
            }

            if outcome.photos().is_empty() {
                std::process::exit(1);
            }
        }
        Command::List => {
            let originals = Path::new(&app_config.paths.originals);
            let backgrounds = Path::new(&app_config.paths.backgrounds);
            let photo_names = library::list_images(originals)?;
            let background_names = library::list_images(backgrounds)?;
            output::print_listing("Photos", originals, &photo_names);
            println!();
            output::print_listing("Backgrounds", backgrounds, &background_names);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Map command-line inputs to pipeline inputs.
///
/// `-` reads stdin once; an existing path is used directly; anything else
/// names a sample in the originals directory.
fn resolve_inputs(args: &[String]) -> Result<Vec<PhotoInput>, Box<dyn std::error::Error>> {
    let mut stdin_used = false;
    let mut inputs = Vec::with_capacity(args.len());
    for arg in args {
        if arg == "-" {
            if stdin_used {
                return Err("stdin (`-`) can only be given once".into());
            }
            stdin_used = true;
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            inputs.push(PhotoInput::Upload {
                name: "stdin".to_string(),
                bytes,
            });
        } else if Path::new(arg).exists() {
            inputs.push(PhotoInput::Path(PathBuf::from(arg)));
        } else {
            inputs.push(PhotoInput::Stored(arg.clone()));
        }
    }
    Ok(inputs)
}
