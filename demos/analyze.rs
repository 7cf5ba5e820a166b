//! Command-line interface for skintone_match
//!
//! Analyzes one photo and prints the result as JSON

use std::{
    env,
    path::{Path, PathBuf},
    process,
    sync::Arc,
};

use skintone_match::{AnalysisConfig, AnalysisError, SkinAnalyzer, StaticCatalog};
use tracing_subscriber::EnvFilter;

struct Options {
    image: PathBuf,
    catalog: Option<PathBuf>,
    config: Option<PathBuf>,
    complete: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    if let Err(err) = run(&options) {
        eprintln!("Error: {}", err);
        eprintln!("{}", err.user_message());
        process::exit(if err.is_input_error() { 2 } else { 1 });
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut image = None;
    let mut catalog = None;
    let mut config = None;
    let mut complete = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" | "--config" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: {} needs a file path", args[i]);
                    process::exit(1);
                };
                if args[i] == "--catalog" {
                    catalog = Some(PathBuf::from(value));
                } else {
                    config = Some(PathBuf::from(value));
                }
                i += 1;
            }
            "--complete" => complete = true,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if image.is_some() {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
                image = Some(PathBuf::from(arg));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(image) = image else {
        print_help(&args[0]);
        process::exit(1);
    };
    Options {
        image,
        catalog,
        config,
        complete,
    }
}

fn run(options: &Options) -> Result<(), AnalysisError> {
    let config = match &options.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    let mut analyzer = SkinAnalyzer::from_config(config)?;
    if let Some(path) = &options.catalog {
        analyzer = analyzer.with_catalog(Arc::new(StaticCatalog::from_json_file(path)?));
    }

    let bytes = read_image(&options.image)?;
    let json = if options.complete {
        serde_json::to_string_pretty(&analyzer.analyze_complete(&bytes)?)
    } else {
        serde_json::to_string_pretty(&analyzer.analyze(&bytes)?)
    }
    .map_err(|e| AnalysisError::processing(format!("failed to serialize result: {}", e)))?;

    println!("{}", json);
    Ok(())
}

fn read_image(path: &Path) -> Result<Vec<u8>, AnalysisError> {
    std::fs::read(path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })
}

fn print_help(program_name: &str) {
    println!("Usage: {} [OPTIONS] <image_path>", program_name);
    println!();
    println!("Classify the skin tone in a face photo and match catalog products");
    println!();
    println!("Arguments:");
    println!("  <image_path>       Path to the photo (JPEG, PNG, HEIC, ...)");
    println!();
    println!("Options:");
    println!("  --catalog <file>   JSON array of catalog products to rank");
    println!("  --config <file>    JSON analysis configuration");
    println!("  --complete         All product groups, descriptors and makeup prompt");
    println!("  -h, --help         Show this help message");
    println!();
    println!("Environment:");
    println!("  SKINTONE_CASCADE_PATH   Haar cascade XML for face detection");
    println!("  RUST_LOG                Log filter (default: info)");
}
