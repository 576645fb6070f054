//! Image Classification Example
//!
//! Loads a MobileNet ONNX model with its label file and prints the top-1
//! class for each input image.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example classify_image -- [OPTIONS] --topology <FILE> --labels <FILE> <IMAGES>...
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=debug cargo run --example classify_image -- \
//!     -t models/mobilenet.onnx -w models/mobilenet.onnx.data \
//!     -l models/synset_words.txt cat.jpg dog.jpg
//! ```

mod image_loader;

use clap::Parser;
use oar_classify::core::config::{OrtExecutionProvider, OrtSessionConfig};
use oar_classify::prelude::*;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "classify_image")]
#[command(about = "Image Classification Example - prints the top-1 label per image")]
struct Args {
    /// Path to the ONNX graph
    #[arg(short, long)]
    topology: PathBuf,

    /// Path to the external weights file, if the graph has one
    #[arg(short, long)]
    weights: Option<PathBuf>,

    /// Path to the newline-delimited label file
    #[arg(short, long)]
    labels: PathBuf,

    /// Optional JSON file overriding classifier settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device to use for inference ('cpu', 'cuda', 'cuda:N')
    #[arg(long, default_value = "cpu")]
    device: String,

    /// Paths to input images
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn parse_device(device: &str) -> Result<Vec<OrtExecutionProvider>, Box<dyn std::error::Error>> {
    let device = device.to_lowercase();
    let device_id = match device.as_str() {
        "cpu" => return Ok(vec![OrtExecutionProvider::CPU]),
        "cuda" => 0,
        other => match other.strip_prefix("cuda:") {
            Some(id) => id.parse()?,
            None => {
                return Err(
                    format!("Unsupported device: {device}. Supported devices: cpu, cuda, cuda:N")
                        .into(),
                );
            }
        },
    };
    if cfg!(feature = "cuda") {
        Ok(vec![
            OrtExecutionProvider::CUDA {
                device_id: Some(device_id),
            },
            OrtExecutionProvider::CPU,
        ])
    } else {
        warn!("CUDA requested but cuda feature not enabled. Falling back to CPU.");
        Ok(vec![OrtExecutionProvider::CPU])
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ClassifierConfig::from_json_file(path)?,
        None => ClassifierConfig::default(),
    };
    let mut session = OrtSessionConfig::new();
    for provider in parse_device(&args.device)? {
        session = session.add_execution_provider(provider);
    }
    config = config.with_ort_session(session);

    let store = ModelStore::from_paths(&args.topology, args.weights.as_deref(), &args.labels)?;
    let input_size = config.input_size;
    let mut classifier =
        MobileNetClassifier::from_store(OrtRuntime::new(&config), store, config)?;
    info!("Loaded {} labels", classifier.labels().len());

    for path in &args.images {
        let image = match image_loader::load_rgba_square(path, input_size) {
            Ok(image) => image,
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                continue;
            }
        };
        match classifier.classify(&RgbaImageSource::new(&image)) {
            Ok(result) => println!("{}: {}", path.display(), result),
            Err(e) => error!("Classification failed for {}: {}", path.display(), e),
        }
    }

    Ok(())
}
