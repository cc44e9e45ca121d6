//! Command-line front end.
//!
//!   leafscan diagnose leaf.jpg
//!   leafscan diagnose leaf.jpg --json
//!   leafscan labels
//!   leafscan scaffold-model --out models/plant_disease.json
//!
//! For the browser front end run the `studio` binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use leafscan::labels::{display_name, LabelSet};
use leafscan::preprocess::{TENSOR_HEIGHT, TENSOR_SHAPE, TENSOR_WIDTH};
use leafscan::{
    ActivationFunction, DiagnosisPipeline, InputType, ModelMetadata, Network, NetworkClassifier,
    TreatmentCatalog, UploadedImage,
};

#[derive(Parser, Debug)]
#[command(name = "leafscan")]
#[command(version)]
#[command(about = "Diagnose plant leaf diseases from a photograph")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Diagnose a single jpg/jpeg/png leaf image
    Diagnose {
        /// Image to classify
        image: PathBuf,

        /// Model artifact (JSON network)
        #[arg(short, long, env = "LEAFSCAN_MODEL", default_value = "models/plant_disease.json")]
        model: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the class labels and their treatment advice
    Labels,

    /// Write a randomly initialised model with the right input and output shape
    ScaffoldModel {
        /// Destination file
        #[arg(short, long, default_value = "models/plant_disease.json")]
        out: PathBuf,

        /// RNG seed for the weights
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    leafscan::logging::init_logging(cli.verbose)?;

    match cli.command {
        Command::Diagnose { image, model, json } => diagnose(image, model, json),
        Command::Labels => {
            print_labels();
            Ok(())
        }
        Command::ScaffoldModel { out, seed } => scaffold_model(out, seed),
    }
}

fn diagnose(image: PathBuf, model: PathBuf, json: bool) -> Result<()> {
    let classifier = NetworkClassifier::load(&model)
        .with_context(|| format!("loading model {}", model.display()))?;
    let pipeline = DiagnosisPipeline::plant_disease(classifier)?;

    let upload = UploadedImage::from_path(&image)
        .with_context(|| format!("reading {}", image.display()))?;
    let result = pipeline.diagnose(&upload)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result);
    }
    Ok(())
}

fn print_labels() {
    let catalog = TreatmentCatalog::plant_disease();
    for (i, label) in LabelSet::plant_disease().iter().enumerate() {
        println!("[{}] {:<26} {}", i, label, display_name(label));
        println!("    {}", catalog.get(label));
    }
    println!("Fallback: {}", catalog.fallback());
}

fn scaffold_model(out: PathBuf, seed: u64) -> Result<()> {
    let labels = LabelSet::plant_disease();
    let inputs: usize = TENSOR_SHAPE.iter().product();
    let mut rng = StdRng::seed_from_u64(seed);

    let network = Network::new(vec![(labels.len(), inputs, ActivationFunction::Softmax)], &mut rng)
        .with_metadata(ModelMetadata {
            description: Some(format!("Untrained scaffold (seed {})", seed)),
            input_type: Some(InputType::ImageRgb {
                width: TENSOR_WIDTH as u32,
                height: TENSOR_HEIGHT as u32,
            }),
            output_labels: Some(labels.iter().map(str::to_owned).collect()),
        });

    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    network.save_json(&out)?;
    info!(path = %out.display(), inputs, outputs = labels.len(), "wrote scaffold model");
    Ok(())
}
