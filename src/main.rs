use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use ironsight::Classifier;

#[derive(Debug, Parser)]
#[command(
    name = "ironsight",
    about = "Classify a single image file with a pretrained model"
)]
struct CmdArgs {
    /// Path to the model weight file (JSON)
    model: PathBuf,

    /// Path to the image to classify
    image: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = CmdArgs::parse();

    let classifier = Classifier::load(&args.model)?;
    info!("loaded model: {}", classifier.describe());

    let bytes = fs::read(&args.image)?;
    let prediction = classifier.classify(&bytes)?;

    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}
