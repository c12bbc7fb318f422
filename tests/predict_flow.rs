//! End-to-end flow: build a model file, load a classifier from it, and
//! push encoded images through the full pipeline.

use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use rand::Rng;

use ironsight::model::{Activation, DenseLayer, InputKind, ModelMetadata};
use ironsight::{
    Classifier, Matrix, Model, ModelError, PipelineConfig, PipelineError, FASHION_LABELS,
};

fn png_bytes(img: DynamicImage) -> Vec<u8> {
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageOutputFormat::Png)
        .unwrap();
    out
}

/// Zero weights and a single bias spike: the winner is fixed no matter
/// what image comes in, which makes end-to-end assertions exact.
fn spiked_model(input: InputKind, fan_in: usize, classes: usize, winner: usize) -> Model {
    let mut bias_row = vec![0.0; classes];
    bias_row[winner] = 6.0;
    Model {
        layers: vec![DenseLayer {
            weights: Matrix::zeros(fan_in, classes),
            biases: Matrix::from_data(vec![bias_row]),
            activation: Activation::Softmax,
        }],
        metadata: Some(ModelMetadata {
            description: None,
            input_type: Some(input),
            output_labels: None,
        }),
    }
}

fn fashion_model(winner: usize) -> Model {
    spiked_model(
        InputKind::ImageGrayscale {
            width: 28,
            height: 28,
        },
        784,
        10,
        winner,
    )
}

/// Writes the model to a throwaway file so the test goes through the same
/// load path the binaries use.
fn write_model(model: &Model, tag: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "ironsight-test-{}-{}.json",
        tag,
        std::process::id()
    ));
    std::fs::write(&path, serde_json::to_string(model).unwrap()).unwrap();
    path
}

#[test]
fn grayscale_model_classifies_an_upload_from_disk() {
    let path = write_model(&fashion_model(7), "gray");
    let classifier = Classifier::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let upload = png_bytes(DynamicImage::ImageLuma8(GrayImage::from_pixel(
        28,
        28,
        Luma([90u8]),
    )));
    let prediction = classifier.classify(&upload).unwrap();

    assert_eq!(prediction.class_index, 7);
    assert_eq!(prediction.label, "Sneaker");
    assert!(prediction.confidence > 0.9);
}

#[test]
fn rgb_model_resolves_index_labels() {
    // 8x8 RGB, channel-first, 5 classes and no label metadata.
    let model = spiked_model(
        InputKind::ImageRgb {
            width: 8,
            height: 8,
            layout: Default::default(),
        },
        192,
        5,
        2,
    );
    let config = PipelineConfig::from_model(&model).unwrap();
    let classifier = Classifier::new(model, config).unwrap();

    let mut img = RgbImage::new(64, 32);
    for p in img.pixels_mut() {
        *p = Rgb([10, 200, 30]);
    }
    let prediction = classifier
        .classify(&png_bytes(DynamicImage::ImageRgb8(img)))
        .unwrap();

    assert_eq!(prediction.class_index, 2);
    assert_eq!(prediction.label, "2");
}

#[test]
fn noisy_image_still_yields_a_valid_distribution() {
    let model = fashion_model(0);
    let config = PipelineConfig::from_model(&model).unwrap();
    let classifier = Classifier::new(model, config).unwrap();

    let mut rng = rand::thread_rng();
    let noise = GrayImage::from_fn(28, 28, |_, _| Luma([rng.gen::<u8>()]));
    let prediction = classifier
        .classify(&png_bytes(DynamicImage::ImageLuma8(noise)))
        .unwrap();

    assert!(prediction.confidence > 0.0 && prediction.confidence <= 1.0);
    assert!(FASHION_LABELS.contains(&prediction.label.as_str()));
}

#[test]
fn junk_bytes_come_back_as_a_decode_error() {
    let model = fashion_model(0);
    let config = PipelineConfig::from_model(&model).unwrap();
    let classifier = Classifier::new(model, config).unwrap();

    let mut rng = rand::thread_rng();
    let mut junk: Vec<u8> = (0..512).map(|_| rng.gen()).collect();
    // No supported image format starts with a NUL, so the decode always fails.
    junk[0] = 0;
    junk[1] = 0;

    let err = classifier.classify(&junk).unwrap_err();
    assert!(matches!(err, PipelineError::Decode(_)));
}

#[test]
fn corrupt_model_file_is_rejected_at_load() {
    let path = std::env::temp_dir().join(format!(
        "ironsight-test-corrupt-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, b"{\"layers\": [").unwrap();
    let result = Classifier::load(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(ModelError::Json { .. })));
}
