use std::io::{Cursor, Read};

use log::{error, warn};
use serde::Serialize;
use tiny_http::{Request, Response};

use ironsight::{Classifier, PipelineError};

use crate::multipart::{extract_boundary, first_file};
use crate::routes::{error_response, json_response};

/// Uploads larger than this are refused outright.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Wire shape of a successful prediction.
#[derive(Debug, Serialize)]
struct PredictResponse {
    predicted_class: String,
    confidence: f64,
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_home(classifier: &Classifier) -> Response<Cursor<Vec<u8>>> {
    let message = format!(
        "ironsight is serving a classifier ({}). POST an image file to /predict.",
        classifier.describe()
    );
    json_response(200, serde_json::json!({ "message": message }).to_string())
}

// ---------------------------------------------------------------------------
// GET /labels
// ---------------------------------------------------------------------------

pub fn handle_labels(classifier: &Classifier) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({
        "classes": classifier.labels().len(),
        "labels": classifier.labels(),
    });
    json_response(200, body.to_string())
}

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

pub fn handle_predict(request: &mut Request, classifier: &Classifier) -> Response<Cursor<Vec<u8>>> {
    let content_type = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    if !content_type.starts_with("multipart/form-data") {
        return error_response(400, "expected a multipart/form-data upload");
    }
    let boundary = match extract_boundary(&content_type) {
        Some(b) => b,
        None => return error_response(400, "multipart content type is missing its boundary"),
    };

    // Refuse oversized uploads before reading them; the read itself is
    // capped too, for requests that lie about (or omit) their length.
    if let Some(declared) = request.body_length() {
        if declared > MAX_UPLOAD_BYTES {
            warn!("refused {declared} byte upload");
            return error_response(413, "upload is larger than the 10 MiB limit");
        }
    }
    let mut body: Vec<u8> = Vec::new();
    let capped = (MAX_UPLOAD_BYTES + 1) as u64;
    if request.as_reader().take(capped).read_to_end(&mut body).is_err() {
        return error_response(400, "could not read request body");
    }
    if body.len() > MAX_UPLOAD_BYTES {
        warn!("refused oversized chunked upload");
        return error_response(413, "upload is larger than the 10 MiB limit");
    }

    let image = match first_file(&body, &boundary) {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return error_response(400, "no image file was uploaded"),
    };

    match classifier.classify(image) {
        Ok(prediction) => {
            let reply = PredictResponse {
                predicted_class: prediction.label,
                confidence: prediction.confidence,
            };
            match serde_json::to_string(&reply) {
                Ok(json) => json_response(200, json),
                Err(_) => error_response(500, "could not encode response"),
            }
        }
        // The uploader's fault is a 400, ours is a 500.
        Err(err @ PipelineError::Decode(_)) => {
            warn!("rejected upload: {err}");
            error_response(400, &err.to_string())
        }
        Err(err) => {
            error!("inference failure: {err}");
            error_response(500, &err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ironsight::model::{Activation, DenseLayer, InputKind, ModelMetadata};
    use ironsight::{Matrix, Model, PipelineConfig};
    use tiny_http::{Header, Method, StatusCode, TestRequest};

    const BOUNDARY: &str = "HandlerTestBoundary";

    /// A 1x1 24-bit BMP. Every byte is ASCII, so the image survives the
    /// `&str` body that `TestRequest` carries.
    const ONE_PIXEL_BMP: &str = "BM\x3a\x00\x00\x00\x00\x00\x00\x00\x36\x00\x00\x00\
        \x28\x00\x00\x00\x01\x00\x00\x00\x01\x00\x00\x00\x01\x00\x18\x00\
        \x00\x00\x00\x00\x04\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
        \x00\x00\x00\x00\x00\x00\x00\x00\x40\x40\x40\x00";

    /// 784 -> 10 softmax model whose scores come entirely from the bias row.
    fn classifier_with_biases(bias_row: Vec<f64>) -> Classifier {
        let model = Model {
            layers: vec![DenseLayer {
                weights: Matrix::zeros(784, 10),
                biases: Matrix::from_data(vec![bias_row]),
                activation: Activation::Softmax,
            }],
            metadata: Some(ModelMetadata {
                description: None,
                input_type: Some(InputKind::ImageGrayscale {
                    width: 28,
                    height: 28,
                }),
                output_labels: None,
            }),
        };
        let config = PipelineConfig::from_model(&model).unwrap();
        Classifier::new(model, config).unwrap()
    }

    fn fashion_classifier() -> Classifier {
        let mut bias_row = vec![0.0; 10];
        bias_row[3] = 4.0;
        classifier_with_biases(bias_row)
    }

    fn file_upload_body(payload: &str) -> String {
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"upload.bmp\"\r\n\
             \r\n\
             {payload}\r\n\
             --{BOUNDARY}--\r\n"
        )
    }

    fn predict_request(content_type: &str, body: String) -> Request {
        TestRequest::new()
            .with_method(Method::Post)
            .with_path("/predict")
            .with_header(Header::from_bytes(b"Content-Type", content_type.as_bytes()).unwrap())
            .with_body(Box::leak(body.into_boxed_str()))
            .into()
    }

    fn multipart_request(body: String) -> Request {
        predict_request(&format!("multipart/form-data; boundary={BOUNDARY}"), body)
    }

    #[test]
    fn predict_response_uses_the_published_keys() {
        let reply = PredictResponse {
            predicted_class: "Sneaker".to_string(),
            confidence: 0.87,
        };
        let json = serde_json::to_value(&reply).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(json["predicted_class"], "Sneaker");
        assert!((json["confidence"].as_f64().unwrap() - 0.87).abs() < 1e-12);
    }

    #[test]
    fn non_multipart_upload_is_a_bad_request() {
        let clf = fashion_classifier();
        let mut request = predict_request("application/json", "{}".to_string());
        let response = handle_predict(&mut request, &clf);
        assert_eq!(response.status_code(), StatusCode(400));
    }

    #[test]
    fn boundaryless_content_type_is_a_bad_request() {
        let clf = fashion_classifier();
        let mut request = predict_request("multipart/form-data", "irrelevant".to_string());
        let response = handle_predict(&mut request, &clf);
        assert_eq!(response.status_code(), StatusCode(400));
    }

    #[test]
    fn upload_without_a_file_part_is_a_bad_request() {
        let clf = fashion_classifier();
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\
             \r\n\
             just text\r\n\
             --{BOUNDARY}--\r\n"
        );
        let mut request = multipart_request(body);
        let response = handle_predict(&mut request, &clf);
        assert_eq!(response.status_code(), StatusCode(400));
    }

    #[test]
    fn undecodable_file_part_is_a_bad_request() {
        let clf = fashion_classifier();
        let mut request = multipart_request(file_upload_body("not an image at all"));
        let response = handle_predict(&mut request, &clf);
        assert_eq!(response.status_code(), StatusCode(400));
    }

    #[test]
    fn oversized_upload_is_refused_with_413() {
        let clf = fashion_classifier();
        let mut request = multipart_request("a".repeat(MAX_UPLOAD_BYTES + 1));
        let response = handle_predict(&mut request, &clf);
        assert_eq!(response.status_code(), StatusCode(413));
    }

    #[test]
    fn inference_failure_maps_to_a_server_error() {
        let clf = classifier_with_biases(vec![f64::NAN; 10]);
        let mut request = multipart_request(file_upload_body(ONE_PIXEL_BMP));
        let response = handle_predict(&mut request, &clf);
        assert_eq!(response.status_code(), StatusCode(500));
    }

    #[test]
    fn decodable_upload_comes_back_as_json_with_200() {
        let clf = fashion_classifier();
        let mut request = multipart_request(file_upload_body(ONE_PIXEL_BMP));
        let response = handle_predict(&mut request, &clf);
        assert_eq!(response.status_code(), StatusCode(200));

        let content_type = response
            .headers()
            .iter()
            .find(|h| h.field.equiv("Content-Type"))
            .map(|h| h.value.as_str().to_owned());
        assert_eq!(content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn home_and_labels_answer_200() {
        let clf = fashion_classifier();
        assert_eq!(handle_home(&clf).status_code(), StatusCode(200));
        assert_eq!(handle_labels(&clf).status_code(), StatusCode(200));
    }
}
