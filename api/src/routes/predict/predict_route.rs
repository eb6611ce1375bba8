//! POST /predict — classifies one okra leaf photo.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error, instrument, warn};

use crate::core::app_state::LeafState;
use crate::routes::predict::predict_response::{PredictErrorReply, PredictReply};

/// Handler: POST /predict
///
/// Expects `multipart/form-data` with an `image` file field and answers
/// `{"predicted_disease": "...", "confidence": "NN.NN%"}`. Requests without
/// an image part get 400; runtime failures get 500 with the error text.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/predict -F 'image=@leaf.jpg'
/// ```
#[instrument(name = "predict", skip_all)]
pub async fn predict(
    State(state): State<Arc<LeafState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(error = %rejection, "no multipart body");
            return missing_image();
        }
    };

    let upload = match read_image_field(multipart).await {
        Ok(ImageField::Data(bytes)) => bytes,
        Ok(ImageField::Missing) => return missing_image(),
        Ok(ImageField::EmptySelection) => {
            return error_reply(StatusCode::BAD_REQUEST, "No selected file");
        }
        Err(err) => {
            error!(error = %err, "failed to read image upload");
            return error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Prediction failed: {err}"),
            );
        }
    };

    match state.model.predict(&upload).await {
        Ok(prediction) => {
            let body = PredictReply {
                predicted_disease: prediction.label,
                confidence: format!("{:.2}%", prediction.confidence * 100.0),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            error!(error = %err, "model prediction failed");
            error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Prediction failed: {err}"),
            )
        }
    }
}

enum ImageField {
    /// Found an `image` part with a filename; payload bytes inside.
    Data(Vec<u8>),
    /// No `image` part in the form at all.
    Missing,
    /// An `image` part whose filename is empty, i.e. a blank file input.
    EmptySelection,
}

async fn read_image_field(mut multipart: Multipart) -> Result<ImageField, MultipartError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(ImageField::Missing),
            Err(err) => {
                // An unparseable body and a body without an image part look
                // the same to the caller.
                warn!(error = %err, "malformed multipart body");
                return Ok(ImageField::Missing);
            }
        };

        if field.name() != Some("image") {
            continue;
        }
        if field.file_name().unwrap_or_default().is_empty() {
            return Ok(ImageField::EmptySelection);
        }
        return Ok(ImageField::Data(field.bytes().await?.to_vec()));
    }
}

fn missing_image() -> Response {
    error_reply(StatusCode::BAD_REQUEST, "No image file provided")
}

fn error_reply(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(PredictErrorReply {
            error: message.to_string(),
        }),
    )
        .into_response()
}
