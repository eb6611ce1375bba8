//! POST /chat — one conversational turn, text and/or leaf photo.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use tracing::{debug, error, instrument};

use plant_doctor::{ChatTurn, ImageUpload};

use crate::core::app_state::ChatState;
use crate::routes::chat::chat_response::ChatReply;

/// Shown when the request itself could not be read. Still HTTP 200: the web
/// client renders whatever sits in `response` as a bot bubble, so transport
/// status codes would only hide the message.
pub const REQUEST_APOLOGY: &str = "An error occurred. Please try again.";

/// Handler: POST /chat
///
/// Accepts `multipart/form-data` with optional `message`, `image`, and
/// `session` fields and always answers `{"response": "..."}` with status
/// 200. A request without a multipart body is treated as an empty message.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5001/chat \
///   -F 'message=my okra leaves have white powder on them' \
///   -F 'session=garden-tab-1'
/// ```
#[instrument(name = "chat", skip_all)]
pub async fn chat(
    State(state): State<Arc<ChatState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<ChatReply> {
    let form = match multipart {
        Ok(multipart) => match read_chat_form(multipart).await {
            Ok(form) => form,
            Err(err) => {
                error!(error = %err, "unreadable chat form, answering with apology");
                return Json(ChatReply {
                    response: REQUEST_APOLOGY.to_string(),
                });
            }
        },
        Err(rejection) => {
            debug!(error = %rejection, "no multipart body, treating as empty message");
            ChatForm::default()
        }
    };

    let response = state
        .resolver
        .resolve(ChatTurn {
            session: form.session,
            text: form.message,
            image: form.image,
        })
        .await;

    Json(ChatReply { response })
}

#[derive(Default)]
struct ChatForm {
    message: String,
    session: Option<String>,
    image: Option<ImageUpload>,
}

async fn read_chat_form(mut multipart: Multipart) -> Result<ChatForm, MultipartError> {
    let mut form = ChatForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "message" => form.message = field.text().await?.trim().to_string(),
            "session" => {
                let value = field.text().await?.trim().to_string();
                if !value.is_empty() {
                    form.session = Some(value);
                }
            }
            "image" => {
                // A file input left empty still submits a part, with an
                // empty filename. That counts as "no image".
                let filename = field.file_name().unwrap_or_default().to_string();
                if filename.is_empty() {
                    continue;
                }
                let bytes = field.bytes().await?.to_vec();
                form.image = Some(ImageUpload { bytes, filename });
            }
            _ => {}
        }
    }
    Ok(form)
}
