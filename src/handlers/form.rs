//! # Request Body Extraction
//!
//! Create and update endpoints accept JSON objects, urlencoded forms, or multipart
//! bodies (required for logo uploads). [`FormInput`] normalizes all three into
//! [`RawAttributes`] before validation.

use std::collections::HashMap;

use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request},
    http::{StatusCode, header::CONTENT_TYPE},
};
use serde_json::Value;

use crate::error::ApiError;
use crate::storage::UploadedFile;
use crate::validation::RawAttributes;

/// Normalized create/update payload
#[derive(Debug, Clone)]
pub struct FormInput(pub RawAttributes);

impl<S> FromRequest<S> for FormInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_ascii_lowercase());

        match content_type.as_deref() {
            Some(mime) if mime.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state).await?;
                read_multipart(multipart).await.map(FormInput)
            }
            Some(mime) if mime.starts_with("application/x-www-form-urlencoded") => {
                let Form(fields) =
                    Form::<HashMap<String, String>>::from_request(req, state).await?;

                let mut attributes = RawAttributes::new();
                for (key, value) in fields {
                    attributes.insert_text(key, value);
                }
                Ok(FormInput(attributes))
            }
            Some(mime) if mime.starts_with("application/json") || mime.contains("+json") => {
                let Json(body) = Json::<Value>::from_request(req, state).await?;
                RawAttributes::from_json(body).map(FormInput).ok_or_else(|| {
                    ApiError::new(
                        StatusCode::BAD_REQUEST,
                        "BAD_REQUEST",
                        "Request body must be a JSON object",
                    )
                })
            }
            _ => {
                let body = axum::body::Bytes::from_request(req, state).await?;

                if body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(FormInput(RawAttributes::new()));
                }

                Err(ApiError::new(
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "UNSUPPORTED_MEDIA_TYPE",
                    "Expected a JSON, form, or multipart request body",
                ))
            }
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<RawAttributes, ApiError> {
    let mut attributes = RawAttributes::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        if file_name.is_some() {
            let bytes = field.bytes().await?;
            // Browsers send an empty part when the file input is left blank
            if bytes.is_empty() && file_name.as_deref() == Some("") {
                continue;
            }
            attributes.insert_file(
                name,
                UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                },
            );
        } else {
            let text = field.text().await?;
            attributes.insert_text(name, text);
        }
    }

    Ok(attributes)
}
