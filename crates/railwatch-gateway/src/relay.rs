// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streaming relay of an uploaded image to the inference engine.
//!
//! The inbound `image` field is never buffered whole. Its chunks are pumped
//! through a bounded channel that backs the outbound multipart body, and the
//! pump and the outbound request are driven together on the handler task.

use std::io;

use axum::body::Bytes;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use futures::{stream, Stream};
use railwatch_upstream::InferenceClient;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::{GatewayError, GatewayResult, ANALYZE_IMAGE, FILE_UPLOAD_ERROR, NO_IMAGE};

/// Inbound form field carrying the upload.
pub const IMAGE_FIELD: &str = "image";
/// Outbound form field the inference engine expects.
pub const UPSTREAM_FIELD: &str = "file";

/// Chunks in flight between the inbound reader and the outbound body.
const CHANNEL_DEPTH: usize = 8;

type Chunk = Result<Bytes, io::Error>;

/// Find the `image` file in `multipart` and relay it to the inference engine.
///
/// Fields before it are skipped. No upstream call is made unless a named
/// file is found.
pub async fn relay_image(
    inference: &InferenceClient,
    mut multipart: Multipart,
) -> GatewayResult<Value> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        match image_file_name(&field) {
            Some(file_name) => return forward(inference, field, file_name).await,
            None => debug!(field = ?field.name(), "skipping multipart field"),
        }
    }
    Err(GatewayError::client_input(
        NO_IMAGE,
        format!("expected a file in form field `{IMAGE_FIELD}`"),
    ))
}

/// File name of `field` if it is the upload, `None` for anything else.
fn image_file_name(field: &Field<'_>) -> Option<String> {
    if field.name() != Some(IMAGE_FIELD) {
        return None;
    }
    field.file_name().map(str::to_owned)
}

async fn forward(
    inference: &InferenceClient,
    field: Field<'_>,
    file_name: String,
) -> GatewayResult<Value> {
    let content_type = field.content_type().map(str::to_owned);
    let (tx, rx) = mpsc::channel::<Chunk>(CHANNEL_DEPTH);

    let part = Part::stream(channel_body(rx)).file_name(file_name.clone());
    let part = match content_type.as_deref() {
        Some(mime) => part
            .mime_str(mime)
            .map_err(|e| GatewayError::client_input(FILE_UPLOAD_ERROR, e.to_string()))?,
        None => part,
    };
    let form = Form::new().part(UPSTREAM_FIELD, part);

    info!(file_name = %file_name, content_type = ?content_type, "relaying image upload");
    let (pumped, analyzed) = tokio::join!(pump(field, tx), inference.analyze_image(form));

    // A broken upload explains any upstream failure it caused.
    let bytes = pumped.map_err(upload_error)?;
    let analysis = analyzed.map_err(|e| GatewayError::from_upstream(ANALYZE_IMAGE, e))?;
    debug!(file_name = %file_name, bytes, "image relayed");
    Ok(analysis)
}

/// Outbound body fed by the pump.
fn channel_body(rx: mpsc::Receiver<Chunk>) -> Body {
    Body::wrap_stream(chunk_stream(rx))
}

fn chunk_stream(rx: mpsc::Receiver<Chunk>) -> impl Stream<Item = Chunk> + Send + 'static {
    stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (chunk, rx))
    })
}

/// Copy chunks from the inbound field into the channel until either side ends.
///
/// Returns the number of bytes handed to the outbound body. A read error is
/// forwarded into the body first so the outbound request aborts instead of
/// sending a truncated file.
async fn pump(mut field: Field<'_>, tx: mpsc::Sender<Chunk>) -> Result<u64, MultipartError> {
    let mut sent = 0u64;
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                let len = chunk.len() as u64;
                if tx.send(Ok(chunk)).await.is_err() {
                    // Upstream request already finished; nothing left to feed.
                    debug!(sent, "outbound body closed before upload ended");
                    return Ok(sent);
                }
                sent += len;
            }
            Ok(None) => return Ok(sent),
            Err(err) => {
                let _ = tx.send(Err(io::Error::other(err.body_text()))).await;
                return Err(err);
            }
        }
    }
}

fn upload_error(err: MultipartError) -> GatewayError {
    GatewayError::client_input(FILE_UPLOAD_ERROR, err.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn channel_body_yields_chunks_in_order() {
        let (tx, rx) = mpsc::channel::<Chunk>(CHANNEL_DEPTH);
        let mut chunks = Box::pin(chunk_stream(rx));

        tx.send(Ok(Bytes::from_static(b"abc"))).await.unwrap();
        tx.send(Ok(Bytes::from_static(b"def"))).await.unwrap();
        drop(tx);

        let mut collected = Vec::new();
        while let Some(chunk) = chunks.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(collected, b"abcdef");
    }

    #[tokio::test]
    async fn chunk_stream_surfaces_read_errors() {
        let (tx, rx) = mpsc::channel::<Chunk>(CHANNEL_DEPTH);
        let mut chunks = Box::pin(chunk_stream(rx));

        tx.send(Ok(Bytes::from_static(b"abc"))).await.unwrap();
        tx.send(Err(io::Error::other("stream ended early"))).await.unwrap();
        drop(tx);

        assert!(chunks.next().await.unwrap().is_ok());
        assert!(chunks.next().await.unwrap().is_err());
        assert!(chunks.next().await.is_none());
    }
}
