//! Route handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use carepath::{ConsultState, ConsultationGraph, GeoPoint, MediaHandle};

use crate::error::ServerError;
use crate::uploads::{remove_uploads, sanitize_file_name, save_upload};

/// Shared by every request. Graphs are compiled once at startup and run concurrently.
pub struct AppState {
    pub consultation: ConsultationGraph,
    pub hospitals: ConsultationGraph,
    pub upload_dir: PathBuf,
    /// Directory synthesized replies are written to and served from.
    pub output_dir: PathBuf,
    pub run_timeout: Duration,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub speech_to_text: String,
    pub response_text: String,
    /// `/download/<file>` for the spoken reply, empty when there is none.
    pub voice_url: String,
}

pub(crate) async fn root() -> &'static str {
    "carepath backend is running."
}

#[derive(Default)]
struct ProcessForm {
    state: ConsultState,
    latitude: Option<f64>,
    longitude: Option<f64>,
    hospitals: bool,
}

fn parse_coordinate(name: &str, value: &str) -> Result<Option<f64>, ServerError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ServerError::BadRequest(format!("{} is not a number: {}", name, value)))
}

/// Parses the form. Every saved upload is pushed to `saved`, also when a later field fails.
async fn read_form(
    state: &AppState,
    mut multipart: Multipart,
    saved: &mut Vec<PathBuf>,
) -> Result<ProcessForm, ServerError> {
    let mut form = ProcessForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" | "image" => {
                let original = field.file_name().unwrap_or(&name).to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(e.to_string()))?;
                if bytes.is_empty() {
                    continue;
                }
                let path = save_upload(&state.upload_dir, &original, &bytes).await?;
                saved.push(path.clone());
                let handle = Some(MediaHandle::new(path));
                if name == "audio" {
                    form.state.audio_input = handle;
                } else {
                    form.state.image_input = handle;
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(e.to_string()))?;
                match name.as_str() {
                    "query_text" => form.state.query_text = Some(value),
                    "latitude" => form.latitude = parse_coordinate("latitude", &value)?,
                    "longitude" => form.longitude = parse_coordinate("longitude", &value)?,
                    "mode" => form.hospitals = value.trim().eq_ignore_ascii_case("hospitals"),
                    other => tracing::debug!(field = other, "ignoring form field"),
                }
            }
        }
    }
    if let (Some(lat), Some(lng)) = (form.latitude, form.longitude) {
        form.state.location = Some(GeoPoint::new(lat, lng));
    }
    Ok(form)
}

fn voice_url(audio: Option<&MediaHandle>) -> String {
    audio
        .and_then(MediaHandle::file_name)
        .map(|name| format!("/download/{}", name))
        .unwrap_or_default()
}

pub(crate) async fn process(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>, ServerError> {
    let mut saved = Vec::new();
    let result = consult(&state, multipart, &mut saved).await;
    remove_uploads(&saved).await;
    result
}

async fn consult(
    state: &AppState,
    multipart: Multipart,
    saved: &mut Vec<PathBuf>,
) -> Result<Json<ProcessResponse>, ServerError> {
    let form = read_form(state, multipart, saved).await?;
    let graph = if form.hospitals {
        &state.hospitals
    } else {
        &state.consultation
    };
    tracing::info!(
        workflow = graph.workflow().name(),
        has_audio = form.state.audio_input.is_some(),
        has_image = form.state.image_input.is_some(),
        "processing request"
    );
    let done = tokio::time::timeout(state.run_timeout, graph.run(form.state))
        .await
        .map_err(|_| ServerError::Timeout(state.run_timeout.as_secs()))??;
    Ok(Json(ProcessResponse {
        speech_to_text: done.transcribed_text.clone().unwrap_or_default(),
        response_text: done.response_text.clone().unwrap_or_default(),
        voice_url: voice_url(done.response_audio.as_ref()),
    }))
}

pub(crate) async fn download(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    if filename.is_empty() || sanitize_file_name(&filename) != filename {
        return Err(ServerError::BadRequest(format!("invalid file name: {}", filename)));
    }
    let path = state.output_dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ServerError::NotFound("File not found".to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    };
    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    ))
}
