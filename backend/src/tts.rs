use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct TtsQuery {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_lang() -> String {
    "en".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("upstream returned status {0}")]
    Upstream(u16),
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub async fn tts_handler(
    State(state): State<AppState>,
    Query(q): Query<TtsQuery>,
) -> Result<Response, ApiError> {
    let audio = fetch_speech(&state.http, &state.config.tts_url, &q.text, &q.lang)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, lang = %q.lang, "tts relay failed");
            match e {
                TtsError::Upstream(_) => ApiError::Internal("Failed to fetch TTS".to_string()),
                TtsError::Transport(_) => ApiError::Internal("TTS proxy error".to_string()),
            }
        })?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

/// One upstream round trip per call; no retry, no cache.
pub async fn fetch_speech(
    client: &reqwest::Client,
    url: &str,
    text: &str,
    lang: &str,
) -> Result<Vec<u8>, TtsError> {
    let resp = client
        .get(url)
        .query(&[("text", text), ("lang", lang)])
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(TtsError::Upstream(resp.status().as_u16()));
    }
    Ok(resp.bytes().await?.to_vec())
}
