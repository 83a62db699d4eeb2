//! HTTP client for the search/download backend.
//!
//! Two endpoints: `POST /search` takes a urlencoded `query` field and answers
//! JSON, `POST /download` takes multipart `url` + `format` fields and answers
//! the file bytes. The search endpoint reports failure through an `error`
//! field in the body regardless of HTTP status; the download endpoint uses a
//! non-2xx status with an optional JSON error body.

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, multipart};
use serde::Deserialize;

use crate::constants::constants;
use crate::disposition;
use crate::download::DownloadFormat;

/// A single entry from the search response. Absent fields arrive as zeroes
/// or empty strings; the formatters render those as "N/A".
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
  pub title: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub uploader: String,
  #[serde(default)]
  pub duration: String,
  #[serde(default)]
  pub view_count: Option<u64>,
  /// `YYYYMMDD`, when the backend knows it.
  #[serde(default)]
  pub upload_date: Option<String>,
  #[serde(default)]
  pub filesize_approx: Option<u64>,
  pub url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
  #[serde(default)]
  results: Vec<SearchResult>,
  #[serde(default)]
  error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  #[serde(default)]
  error: Option<String>,
}

/// The downloaded file before it touches disk.
#[derive(Debug)]
pub struct DownloadPayload {
  pub file_name: String,
  pub bytes: Vec<u8>,
}

/// Interpret a search response body: an `error` field is a failure with that
/// message, anything else is the result list.
fn parse_search_body(body: &str) -> Result<Vec<SearchResult>> {
  let parsed: SearchResponse = serde_json::from_str(body).context("search response is not valid JSON")?;
  if let Some(message) = parsed.error {
    return Err(anyhow!(message));
  }
  Ok(parsed.results)
}

/// Failure message for a non-2xx download response: the body's `error` field
/// when it parses, the generic fallback otherwise.
fn download_error_message(body: &str) -> String {
  serde_json::from_str::<ErrorBody>(body).ok().and_then(|b| b.error).unwrap_or_else(|| "Download failed".to_string())
}

pub async fn search(client: &Client, server: &str, query: &str) -> Result<Vec<SearchResult>> {
  let endpoint = format!("{}{}", server, constants().search_path);
  let response =
    client.post(&endpoint).form(&[("query", query)]).send().await.context("search request failed")?;
  // The status is deliberately not checked: the backend reports search
  // failures through the `error` field on any status.
  let body = response.text().await.context("failed to read search response")?;
  parse_search_body(&body)
}

pub async fn download(client: &Client, server: &str, video_url: &str, format: DownloadFormat) -> Result<DownloadPayload> {
  let endpoint = format!("{}{}", server, constants().download_path);
  let form = multipart::Form::new().text("url", video_url.to_string()).text("format", format.label().to_string());
  let response = client.post(&endpoint).multipart(form).send().await.context("download request failed")?;

  if !response.status().is_success() {
    let body = response.text().await.unwrap_or_default();
    return Err(anyhow!(download_error_message(&body)));
  }

  let file_name = response
    .headers()
    .get(reqwest::header::CONTENT_DISPOSITION)
    .and_then(|value| value.to_str().ok())
    .and_then(disposition::filename)
    .unwrap_or_else(|| constants().fallback_filename.clone());
  let bytes = response.bytes().await.context("failed to read download body")?;
  Ok(DownloadPayload { file_name, bytes: bytes.to_vec() })
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- parse_search_body ---

  #[test]
  fn search_body_with_results() {
    let body = r#"{"results": [{
      "title": "Intro to Rust",
      "url": "https://example.com/watch?v=abc",
      "uploader": "rustconf",
      "duration": "12:34",
      "view_count": 1234567,
      "description": "A talk.",
      "upload_date": "20230115",
      "filesize_approx": 1536
    }]}"#;
    let results = parse_search_body(body).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Intro to Rust");
    assert_eq!(results[0].view_count, Some(1234567));
    assert_eq!(results[0].upload_date.as_deref(), Some("20230115"));
  }

  #[test]
  fn search_body_with_error_field_is_failure() {
    let err = parse_search_body(r#"{"error": "No search query provided"}"#).unwrap_err();
    assert_eq!(err.to_string(), "No search query provided");
  }

  #[test]
  fn search_body_error_wins_over_results() {
    let body = r#"{"error": "backend broke", "results": [{"title": "t", "url": "u"}]}"#;
    assert!(parse_search_body(body).is_err());
  }

  #[test]
  fn search_body_empty_results() {
    assert!(parse_search_body(r#"{"results": []}"#).unwrap().is_empty());
  }

  #[test]
  fn search_body_invalid_json_is_failure() {
    assert!(parse_search_body("<html>502</html>").is_err());
  }

  #[test]
  fn search_body_minimal_result_fields() {
    let results = parse_search_body(r#"{"results": [{"title": "t", "url": "u"}]}"#).unwrap();
    assert_eq!(results[0].uploader, "");
    assert_eq!(results[0].view_count, None);
    assert_eq!(results[0].filesize_approx, None);
  }

  // --- download_error_message ---

  #[test]
  fn download_error_from_body() {
    assert_eq!(download_error_message(r#"{"error": "not found"}"#), "not found");
  }

  #[test]
  fn download_error_unparseable_body_is_generic() {
    assert_eq!(download_error_message("Internal Server Error"), "Download failed");
  }

  #[test]
  fn download_error_missing_field_is_generic() {
    assert_eq!(download_error_message(r#"{"detail": "nope"}"#), "Download failed");
  }
}
