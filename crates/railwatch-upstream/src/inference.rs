// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the inference engine.
//!
//! The engine owns the schemas of its results; this client hands back the
//! decoded JSON untouched and leaves shape decisions to the gateway.

use std::time::Duration;

use railwatch_config::model::InferenceConfig;
use railwatch_core::{Upstream, UpstreamError};
use reqwest::header::HeaderMap;
use reqwest::multipart::Form;
use reqwest::Method;
use serde_json::Value;

use crate::http::UpstreamHttp;

/// HTTP client for the inference engine.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: UpstreamHttp,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, UpstreamError> {
        let http = UpstreamHttp::new(
            Upstream::Inference,
            &config.base_url,
            config.timeout_secs.map(Duration::from_secs),
            HeaderMap::new(),
        )?;
        Ok(Self { http })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url().as_str()
    }

    /// `GET /alerts`.
    pub async fn alerts(&self) -> Result<Value, UpstreamError> {
        self.http
            .send_json(self.http.request(Method::GET, &["alerts"]))
            .await
    }

    /// `POST /summarize` with sensor rows.
    pub async fn summarize(&self, rows: &Value) -> Result<Value, UpstreamError> {
        self.post_json("summarize", rows).await
    }

    /// `POST /predict` with sensor rows.
    pub async fn predict(&self, rows: &Value) -> Result<Value, UpstreamError> {
        self.post_json("predict", rows).await
    }

    /// `POST /parse-report` with `{report}`.
    pub async fn parse_report(&self, report: &Value) -> Result<Value, UpstreamError> {
        self.post_json("parse-report", report).await
    }

    /// `POST /analyze-image` with a prepared multipart form.
    pub async fn analyze_image(&self, form: Form) -> Result<Value, UpstreamError> {
        self.http
            .send_json(
                self.http
                    .request(Method::POST, &["analyze-image"])
                    .multipart(form),
            )
            .await
    }

    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value, UpstreamError> {
        self.http
            .send_json(self.http.request(Method::POST, &[endpoint]).json(body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::multipart::Part;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> InferenceClient {
        InferenceClient::new(&InferenceConfig {
            base_url: base_url.to_string(),
            timeout_secs: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn alerts_returns_payload_verbatim() {
        let server = MockServer::start().await;
        let payload = json!([{"message": "Possible track fault detected", "severity": "High"}]);
        Mock::given(method("GET"))
            .and(path("/alerts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
            .expect(1)
            .mount(&server)
            .await;

        let value = client(&server.uri()).alerts().await.unwrap();
        assert_eq!(value, payload);
    }

    #[tokio::test]
    async fn predict_forwards_rows_as_json() {
        let server = MockServer::start().await;
        let rows = json!([{"temperature": 55.0, "vibration": 0.7, "speed": 80.0}]);
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_json(&rows))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"anomalies": []})))
            .mount(&server)
            .await;

        let value = client(&server.uri()).predict(&rows).await.unwrap();
        assert_eq!(value, json!({"anomalies": []}));
    }

    #[tokio::test]
    async fn parse_report_hits_hyphenated_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/parse-report"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let value = client(&server.uri())
            .parse_report(&json!({"report": "Zone 6 crack"}))
            .await
            .unwrap();
        assert_eq!(value["summary"], "ok");
    }

    #[tokio::test]
    async fn analyze_image_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze-image"))
            .and(header_regex("content-type", "^multipart/form-data; boundary="))
            .and(body_string_contains("name=\"file\"; filename=\"rail.png\""))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"defect_probability": 0.87, "defect_type": "Crack detected"})),
            )
            .mount(&server)
            .await;

        let form = Form::new().part("file", Part::bytes(b"png".to_vec()).file_name("rail.png"));
        let value = client(&server.uri()).analyze_image(form).await.unwrap();
        assert_eq!(value["defect_type"], "Crack detected");
    }

    #[tokio::test]
    async fn summarize_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "bad rows"})))
            .mount(&server)
            .await;

        let err = client(&server.uri()).summarize(&json!({})).await.unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::BadStatus { upstream: Upstream::Inference, status: 422, .. }
        ));
    }
}
