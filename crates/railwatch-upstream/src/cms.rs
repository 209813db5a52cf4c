// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the headless CMS storing maintenance logs.
//!
//! The CMS expects write bodies wrapped as `{"data": {...}}` and answers with
//! the same envelope, usually with the fields nested under `attributes`.

use std::time::Duration;

use railwatch_config::model::CmsConfig;
use railwatch_core::{LogFields, Upstream, UpstreamError};
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::http::UpstreamHttp;

/// Write body envelope expected by the CMS.
#[derive(Debug, Serialize)]
struct DataEnvelope<'a, T> {
    data: &'a T,
}

/// HTTP client for the maintenance-log collection.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: UpstreamHttp,
    collection: String,
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Result<Self, UpstreamError> {
        let http = UpstreamHttp::new(
            Upstream::Cms,
            &config.base_url,
            config.timeout_secs.map(Duration::from_secs),
            HeaderMap::new(),
        )?;
        Ok(Self {
            http,
            collection: config.collection.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url().as_str()
    }

    /// `GET /{collection}`.
    pub async fn list_logs(&self) -> Result<Value, UpstreamError> {
        self.http
            .send_json(self.http.request(Method::GET, &[self.collection.as_str()]))
            .await
    }

    /// `POST /{collection}` with `{data: fields}`.
    pub async fn create_log(&self, fields: &LogFields) -> Result<Value, UpstreamError> {
        let request = self
            .http
            .request(Method::POST, &[self.collection.as_str()])
            .json(&DataEnvelope { data: fields });
        self.http.send_json(request).await
    }

    /// `PUT /{collection}/{id}` with `{data: fields}`.
    pub async fn update_log(&self, id: &str, fields: &LogFields) -> Result<Value, UpstreamError> {
        let request = self
            .http
            .request(Method::PUT, &[self.collection.as_str(), id])
            .json(&DataEnvelope { data: fields });
        self.http.send_json(request).await
    }

    /// `DELETE /{collection}/{id}`. Any 2xx counts as deleted.
    pub async fn delete_log(&self, id: &str) -> Result<(), UpstreamError> {
        self.http
            .send_discarding(self.http.request(Method::DELETE, &[self.collection.as_str(), id]))
            .await
    }
}
