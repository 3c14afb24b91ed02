//! HTTP Backend
//!
//! `gloo-net` requests against the record endpoint and the login handler.
//! POST bodies are form-encoded; every request carries
//! `X-Requested-With: XMLHttpRequest` so the server treats it as AJAX.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{encode_form, operation_form, Backend, Operation};
use crate::error::ApiError;
use crate::models::{DeleteResponse, LoginResponse, RecordPayload, RowId};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Backend talking to the real server
#[derive(Debug, Clone)]
pub struct HttpBackend {
    endpoint: String,
    login_url: String,
}

impl HttpBackend {
    pub fn new(endpoint: impl Into<String>, login_url: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            login_url: login_url.into(),
        }
    }

    fn ajax(builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Accept", "application/json")
    }

    async fn post_form(&self, url: &str, pairs: &[(String, String)]) -> Result<Response, ApiError> {
        let request = Self::ajax(Request::post(url))
            .header("Content-Type", FORM_CONTENT_TYPE)
            .body(encode_form(pairs))
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        checked(response)
    }
}

fn checked(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        Ok(response)
    } else {
        Err(ApiError::Status(response.status()))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    Ok(serde_json::from_str(&text)?)
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn fetch_record(&self, id: &RowId) -> Result<RecordPayload, ApiError> {
        log::debug!("[API] GET {} id={}", self.endpoint, id);
        let response = Self::ajax(Request::get(&self.endpoint))
            .query([("id", id.as_str())])
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(checked(response)?).await
    }

    async fn delete_record(&self, csrf_token: &str, id: &RowId) -> Result<DeleteResponse, ApiError> {
        log::debug!("[API] POST {} delete id={}", self.endpoint, id);
        let pairs = operation_form(csrf_token, id, None, Operation::Delete);
        let response = self.post_form(&self.endpoint, &pairs).await?;
        decode(response).await
    }

    async fn update_value(&self, csrf_token: &str, id: &RowId, value: &str) -> Result<(), ApiError> {
        log::debug!("[API] POST {} update id={} value={}", self.endpoint, id, value);
        let pairs = operation_form(csrf_token, id, Some(value), Operation::Update);
        self.post_form(&self.endpoint, &pairs).await?;
        Ok(())
    }

    async fn login(&self, fields: &[(String, String)]) -> Result<LoginResponse, ApiError> {
        log::debug!("[API] POST {}", self.login_url);
        let response = self.post_form(&self.login_url, fields).await?;
        decode(response).await
    }
}
