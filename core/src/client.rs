//! Stateless HTTP request builder and response parser for the travel API.
//!
//! # Design
//! `TravelClient` holds only the service base URL. Each CRUD operation is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. A `Transport` executes
//! the round-trip in between, keeping this module deterministic.
//!
//! # Success contract
//! A call succeeds when the HTTP status is 2xx and the body is an envelope
//! with `status == 200`. Create, update and delete also accept an empty 2xx
//! body. Anything else is an error, including envelopes reporting `status: 1`.

use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::photo::{normalize_image_url, UPLOAD_CONTENT_TYPE, UPLOAD_FILENAME};
use crate::types::{ApiResponse, Travel, TravelForm};

const TRAVEL_PATH: &str = "travel";

#[derive(Debug, Clone)]
pub struct TravelClient {
    base_url: String,
    endpoint: Url,
}

impl TravelClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let endpoint = Url::parse(&format!("{base_url}/{TRAVEL_PATH}")).map_err(|e| {
            ApiError::InvalidBaseUrl {
                url: base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                reason: format!("unsupported scheme {}", endpoint.scheme()),
                url: base_url,
            });
        }
        Ok(Self { base_url, endpoint })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an entry's image, if it has one.
    pub fn image_url(&self, travel: &Travel) -> Option<String> {
        travel
            .image_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|u| normalize_image_url(&self.base_url, u))
    }

    pub fn build_list_travels(&self, user_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url_with(&[("userId", user_id)]),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_travel(&self, user_id: &str, form: &TravelForm) -> HttpRequest {
        let multipart = MultipartForm::new().text("userId", user_id);
        self.upload(HttpMethod::Post, user_id, multipart, form)
    }

    pub fn build_update_travel(&self, user_id: &str, id: i64, form: &TravelForm) -> HttpRequest {
        let multipart = MultipartForm::new()
            .text("id", &id.to_string())
            .text("userId", user_id);
        self.upload(HttpMethod::Put, user_id, multipart, form)
    }

    pub fn build_delete_travel(&self, user_id: &str, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.url_with(&[("userId", user_id), ("id", &id.to_string())]),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_travels(&self, response: HttpResponse) -> Result<Vec<Travel>, ApiError> {
        check_status(&response)?;
        let envelope = parse_envelope(&response.body)?;
        check_envelope(&envelope)?;
        Ok(envelope.travels)
    }

    pub fn parse_create_travel(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_ack(response)
    }

    pub fn parse_update_travel(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_ack(response)
    }

    pub fn parse_delete_travel(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_ack(response)
    }

    fn upload(
        &self,
        method: HttpMethod,
        user_id: &str,
        multipart: MultipartForm,
        form: &TravelForm,
    ) -> HttpRequest {
        let multipart = multipart
            .text("title", &form.title)
            .text("description", &form.description)
            .file("image", UPLOAD_FILENAME, UPLOAD_CONTENT_TYPE, &form.image);
        let content_type = multipart.content_type();
        HttpRequest {
            method,
            url: self.url_with(&[("userId", user_id)]),
            headers: vec![("content-type".to_string(), content_type)],
            body: Some(multipart.finish()),
        }
    }

    fn url_with(&self, query: &[(&str, &str)]) -> String {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(query);
        url.into()
    }
}

/// Map non-2xx statuses to the appropriate `ApiError` variant.
///
/// Error replies that still carry an envelope surface its message.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    if let Ok(envelope) = serde_json::from_str::<ApiResponse>(&response.body) {
        return Err(rejected(&envelope));
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn check_envelope(envelope: &ApiResponse) -> Result<(), ApiError> {
    if envelope.is_success() {
        Ok(())
    } else {
        Err(rejected(envelope))
    }
}

fn rejected(envelope: &ApiResponse) -> ApiError {
    let message = if envelope.message.is_empty() {
        format!("request failed with status {}", envelope.status)
    } else {
        envelope.message.clone()
    };
    ApiError::Rejected {
        status: envelope.status,
        message,
    }
}

fn parse_envelope(body: &str) -> Result<ApiResponse, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn parse_ack(response: HttpResponse) -> Result<(), ApiError> {
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Ok(());
    }
    let envelope = parse_envelope(&response.body)?;
    check_envelope(&envelope)?;
    tracing::debug!(message = %envelope.message, "service acknowledged");
    Ok(())
}
