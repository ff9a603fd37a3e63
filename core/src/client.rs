//! Stateless HTTP request builder and response parser for the institutions
//! resource of the consent API.
//!
//! # Design
//! `InstitutionClient` holds only the base URL and the bearer token. Each
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`; the caller owns
//! the round-trip in between.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateInstitution, Institution};

const INSTITUTIONS_PATH: &str = "/api/institutions";

/// Synchronous, stateless client for `/api/institutions`.
#[derive(Debug, Clone)]
pub struct InstitutionClient {
    base_url: String,
    token: String,
}

impl InstitutionClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorization(&self) -> (String, String) {
        ("authorization".to_string(), format!("Bearer {}", self.token))
    }

    pub fn build_list_institutions(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{INSTITUTIONS_PATH}", self.base_url),
            headers: vec![self.authorization()],
            body: None,
        }
    }

    pub fn build_get_institution(&self, id: u32) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{INSTITUTIONS_PATH}/{id}", self.base_url),
            headers: vec![self.authorization()],
            body: None,
        }
    }

    pub fn build_create_institution(&self, input: &CreateInstitution) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{INSTITUTIONS_PATH}", self.base_url),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                self.authorization(),
            ],
            body: Some(body),
        })
    }

    pub fn build_delete_institution(&self, id: u32) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}{INSTITUTIONS_PATH}/{id}", self.base_url),
            headers: vec![self.authorization()],
            body: None,
        }
    }

    pub fn parse_list_institutions(&self, response: HttpResponse) -> Result<Vec<Institution>, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_get_institution(&self, response: HttpResponse) -> Result<Institution, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_create_institution(&self, response: HttpResponse) -> Result<Institution, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_delete_institution(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    match response.status {
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        409 => Err(ApiError::Duplicate {
            body: response.body.clone(),
        }),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> InstitutionClient {
        InstitutionClient::new("http://localhost:8180", "secret")
    }

    #[test]
    fn build_create_institution_produces_correct_request() {
        let req = client()
            .build_create_institution(&CreateInstitution::named("Alpha University"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8180/api/institutions");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("authorization"), Some("Bearer secret"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "name": "Alpha University" }));
    }

    #[test]
    fn build_list_institutions_is_authenticated_get() {
        let req = client().build_list_institutions();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8180/api/institutions");
        assert_eq!(req.header("authorization"), Some("Bearer secret"));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_get_and_delete_include_id() {
        let get = client().build_get_institution(42);
        assert_eq!(get.path, "http://localhost:8180/api/institutions/42");
        let delete = client().build_delete_institution(42);
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.path, "http://localhost:8180/api/institutions/42");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = InstitutionClient::new("http://localhost:8180/", "t");
        assert_eq!(client.base_url(), "http://localhost:8180");
        assert_eq!(
            client.build_list_institutions().path,
            "http://localhost:8180/api/institutions"
        );
    }

    #[test]
    fn parse_create_institution_success() {
        let response = HttpResponse::new(200, r#"{"id":3,"name":"Alpha University"}"#);
        let inst = client().parse_create_institution(response).unwrap();
        assert_eq!(inst.id, 3);
        assert_eq!(inst.name, "Alpha University");
    }

    #[test]
    fn parse_create_institution_duplicate() {
        let response = HttpResponse::new(409, "exists");
        let err = client().parse_create_institution(response).unwrap_err();
        assert!(matches!(err, ApiError::Duplicate { .. }));
    }

    #[test]
    fn parse_create_institution_unauthorized() {
        let err = client()
            .parse_create_institution(HttpResponse::new(401, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn parse_get_institution_not_found() {
        let err = client()
            .parse_get_institution(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_list_institutions_wrong_status() {
        let err = client()
            .parse_list_institutions(HttpResponse::new(500, "boom"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_list_institutions_bad_json() {
        let err = client()
            .parse_list_institutions(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_delete_institution_accepts_no_content() {
        assert!(client()
            .parse_delete_institution(HttpResponse::new(204, ""))
            .is_ok());
    }
}
