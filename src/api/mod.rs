//! Record and Login Requests
//!
//! The [`Backend`] trait is the seam between the page controllers and the
//! server. [`HttpBackend`] talks to the real endpoints; tests substitute an
//! in-memory fake.

mod http;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ApiError;
use crate::models::{DeleteResponse, LoginResponse, RecordPayload, RowId};

pub use http::HttpBackend;

/// Name of the hidden CSRF field and of the form key it is sent under
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// `type` discriminator understood by the record endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Delete,
    Update,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Delete => "delete",
            Operation::Update => "update",
        }
    }
}

/// Server calls made by the page
#[async_trait(?Send)]
pub trait Backend {
    /// `GET <endpoint>?id=<id>`
    async fn fetch_record(&self, id: &RowId) -> Result<RecordPayload, ApiError>;

    /// `POST <endpoint>` with `type=delete`
    async fn delete_record(&self, csrf_token: &str, id: &RowId) -> Result<DeleteResponse, ApiError>;

    /// `POST <endpoint>` with `type=update`
    async fn update_value(&self, csrf_token: &str, id: &RowId, value: &str) -> Result<(), ApiError>;

    /// `POST <login url>` with the serialised login form
    async fn login(&self, fields: &[(String, String)]) -> Result<LoginResponse, ApiError>;
}

// ========================
// Form Bodies
// ========================

/// Characters left unescaped by `application/x-www-form-urlencoded`
const FORM_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b' ');

fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, FORM_ESCAPE).to_string().replace(' ', "+")
}

/// Encode key/value pairs as an `application/x-www-form-urlencoded` body
pub fn encode_form<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k.as_ref()), encode_component(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}

/// Body of a record-endpoint POST
pub fn operation_form(csrf_token: &str, id: &RowId, value: Option<&str>, op: Operation) -> Vec<(String, String)> {
    let mut pairs = vec![
        (CSRF_FIELD.to_string(), csrf_token.to_string()),
        ("id".to_string(), id.as_str().to_string()),
    ];
    if let Some(value) = value {
        pairs.push(("value".to_string(), value.to_string()));
    }
    pairs.push(("type".to_string(), op.as_str().to_string()));
    pairs
}

/// Add the CSRF token to serialised form fields unless the form already has it
pub fn with_csrf(mut fields: Vec<(String, String)>, csrf_token: Option<&str>) -> Vec<(String, String)> {
    if let Some(token) = csrf_token {
        if !fields.iter().any(|(name, _)| name == CSRF_FIELD) {
            fields.push((CSRF_FIELD.to_string(), token.to_string()));
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_form_escapes_reserved_characters() {
        let body = encode_form(&[("username", "a+b@example.com"), ("password", "p&ss word=1")]);
        assert_eq!(body, "username=a%2Bb%40example.com&password=p%26ss+word%3D1");
    }

    #[test]
    fn test_encode_form_keeps_unreserved() {
        assert_eq!(encode_form(&[("a_b", "x-y.z*")]), "a_b=x-y.z*");
        assert_eq!(encode_form::<&str, &str>(&[]), "");
    }

    #[test]
    fn test_encode_form_utf8() {
        assert_eq!(encode_form(&[("name", "Café")]), "name=Caf%C3%A9");
    }

    #[test]
    fn test_operation_form_update() {
        let pairs = operation_form("tok", &RowId::new("7"), Some("3"), Operation::Update);
        assert_eq!(
            encode_form(&pairs),
            "csrfmiddlewaretoken=tok&id=7&value=3&type=update"
        );
    }

    #[test]
    fn test_operation_form_delete_has_no_value() {
        let pairs = operation_form("tok", &RowId::new("42"), None, Operation::Delete);
        assert_eq!(encode_form(&pairs), "csrfmiddlewaretoken=tok&id=42&type=delete");
    }

    #[test]
    fn test_with_csrf_appends_once() {
        let fields = vec![("username".to_string(), "a".to_string())];
        let fields = with_csrf(fields, Some("tok"));
        assert_eq!(fields.last().unwrap(), &(CSRF_FIELD.to_string(), "tok".to_string()));

        let again = with_csrf(fields.clone(), Some("other"));
        assert_eq!(again, fields);
    }

    #[test]
    fn test_with_csrf_without_token() {
        let fields = vec![("username".to_string(), "a".to_string())];
        assert_eq!(with_csrf(fields.clone(), None), fields);
    }
}
