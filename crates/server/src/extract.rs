//! Request extractors whose rejections use the JSON error body.

use std::collections::BTreeMap;

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use service::uploads::{UploadPolicy, UploadedFile};
use utoipa::IntoParams;

use crate::errors::JsonApiError;

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(JsonApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(JsonApiError))]
pub struct ApiQuery<T>(pub T);

/// Raw list query. Values stay strings so pagination and filters can report
/// their own 400s.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub keyword: Option<String>,
    pub country_id: Option<String>,
    pub client_id: Option<String>,
    pub technology_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub format: Option<String>,
}

/// A body that is either `multipart/form-data` or JSON.
///
/// Text parts are gathered into a JSON object (a repeated name becomes an
/// array); file parts are kept aside for the upload policy. A JSON body must
/// be an object and an empty body reads as `{}`.
#[derive(Debug, Default)]
pub struct FormPayload {
    pub fields: Value,
    pub files: Vec<UploadedFile>,
}

fn multipart_error(e: MultipartError) -> JsonApiError {
    JsonApiError::new(e.status(), e.body_text())
}

fn push_field(map: &mut BTreeMap<String, Vec<String>>, name: String, value: String) {
    map.entry(name).or_default().push(value);
}

fn collect_fields(map: BTreeMap<String, Vec<String>>) -> Value {
    let obj: Map<String, Value> = map
        .into_iter()
        .map(|(k, mut v)| {
            let value = if v.len() == 1 {
                Value::String(v.remove(0))
            } else {
                Value::Array(v.into_iter().map(Value::String).collect())
            };
            (k, value)
        })
        .collect();
    Value::Object(obj)
}

#[async_trait]
impl<S> FromRequest<S> for FormPayload
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|r| JsonApiError::new(r.status(), r.body_text()))?;
            let mut text = BTreeMap::new();
            let mut files = Vec::new();
            while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
                let name = field.name().unwrap_or_default().to_string();
                match field.file_name().map(str::to_string) {
                    Some(file_name) => {
                        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                        let bytes = field.bytes().await.map_err(multipart_error)?;
                        files.push(UploadedFile { field: name, file_name, content_type, bytes: bytes.to_vec() });
                    }
                    None => {
                        let value = field.text().await.map_err(multipart_error)?;
                        push_field(&mut text, name, value);
                    }
                }
            }
            return Ok(Self { fields: collect_fields(text), files });
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|r| JsonApiError::new(r.status(), r.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self { fields: Value::Object(Map::new()), files: Vec::new() });
        }
        let fields: Value = serde_json::from_slice(&bytes)
            .map_err(|e| JsonApiError::bad_request(format!("Malformed JSON body: {e}")))?;
        if !fields.is_object() {
            return Err(JsonApiError::bad_request("Request body must be a JSON object"));
        }
        Ok(Self { fields, files: Vec::new() })
    }
}

impl FormPayload {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, JsonApiError> {
        Ok(service::serde_ext::decode(self.fields.clone())?)
    }

    /// Files checked against `policy`.
    pub fn files(&mut self, policy: &UploadPolicy) -> Result<Vec<UploadedFile>, JsonApiError> {
        Ok(policy.check(std::mem::take(&mut self.files))?)
    }

    /// For endpoints that take no uploads.
    pub fn no_files(&self) -> Result<(), JsonApiError> {
        match self.files.first() {
            Some(f) => Err(JsonApiError::bad_request(format!("Unexpected file field '{}'", f.field))),
            None => Ok(()),
        }
    }
}
