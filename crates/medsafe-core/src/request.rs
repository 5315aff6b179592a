//! Transport-neutral request and response values.
//!
//! An [`OutgoingRequest`] is plain data so it can be inspected, cloned and
//! resubmitted after a token refresh. Transports turn it into a real HTTP call.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Error, InvalidInputError};
use crate::tokens::AccessToken;

/// Header carrying the bearer credential.
pub const AUTHORIZATION: &str = "authorization";

/// Header carrying the body media type.
pub const CONTENT_TYPE: &str = "content-type";

const JSON: &str = "application/json";

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a multipart upload.
#[derive(Clone)]
pub struct FilePart {
    pub name: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("name", &self.name)
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A multipart form kept as data so it can be sent more than once.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    pub text: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text.push((name.into(), value.into()));
        self
    }

    /// Add a file part. The media type is guessed from the file extension.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let filename = filename.into();
        let content_type = guess_media_type(&filename).to_string();
        self.files.push(FilePart {
            name: name.into(),
            filename,
            content_type,
            bytes,
        });
        self
    }
}

/// Media type for an upload, from its file extension.
pub fn guess_media_type(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "bmp" => "image/bmp",
        _ => "image/jpeg",
    }
}

/// Request payload.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// An ephemeral request, built per call and dropped after completion.
#[derive(Clone)]
pub struct OutgoingRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: BTreeMap<String, String>,
    body: RequestBody,
    retried: bool,
}

impl OutgoingRequest {
    /// Create a request for a path relative to the API base URL.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: RequestBody::Empty,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Set a header, replacing any previous value. Names are case-insensitive.
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Use a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        let value = serde_json::to_value(body).map_err(|e| InvalidInputError::Body {
            message: e.to_string(),
        })?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Use a multipart body.
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Returns a header value as it will be sent.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        if name == CONTENT_TYPE {
            return self.content_type();
        }
        self.headers.get(&name).map(String::as_str)
    }

    /// The bearer header, if one is attached.
    pub fn authorization(&self) -> Option<&str> {
        self.header_value(AUTHORIZATION)
    }

    /// Content type the transport should declare, if any.
    ///
    /// Multipart bodies never carry one: the transport writes its own
    /// boundary-bearing header. JSON bodies default to `application/json`.
    pub fn content_type(&self) -> Option<&str> {
        match self.body {
            RequestBody::Multipart(_) => None,
            RequestBody::Json(_) => Some(
                self.headers
                    .get(CONTENT_TYPE)
                    .map(String::as_str)
                    .unwrap_or(JSON),
            ),
            RequestBody::Empty => self.headers.get(CONTENT_TYPE).map(String::as_str),
        }
    }

    /// Headers to send, with `content-type` resolved per [`Self::content_type`].
    pub fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .filter(|(name, _)| name.as_str() != CONTENT_TYPE)
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        if let Some(content_type) = self.content_type() {
            headers.push((CONTENT_TYPE, content_type));
        }
        headers
    }

    /// Attach the bearer credential, overriding any caller-supplied value.
    pub fn set_bearer(&mut self, token: &AccessToken) {
        self.headers.insert(AUTHORIZATION.to_string(), token.bearer());
    }

    /// True once this request has been resubmitted after a refresh.
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Mark the request as resubmitted. A retried request is never refreshed again.
    pub fn mark_retried(&mut self) {
        self.retried = true;
    }
}

impl fmt::Debug for OutgoingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name == AUTHORIZATION {
                    (name.as_str(), "[REDACTED]")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("OutgoingRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &headers)
            .field("body", &self.body)
            .field("retried", &self.retried)
            .finish()
    }
}

/// Error body shape returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// A fully received HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// A JSON response, mostly useful for fake transports.
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        Self::new(
            status,
            Some(JSON.to_string()),
            serde_json::to_vec(value).unwrap_or_default(),
        )
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<R: DeserializeOwned>(&self) -> Result<R, Error> {
        serde_json::from_slice(&self.body).map_err(Error::decode)
    }

    /// Build the error for a non-2xx response, parsing a JSON error body if present.
    pub fn to_api_error(&self) -> ApiError {
        match serde_json::from_slice::<ErrorBody>(&self.body) {
            Ok(body) => ApiError::new(self.status, body.error, body.message),
            Err(_) => ApiError::new(self.status, None, None),
        }
    }

    /// Pass 2xx through, turn anything else into [`Error::Api`].
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Api(self.to_api_error()))
        }
    }
}
