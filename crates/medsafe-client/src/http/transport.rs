//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument, trace};

use medsafe_core::error::{Error, InvalidInputError, TransportError};
use medsafe_core::{
    ApiBaseUrl, HttpResponse, Method, MultipartForm, OutgoingRequest, RequestBody, Result,
    Transport,
};

use crate::config::ClientConfig;

/// HTTP transport for the medsafe backend.
///
/// Resolves request paths against the configured base URL and returns every
/// received response, whatever its status. Only failures to get a response
/// at all become errors.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: ApiBaseUrl,
}

impl HttpTransport {
    /// Create a transport for the given base URL with default settings.
    pub fn new(base: ApiBaseUrl) -> Self {
        let config = ClientConfig::default().with_base_url(base);
        Self::from_config(&config)
    }

    /// Create a transport from a full client configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        debug!(base_url = %config.base_url, timeout = ?config.timeout, "Building HTTP client");

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().expect("failed to build HTTP client");

        Self {
            client,
            base: config.base_url.clone(),
        }
    }

    /// Returns the base URL this transport sends to.
    pub fn base_url(&self) -> &ApiBaseUrl {
        &self.base
    }

    fn build_form(form: &MultipartForm) -> Result<Form> {
        let mut multipart = Form::new();
        for (name, value) in &form.text {
            multipart = multipart.text(name.clone(), value.clone());
        }
        for file in &form.files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.filename.clone())
                .mime_str(&file.content_type)
                .map_err(|e| InvalidInputError::Body {
                    message: format!("{}: {}", file.filename, e),
                })?;
            multipart = multipart.part(file.name.clone(), part);
        }
        Ok(multipart)
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Map a reqwest failure onto the transport error taxonomy.
fn map_reqwest_error(err: reqwest::Error) -> Error {
    let message = err.to_string();
    let kind = if err.is_timeout() {
        TransportError::Timeout { message }
    } else if err.is_connect() {
        TransportError::Connection { message }
    } else {
        TransportError::Http { message }
    };
    Error::Transport(kind)
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(method = %request.method(), path = request.path()))]
    async fn send(&self, request: &OutgoingRequest) -> Result<HttpResponse> {
        let url = self.base.endpoint(request.path());
        trace!(%url, "Sending request");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method()), &url);

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }

        for (name, value) in request.headers() {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| InvalidInputError::Header {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| InvalidInputError::Header {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
            builder = builder.header(header_name, header_value);
        }

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => {
                let bytes = serde_json::to_vec(value).map_err(|e| InvalidInputError::Body {
                    message: e.to_string(),
                })?;
                builder.body(bytes)
            }
            RequestBody::Multipart(form) => builder.multipart(Self::build_form(form)?),
        };

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        trace!(status, len = body.len(), "Received response");
        Ok(HttpResponse::new(status, content_type, body.to_vec()))
    }
}
