//! Transport seam for the fetch flow.
//!
//! The fetch cycle needs exactly one capability: issue a GET and hand back
//! the response body. Everything above the seam (query assembly, JSONP
//! correlation, normalization) is transport-agnostic; everything below it
//! (TLS, connection pooling, timeouts, retries if a deployment wants them)
//! belongs to the [`Transport`] implementation.

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Request, Uri};
use http_body_util::{BodyExt, Empty};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use crate::error::ClientError;

const BODY_PREVIEW_LIMIT: usize = 256;

/// One GET, one body. Implementations decide TLS, pooling and timeouts.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET against an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns a transport-level error, or [`ClientError::HttpStatus`] for
    /// a non-2xx response.
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Bytes, ClientError>;
}

/// Default transport: a hyper connection-pooled client over rustls with the
/// platform's native root certificates. Plain `http://` stays available for
/// services inside the perimeter and for tests.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
}

impl HyperTransport {
    /// Build the default transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Tls`] if the native root certificate store
    /// cannot be loaded.
    pub fn new() -> Result<Self, ClientError> {
        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|err| ClientError::Tls(Box::new(err)))?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(https);
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Bytes, ClientError> {
        let uri: Uri = url.parse().map_err(|err: http::uri::InvalidUri| {
            ClientError::InvalidUri {
                url: url.to_owned(),
                reason: err.to_string(),
            }
        })?;

        let mut builder = Request::builder().method(Method::GET).uri(uri);
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let request = builder.body(Empty::new())?;

        let response = self.client.request(request).await?;
        let status = response.status();
        let body = response.into_body().collect().await?.to_bytes();

        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                status,
                body_preview: preview(&body),
            });
        }
        Ok(body)
    }
}

fn preview(body: &Bytes) -> String {
    let text = String::from_utf8_lossy(body);
    let mut preview: String = text.chars().take(BODY_PREVIEW_LIMIT).collect();
    if text.chars().count() > BODY_PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview
}
