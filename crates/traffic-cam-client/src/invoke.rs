use std::{marker::PhantomData, time::Duration};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use reqwest::{Client, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Error, Result};

pub use reqwest::{StatusCode, Url};

/// Status line and body of a completed request.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs a GET. Only faults below HTTP (connect, TLS, timeout) are
    /// `Err`; any status code is a successful transport result.
    async fn get(&self, url: Url) -> Result<RawResponse>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: Url) -> Result<RawResponse> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

pub trait Decoder {
    type Output;

    fn decode(&self, content_type: Option<&str>, body: &[u8]) -> Result<Self::Output>;
}

/// Picks the deserializer from the response content type: JSON for `*json*`,
/// XML for everything else.
pub struct Auto<T>(PhantomData<fn() -> T>);

impl<T> Default for Auto<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: DeserializeOwned> Decoder for Auto<T> {
    type Output = T;

    fn decode(&self, content_type: Option<&str>, body: &[u8]) -> Result<T> {
        match content_type {
            Some(content_type) if content_type.contains("json") => {
                Ok(serde_json::from_slice(body)?)
            }
            _ => {
                let text = std::str::from_utf8(body)
                    .map_err(|e| Error::General(format!("Response is not UTF-8: {e}")))?;
                Ok(quick_xml::de::from_str(text)?)
            }
        }
    }
}

/// Decodes with a fixed image format and ignores the content type entirely.
pub struct ImageDecoder {
    pub format: ImageFormat,
}

impl Decoder for ImageDecoder {
    type Output = DynamicImage;

    fn decode(&self, _content_type: Option<&str>, body: &[u8]) -> Result<DynamicImage> {
        Ok(image::load_from_memory_with_format(body, self.format)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiStatus {
    pub success: bool,
    /// `None` when the request never produced a response.
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

impl ApiStatus {
    pub fn ok(status_code: Option<u16>) -> Self {
        Self {
            success: true,
            status_code,
            message: None,
        }
    }

    pub fn failed(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: ApiStatus,
    pub payload: Option<T>,
}

impl<T> ApiResponse<T> {
    fn failed(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::failed(status_code, message),
            payload: None,
        }
    }
}

pub async fn invoke_get<D: Decoder>(
    transport: &dyn HttpTransport,
    url: Url,
    decoder: &D,
) -> ApiResponse<D::Output> {
    let path = url.path().to_string();
    debug!(path = %path, "Invoking GET");

    let response = match transport.get(url).await {
        Ok(response) => response,
        Err(err) => {
            warn!(path = %path, err = %err, "Request failed before a response arrived");
            return ApiResponse::failed(None, format!("Request failed: {err}"));
        }
    };

    let status_code = Some(response.status.as_u16());

    if !response.status.is_success() {
        debug!(path = %path, status = %response.status, "Request returned an error status");
        return ApiResponse::failed(status_code, format!("Request failed: {}", response.status));
    }

    match decoder.decode(response.content_type.as_deref(), &response.body) {
        Ok(payload) => ApiResponse {
            status: ApiStatus::ok(status_code),
            payload: Some(payload),
        },
        Err(err) => {
            warn!(path = %path, err = %err, "Failed to decode response");
            ApiResponse::failed(status_code, format!("Failed to decode response: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        value: u32,
    }

    struct StaticTransport(Option<RawResponse>);

    #[async_trait]
    impl HttpTransport for StaticTransport {
        async fn get(&self, _url: Url) -> Result<RawResponse> {
            self.0
                .clone()
                .ok_or_else(|| Error::General("connection refused".to_string()))
        }
    }

    fn url() -> Url {
        Url::parse("https://example.test/ping?key=secret").expect("valid url")
    }

    #[test]
    fn test_auto_decodes_xml_without_content_type() {
        let ping = Auto::<Ping>::default()
            .decode(None, b"<ping><value>7</value></ping>")
            .expect("xml decodes");
        assert_eq!(ping, Ping { value: 7 });
    }

    #[test]
    fn test_auto_decodes_json_by_content_type() {
        let ping = Auto::<Ping>::default()
            .decode(Some("application/json; charset=utf-8"), br#"{"value": 9}"#)
            .expect("json decodes");
        assert_eq!(ping, Ping { value: 9 });
    }

    #[test]
    fn test_image_decoder_ignores_content_type() {
        let mut png = Vec::new();
        DynamicImage::new_rgb8(2, 2)
            .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .expect("png encodes");

        let decoder = ImageDecoder {
            format: ImageFormat::Png,
        };
        let image = decoder
            .decode(Some("text/plain"), &png)
            .expect("png decodes");
        assert_eq!(image.width(), 2);

        assert!(decoder.decode(None, b"not an image").is_err());
    }

    #[tokio::test]
    async fn test_invoke_success() {
        let transport = StaticTransport(Some(RawResponse {
            status: StatusCode::OK,
            content_type: Some("text/xml".to_string()),
            body: b"<ping><value>1</value></ping>".to_vec(),
        }));

        let response = invoke_get(&transport, url(), &Auto::<Ping>::default()).await;
        assert_eq!(response.status, ApiStatus::ok(Some(200)));
        assert_eq!(response.payload, Some(Ping { value: 1 }));
    }

    #[tokio::test]
    async fn test_invoke_error_status() {
        let transport = StaticTransport(Some(RawResponse {
            status: StatusCode::BAD_GATEWAY,
            content_type: None,
            body: Vec::new(),
        }));

        let response = invoke_get(&transport, url(), &Auto::<Ping>::default()).await;
        assert!(!response.status.success);
        assert_eq!(response.status.status_code, Some(502));
        assert_eq!(
            response.status.message.as_deref(),
            Some("Request failed: 502 Bad Gateway")
        );
        assert!(response.payload.is_none());
    }

    #[tokio::test]
    async fn test_invoke_transport_fault() {
        let transport = StaticTransport(None);

        let response = invoke_get(&transport, url(), &Auto::<Ping>::default()).await;
        assert!(!response.status.success);
        assert_eq!(response.status.status_code, None);
        assert!(response.payload.is_none());
    }

    #[tokio::test]
    async fn test_invoke_decode_failure() {
        let transport = StaticTransport(Some(RawResponse {
            status: StatusCode::OK,
            content_type: Some("application/json".to_string()),
            body: b"<ping/>".to_vec(),
        }));

        let response = invoke_get(&transport, url(), &Auto::<Ping>::default()).await;
        assert!(!response.status.success);
        assert_eq!(response.status.status_code, Some(200));
        assert!(
            response
                .status
                .message
                .as_deref()
                .is_some_and(|m| m.starts_with("Failed to decode response"))
        );
    }
}
