// Pinata client: pins a remote image as a file and a metadata document as
// JSON. Each upload is a single request/response; nothing is retried and
// errors are logged where they are detected, then handed back unchanged.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart;
use reqwest::{Client, Response};
use mime_guess::mime::{self, Mime};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{Stage, UploadError};

/// File name the image is pinned under.
pub const IMAGE_FILE_NAME: &str = "image.jpg";

/// Pinata's acknowledgement for both pinning endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PinResponse {
    pub ipfs_hash: String,
    pub pin_size: u64,
    pub timestamp: String,
}

impl PinResponse {
    pub fn ipfs_uri(&self) -> String {
        format!("ipfs://{}", self.ipfs_hash)
    }

    /// HTTPS URL resolving the hash through `gateway`.
    pub fn gateway_url(&self, gateway: &str) -> String {
        format!("{}/ipfs/{}", gateway.trim_end_matches('/'), self.ipfs_hash)
    }
}

/// JSON document pinned alongside the image. Field order is the wire order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub image: String,
}

/// Bytes downloaded from the source URL.
#[derive(Debug)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// Only ever an `image/*` type.
    pub content_type: Option<Mime>,
}

/// Picks the part's mime type: the source header when it parses, else a
/// guess from the URL path. Anything that is not an image is dropped.
pub fn image_mime(header: Option<&str>, path: &str) -> Option<Mime> {
    header
        .and_then(|ct| ct.parse::<Mime>().ok())
        .or_else(|| mime_guess::from_path(path).first())
        .filter(|m| m.type_() == mime::IMAGE)
}

/// Builds the `Authorization` value. An empty token still produces a
/// header (`Bearer `) so the service rejects it rather than us skipping it.
pub fn auth_header(token: &str) -> Result<HeaderValue, UploadError> {
    HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| UploadError::InvalidToken)
}

#[derive(Clone, Debug)]
pub struct PinataClient {
    client: Client,
    api_url: String,
    gateway_url: String,
    token: String,
}

impl PinataClient {
    pub fn new(config: &Config) -> Result<Self, UploadError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Use a preconfigured `reqwest::Client` (proxy settings, TLS roots, ...).
    pub fn with_client(client: Client, config: &Config) -> Self {
        PinataClient {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            token: config.jwt.clone(),
        }
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    fn auth_headers(&self) -> Result<HeaderMap, UploadError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_header(&self.token)?);
        Ok(headers)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/pinning/{}", self.api_url, path)
    }

    /// Download the full body of `url`.
    pub async fn fetch_image(&self, url: &str) -> Result<FetchedImage, UploadError> {
        let res = self.client.get(url).send().await?;
        if !res.status().is_success() {
            return Err(UploadError::Fetch {
                status: res.status().as_u16(),
            });
        }
        let content_type = image_mime(
            res.headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            res.url().path(),
        );
        let bytes = res.bytes().await?.to_vec();
        debug!(url, size = bytes.len(), "Fetched source image");
        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }

    /// Fetch `image_url` and pin it as `image.jpg`. Returns `ipfs://<hash>`.
    pub async fn upload_image_url(&self, image_url: &str) -> Result<String, UploadError> {
        self.pin_image(image_url).await.map_err(|err| {
            error!("Error uploading image to IPFS: {}", err);
            err
        })
    }

    async fn pin_image(&self, image_url: &str) -> Result<String, UploadError> {
        let image = self.fetch_image(image_url).await?;

        let mut part = multipart::Part::bytes(image.bytes).file_name(IMAGE_FILE_NAME);
        if let Some(mime) = &image.content_type {
            part = part.mime_str(mime.as_ref())?;
        }
        let form = multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(self.endpoint("pinFileToIPFS"))
            .headers(self.auth_headers()?)
            .multipart(form)
            .send()
            .await?;

        if !res.status().is_success() {
            error!("Failed pushing image to IPFS");
            return Err(UploadError::Status {
                stage: Stage::Image,
                status: res.status().as_u16(),
            });
        }

        info!("Pushed image to IPFS");
        self.read_pin(res).await
    }

    /// Pin `{name, description, image}` as JSON. Returns `ipfs://<hash>`.
    pub async fn upload_metadata(
        &self,
        image_uri: &str,
        name: &str,
        description: &str,
    ) -> Result<String, UploadError> {
        self.pin_metadata(image_uri, name, description)
            .await
            .map_err(|err| {
                error!("Error uploading metadata to IPFS: {}", err);
                err
            })
    }

    async fn pin_metadata(
        &self,
        image_uri: &str,
        name: &str,
        description: &str,
    ) -> Result<String, UploadError> {
        let metadata = Metadata {
            name: name.to_string(),
            description: description.to_string(),
            image: image_uri.to_string(),
        };
        let body = serde_json::to_vec(&metadata)?;

        let res = self
            .client
            .post(self.endpoint("pinJSONToIPFS"))
            .headers(self.auth_headers()?)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !res.status().is_success() {
            error!("Failed pushing metadata to IPFS");
            return Err(UploadError::Status {
                stage: Stage::Metadata,
                status: res.status().as_u16(),
            });
        }

        debug!("Pushed metadata to IPFS");
        self.read_pin(res).await
    }

    async fn read_pin(&self, res: Response) -> Result<String, UploadError> {
        let pin: PinResponse = res.json().await?;

        info!("IPFS Hash :: {}", pin.ipfs_hash);
        info!("IPFS :: {}", pin.ipfs_uri());
        info!("HTTPs :: {}", pin.gateway_url(&self.gateway_url));
        debug!(size = pin.pin_size, timestamp = %pin.timestamp, "Pin details");

        Ok(pin.ipfs_uri())
    }
}
