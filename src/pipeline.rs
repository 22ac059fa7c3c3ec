// Two-step pin: the image first, then a metadata document pointing at it.
// The metadata request never starts before the image hash is known.

use tracing::{error, info};

use crate::api::PinataClient;
use crate::error::UploadError;

pub const DEFAULT_IMAGE_URL: &str = "https://images.prismic.io/igspace/5f77bbf6-9b55-4202-a5f5-8bf185388955_aircraft-g463fcda57_1920.jpg";
pub const DEFAULT_NAME: &str = "Pixel Knight #1";
pub const DEFAULT_DESCRIPTION: &str = "A mighty pixel warrior";

/// What to pin.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRequest {
    pub image_url: String,
    pub name: String,
    pub description: String,
}

impl Default for AssetRequest {
    fn default() -> Self {
        AssetRequest {
            image_url: DEFAULT_IMAGE_URL.to_string(),
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl AssetRequest {
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.image_url.is_empty() {
            return Err(UploadError::EmptyField("image url"));
        }
        if self.name.is_empty() {
            return Err(UploadError::EmptyField("name"));
        }
        if self.description.is_empty() {
            return Err(UploadError::EmptyField("description"));
        }
        Ok(())
    }
}

/// Content identifiers of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct PinnedAsset {
    pub image_uri: String,
    pub metadata_uri: String,
}

pub async fn run(client: &PinataClient, request: &AssetRequest) -> Result<PinnedAsset, UploadError> {
    pin_asset(client, request).await.map_err(|err| {
        error!("Error in pipeline: {}", err);
        err
    })
}

async fn pin_asset(client: &PinataClient, request: &AssetRequest) -> Result<PinnedAsset, UploadError> {
    request.validate()?;

    info!(image_url = %request.image_url, "Pinning image");
    let image_uri = client.upload_image_url(&request.image_url).await?;

    info!(name = %request.name, "Pinning metadata");
    let metadata_uri = client
        .upload_metadata(&image_uri, &request.name, &request.description)
        .await?;

    Ok(PinnedAsset {
        image_uri,
        metadata_uri,
    })
}
