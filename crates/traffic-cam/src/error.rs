use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Camera client error: {0}")]
    Client(#[from] traffic_cam_client::error::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("API error: {0}")]
    Api(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("General error: {0}")]
    General(String),
}
