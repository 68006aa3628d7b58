use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("Couldn't decode image {path} : {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Image of {width}x{height} is too small for a {crop}x{crop} crop")]
    ImageTooSmall { width: u32, height: u32, crop: u32 },
    #[error("Degenerate geometry : {0}")]
    DegenerateGeometry(&'static str),
    #[error("Configuration mismatch : {0}")]
    ConfigurationMismatch(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

impl Serialize for FeatureError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type Result<T> = std::result::Result<T, FeatureError>;
