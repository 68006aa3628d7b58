use image::RgbImage;

use crate::consts::IMAGE_EXTENSION;
use crate::error::{FeatureError, Result};

/// Given a sample id, returns the decoded image of the sample
pub(crate) type ImageLoader = Box<dyn Fn(&str) -> Result<RgbImage> + Send + Sync>;

#[derive(Clone, Debug)]
pub struct ImageStore {
    base_path: String,
}

impl ImageStore {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self { base_path: base_path.into() }
    }

    /// The base path is a prefix, not a directory : `base_path + id + ".jpg"`
    pub fn path_for(&self, id: &str) -> String {
        format!("{}{}{}", self.base_path, id, IMAGE_EXTENSION)
    }

    pub(crate) fn loader(&self) -> ImageLoader {
        let store = self.clone();
        Box::new(move |id: &str| store.load(id))
    }

    pub fn load(&self, id: &str) -> Result<RgbImage> {
        let path = self.path_for(id);
        match image::open(&path) {
            Ok(image) => Ok(image.to_rgb8()),
            Err(source) => Err(FeatureError::Decode { path, source }),
        }
    }
}
