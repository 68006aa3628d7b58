use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    dataset::{Partition, Sample},
    error::FeatureError,
    features::{all_features, FeatureConfig, FeatureVector},
    input::ImageLoader,
};

#[derive(Debug)]
pub(crate) struct Row {
    pub(crate) id: String,
    pub(crate) partition: Partition,
    pub(crate) label: String,
    pub(crate) vector: FeatureVector,
}

/// A sample that could not be processed, or only partially
#[derive(Debug, Serialize)]
pub(crate) struct SampleFailure {
    pub(crate) id: String,
    pub(crate) partition: Partition,
    pub(crate) error: FeatureError,
}

#[derive(Debug, Default)]
pub(crate) struct Extraction {
    pub(crate) rows: Vec<Row>,
    pub(crate) failures: Vec<SampleFailure>,
}

/**
Compute the features of every sample.
The samples are processed in parallel but the rows keep the order of `samples`.
A sample whose image can't be loaded has no row, a sample with a degenerate shape keeps
its row with sentinel values. Both are recorded in the failures.
 */
pub(crate) fn extract_all(
    samples: &[(Partition, &Sample)],
    loader: &ImageLoader,
    config: &FeatureConfig,
) -> Extraction {
    let outcomes = samples
        .par_iter()
        .map(|(partition, sample)| {
            debug!("Processing sample {}", sample.id);
            let extracted = loader(&sample.id).and_then(|image| all_features(&image, config));
            (*partition, *sample, extracted)
        })
        .collect::<Vec<_>>();

    let mut extraction = Extraction::default();
    for (partition, sample, extracted) in outcomes {
        let failure = |error: FeatureError| {
            warn!("Sample {} ({}) : {}", sample.id, partition.as_str(), error);
            SampleFailure { id: sample.id.clone(), partition, error }
        };
        match extracted {
            Ok(extracted) => {
                extraction.failures.extend(extracted.issues.into_iter().map(failure));
                extraction.rows.push(Row {
                    id: sample.id.clone(),
                    partition,
                    label: sample.label.to_string(),
                    vector: extracted.features.to_vector(),
                });
            }
            Err(error) => extraction.failures.push(failure(error)),
        }
    }
    extraction
}
