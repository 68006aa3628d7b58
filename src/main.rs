mod args;
pub mod consts;
mod dataset;
mod error;
mod extraction;
mod features;
mod input;
mod output;
mod utils;

use std::process::exit;

use log::{error, info, warn};

use crate::{
    args::ARGS,
    dataset::Dataset,
    extraction::extract_all,
    input::ImageStore,
    output::{to_dataframe, write_dataframe, write_failures},
};

fn main() {
    let args = &*ARGS;
    args.handle_verbose();
    args.handle_thread_count();
    args.validate_paths();
    let config = args.feature_config();

    let dataset = match Dataset::from_path(&args.dataset) {
        Ok(ok) => ok,
        Err(err) => {
            error!("Couldn't read the dataset : {}", err);
            exit(1);
        },
    };
    info!("{} train and {} valid samples", dataset.train.len(), dataset.valid.len());
    info!("Feature sets : {:?}", config.feature_sets());

    let store = ImageStore::new(args.images.clone());
    let loader = store.loader();
    let samples = dataset.samples();
    let extraction = extract_all(&samples, &loader, &config);
    info!(
        "Extracted {} feature vectors of {} values out of {} samples",
        extraction.rows.len(),
        config.columns().len(),
        dataset.len()
    );

    let mut df = match to_dataframe(&extraction.rows, &config.columns()) {
        Ok(ok) => ok,
        Err(err) => {
            error!("Couldn't build the feature table : {}", err);
            exit(1);
        },
    };
    if let Err(err) = write_dataframe(&mut df, &args.output) {
        error!("Couldn't write {:?} : {}", args.output, err);
        exit(1);
    }

    if extraction.failures.is_empty() {
        return;
    }
    warn!("{} samples had failures", extraction.failures.len());
    if let Some(path) = &args.failures {
        if let Err(err) = write_failures(&extraction.failures, path) {
            error!("Couldn't write {:?} : {}", path, err);
            exit(1);
        }
    }
}
