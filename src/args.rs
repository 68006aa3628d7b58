use std::{path::PathBuf, process::exit};
use clap::Parser;
use log::{error, LevelFilter};

use crate::{
    consts::{COHERENCE_THRESHOLD, NB_COLORS},
    features::FeatureConfig,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FeatureSet{
    Geometry,
    Ccv,
    Stats,
    Histogram,
}

impl std::str::FromStr for FeatureSet{
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "geometry" => Ok(FeatureSet::Geometry),
            "ccv" => Ok(FeatureSet::Ccv),
            "stats" => Ok(FeatureSet::Stats),
            "histogram" => Ok(FeatureSet::Histogram),
            _ => Err(format!("{} is not a valid feature set", s)),
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct Args{
    /// Dataset file (.json) : {"train": [{"id", "label"}...], "valid": [...]}
    pub dataset: PathBuf,
    /// Image base path :
    /// images are read from <images><id>.jpg, include the trailing separator for a directory
    pub images: String,
    /// Output file (polars compatible formats : .csv, .parquet, .ipc, .arrow, .json)
    pub output: PathBuf,
    /// Overwrite :
    /// if specified, will overwrite the output file if it already exists
    #[clap(short, long)]
    pub overwrite: bool,
    /// Feature sets :
    /// comma separated list among geometry, ccv, stats, histogram
    /// the sets are always written in that order
    #[clap(short = 's', long, value_delimiter = ',', default_value = "geometry,ccv")]
    pub feature_sets: Vec<FeatureSet>,
    /// Number of colors :
    /// quantization bins per channel of the color coherence vector
    #[clap(short, long, default_value_t = NB_COLORS)]
    pub nb_colors: u32,
    /// Coherence threshold :
    /// minimum area (in pixels) of a coherent region
    #[clap(short, long, default_value_t = COHERENCE_THRESHOLD)]
    pub coherence_threshold: u32,
    /// Thread count :
    /// the number of threads used by rayon
    /// if not specified, rayon will use the number of cores available on the machine
    #[clap(short, long)]
    pub thread_count: Option<usize>,
    /// Failures :
    /// if specified, the samples that failed are reported in this file (.json)
    #[clap(short, long)]
    pub failures: Option<PathBuf>,
    /// verbose :
    /// if specified, will print more information
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args{
    pub fn handle_verbose(&self){
        let level = if self.verbose { LevelFilter::Debug } else { LevelFilter::Info };
        pretty_env_logger::formatted_builder()
            .filter_level(level)
            .init();
        if !self.verbose{return}
        println!("Called Args :");
        println!("{:#?}", self);
    }

    pub fn handle_thread_count(&self){
        if let Some(thread_count) = self.thread_count {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(thread_count)
                .build_global();
            if let Err(err) = pool {
                error!("Couldn't build the thread pool : {}", err);
                exit(1);
            }
        }
    }

    pub fn validate_paths(&self){
        if !self.dataset.exists(){
            error!("Dataset file does not exist : {:?}", self.dataset);
            exit(1);
        }

        if self.output.exists(){
            if !self.overwrite{
                error!("Output file already exists : {:?}\nUse --overwrite to overwrite it", self.output);
                exit(1);
            }
        }
    }

    pub fn feature_config(&self) -> FeatureConfig{
        let config = FeatureConfig {
            nb_colors: self.nb_colors,
            coherence_threshold: self.coherence_threshold,
            ..FeatureConfig::default()
        }.with_feature_sets(&self.feature_sets);

        if let Err(err) = config.validate(){
            error!("{}", err);
            exit(1);
        }
        config
    }
}

lazy_static::lazy_static! {
    pub static ref ARGS: Args = Args::parse();
}
