/*!
This module contains the struct definition of the dataset file.
They are used to deserialize the JSON listing of the galaxies into Rust structs.
 */
use std::{fmt, path::Path, fs::File, io::BufReader};

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum Label {
    Scalar(f64),
    Class(String),
    Vector(Vec<f64>),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Scalar(value) => write!(f, "{}", value),
            Label::Class(class) => write!(f, "{}", class),
            Label::Vector(values) => {
                let values = values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
                write!(f, "[{}]", values.join(","))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Sample {
    pub(crate) id: String,
    pub(crate) label: Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Partition {
    Train,
    Valid,
}

impl Partition {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Valid => "valid",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Dataset {
    pub(crate) train: Vec<Sample>,
    #[serde(default)]
    pub(crate) valid: Vec<Sample>,
}

impl Dataset {
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(file)?)
    }

    /// Train partition fully before the validation partition, each in file order
    pub(crate) fn samples(&self) -> Vec<(Partition, &Sample)> {
        self.train.iter().map(|sample| (Partition::Train, sample))
            .chain(self.valid.iter().map(|sample| (Partition::Valid, sample)))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.train.len() + self.valid.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_of_every_shape_deserialize() {
        let json = r#"{
            "train": [
                {"id": "100008", "label": 1},
                {"id": "100023", "label": "spiral"}
            ],
            "valid": [
                {"id": "100053", "label": [0.25, 0.75]}
            ]
        }"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.train[0].label, Label::Scalar(1.0));
        assert_eq!(dataset.train[1].label, Label::Class("spiral".to_string()));
        assert_eq!(dataset.valid[0].label.to_string(), "[0.25,0.75]");
    }

    #[test]
    fn samples_keep_train_before_valid() {
        let json = r#"{
            "train": [{"id": "b", "label": 0}, {"id": "a", "label": 1}],
            "valid": [{"id": "c", "label": 0}]
        }"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();

        let order = dataset.samples().into_iter()
            .map(|(partition, sample)| (partition, sample.id.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(order, vec![
            (Partition::Train, "b"),
            (Partition::Train, "a"),
            (Partition::Valid, "c"),
        ]);
    }

    #[test]
    fn missing_valid_partition_is_empty() {
        let dataset: Dataset = serde_json::from_str(r#"{"train": []}"#).unwrap();
        assert!(dataset.valid.is_empty());
        assert_eq!(dataset.len(), 0);
    }
}
