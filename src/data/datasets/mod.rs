mod feature;

pub use feature::{DATA_KEY, FeatureDataset, LABEL_KEY};
