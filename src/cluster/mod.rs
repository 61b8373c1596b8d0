mod kmeans;

pub use kmeans::{kmeans, Cluster, KMeansResult};
