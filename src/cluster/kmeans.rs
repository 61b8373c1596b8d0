use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1, Axis};
use rand::{rngs::StdRng, seq::index::sample, SeedableRng};
use serde::Serialize;

use crate::{
    config::KMeansConfig,
    error::{Error, Result},
    zone::{NormMeta, ZoneTable},
};

/// Centroids closer than this between iterations (in every coordinate) count as converged.
const TOLERANCE: f64 = 1e-4;

/// One k-means cluster.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cluster {
    pub id: usize,
    pub members: Vec<String>,
    /// Raw feature name -> centroid value on the original scale.
    pub centroid: BTreeMap<String, f64>,
}

/// Outcome of a k-means run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KMeansResult {
    pub k: usize,
    /// Number of assignment/update rounds performed.
    pub iterations: usize,
    pub clusters: Vec<Cluster>,
}

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the nearest centroid; the lowest index wins ties.
fn nearest(point: ArrayView1<f64>, centroids: &Array2<f64>) -> usize {
    centroids.rows().into_iter()
        .map(|c| squared_distance(point, c))
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, d)| if d < best.1 { (i, d) } else { best })
        .0
}

/// Cluster the zones of `table` on their normalized features.
///
/// Initial centroids are `k` distinct rows drawn with a generator seeded from `config.seed`,
/// so identical inputs and seeds always give identical clusters. A centroid that loses all
/// of its members keeps its previous position.
pub fn kmeans(table: &ZoneTable, meta: &NormMeta, config: &KMeansConfig) -> Result<KMeansResult> {
    let n = table.len();
    config.validate(n)?;
    let k = config.k;

    let columns = meta.iter()
        .map(|(name, range)| {
            table.feature_index(name)
                .map(|col| (name, range, col))
                .ok_or_else(|| Error::upstream(format!("normalized feature {name} is missing from the zone table")))
        })
        .collect::<Result<Vec<_>>>()?;

    let d = table.feature_names().len();
    let data = Array2::from_shape_vec(
        (n, d),
        table.zones().iter().flat_map(|z| z.features().iter().copied()).collect(),
    ).map_err(|e| Error::invariant(format!("feature matrix shape: {e}")))?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let initial = sample(&mut rng, n, k).into_vec();
    let mut centroids = data.select(Axis(0), &initial);
    let mut labels = vec![0usize; n];

    let mut iterations = 0;
    for _ in 0..config.max_iter {
        iterations += 1;
        let new_labels = data.rows().into_iter().map(|p| nearest(p, &centroids)).collect::<Vec<_>>();

        let mut new_centroids = centroids.clone();
        for c in 0..k {
            let members = (0..n).filter(|&i| new_labels[i] == c).collect::<Vec<_>>();
            if members.is_empty() { continue }
            if let Some(mean) = data.select(Axis(0), &members).mean_axis(Axis(0)) {
                new_centroids.row_mut(c).assign(&mean);
            }
        }

        let converged = new_centroids.iter().zip(centroids.iter()).all(|(a, b)| (a - b).abs() < TOLERANCE);
        labels = new_labels;
        centroids = new_centroids;
        if converged { break }
    }
    tracing::debug!(k, iterations, seed = config.seed, "k-means finished");

    let clusters = (0..k)
        .map(|c| Cluster {
            id: c,
            members: (0..n).filter(|&i| labels[i] == c).map(|i| table.zones()[i].id().to_string()).collect(),
            centroid: columns.iter()
                .map(|&(name, range, col)| (name.clone(), range.denormalize(centroids[[c, col]])))
                .collect(),
        })
        .collect();

    Ok(KMeansResult { k, iterations, clusters })
}
