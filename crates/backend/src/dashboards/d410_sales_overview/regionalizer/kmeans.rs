//! Region clustering with standardized k-means.
//!
//! Units sold per region are scaled to zero mean and unit (population)
//! variance, then clustered with [`linfa_clustering::KMeans`]. The elbow
//! curve sweeps k = 1..=9; the tier assignment uses k = 3.

use contracts::dashboards::d410_sales_overview::{
    ElbowPoint, KMeansClustering, RegionSalesRecord, RegionTier,
};
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::shared::error::DashboardError;

/// Clusters used for the tier assignment
pub const FINAL_CLUSTERS: usize = 3;
/// Elbow sweep covers k = 1..=ELBOW_MAX_K
pub const ELBOW_MAX_K: usize = 9;
/// Independent initializations per fit; the lowest inertia wins
pub const N_RUNS: usize = 10;
pub const SEED: u64 = 42;
pub const TOLERANCE: f64 = 1e-4;
pub const MAX_ITERATIONS: u64 = 300;

/// Result of one k-means fit on a single feature
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    pub labels: Vec<usize>,
    /// Within-cluster sum of squared distances
    pub inertia: f64,
}

/// Zero mean, unit population variance. A constant input maps to zeros.
pub fn standardize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();
    let scale = if std == 0.0 { 1.0 } else { std };
    values.iter().map(|v| (v - mean) / scale).collect()
}

fn sorted_distinct(values: &[f64]) -> Vec<f64> {
    let mut distinct = values.to_vec();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    distinct
}

/// One cluster per distinct value, labelled by ascending rank. Zero inertia.
fn partition_by_value(values: &[f64]) -> KMeansFit {
    let distinct = sorted_distinct(values);
    let labels = values
        .iter()
        .map(|v| distinct.partition_point(|d| d < v))
        .collect();
    KMeansFit {
        labels,
        inertia: 0.0,
    }
}

/// Fit k-means with the pinned seed, run count, tolerance and iteration cap.
///
/// When `k` reaches the number of distinct values the trivial partition is
/// already optimal and the clustering library is not called.
pub fn fit_kmeans(values: &[f64], k: usize) -> Result<KMeansFit, DashboardError> {
    if values.is_empty() {
        return Ok(KMeansFit {
            labels: Vec::new(),
            inertia: 0.0,
        });
    }
    if k == 0 {
        return Err(DashboardError::Clustering("k must be at least 1".to_string()));
    }
    if k >= sorted_distinct(values).len() {
        return Ok(partition_by_value(values));
    }

    let records = Array2::from_shape_vec((values.len(), 1), values.to_vec())
        .map_err(|e| DashboardError::Clustering(e.to_string()))?;
    let dataset = DatasetBase::from(records.clone());

    let model: KMeans<f64, L2Dist> = KMeans::params_with_rng(k, StdRng::seed_from_u64(SEED))
        .n_runs(N_RUNS)
        .tolerance(TOLERANCE)
        .max_n_iterations(MAX_ITERATIONS)
        .fit(&dataset)
        .map_err(|e| DashboardError::Clustering(e.to_string()))?;

    let labels: Array1<usize> = model.predict(&records);
    let centroids = model.centroids();
    let inertia = values
        .iter()
        .zip(labels.iter())
        .map(|(v, &label)| (v - centroids[[label, 0]]).powi(2))
        .sum();

    Ok(KMeansFit {
        labels: labels.to_vec(),
        inertia,
    })
}

/// Inertia for every k in 1..=ELBOW_MAX_K
pub fn elbow_curve(scaled: &[f64]) -> Result<Vec<ElbowPoint>, DashboardError> {
    (1..=ELBOW_MAX_K)
        .map(|k| {
            let fit = fit_kmeans(scaled, k)?;
            tracing::debug!("Elbow k={}: inertia {:.4}", k, fit.inertia);
            Ok(ElbowPoint {
                k,
                inertia: fit.inertia,
            })
        })
        .collect()
}

/// Cluster regions by standardized units sold
pub fn kmeans_clustering(
    mut records: Vec<RegionSalesRecord>,
) -> Result<KMeansClustering, DashboardError> {
    let values: Vec<f64> = records.iter().map(|r| r.total_units_sold as f64).collect();
    let scaled = standardize(&values);

    let elbow = elbow_curve(&scaled)?;
    let fit = fit_kmeans(&scaled, FINAL_CLUSTERS)?;

    for (record, label) in records.iter_mut().zip(fit.labels) {
        record.tier = Some(RegionTier::Cluster(label));
    }

    tracing::info!(
        "Clustered {} regions into {} clusters (inertia {:.4})",
        records.len(),
        FINAL_CLUSTERS,
        fit.inertia
    );

    Ok(KMeansClustering { elbow, records })
}
