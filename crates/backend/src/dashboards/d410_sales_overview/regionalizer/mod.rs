pub mod kmeans;
pub mod quantile;

use contracts::dashboards::d410_sales_overview::{
    RegionSalesRecord, Regionalization, RegionalizationStrategy,
};

use crate::shared::error::DashboardError;

/// Assign tiers with exactly one strategy
pub fn regionalize(
    records: Vec<RegionSalesRecord>,
    strategy: RegionalizationStrategy,
) -> Result<Regionalization, DashboardError> {
    match strategy {
        RegionalizationStrategy::Quantile => {
            Ok(Regionalization::Quantile(quantile::quantile_binning(records)))
        }
        RegionalizationStrategy::KMeans => {
            Ok(Regionalization::KMeans(kmeans::kmeans_clustering(records)?))
        }
    }
}
