use crate::enums::region_code::RegionCode;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Which heuristic assigns regions to tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegionalizationStrategy {
    /// Tercile bins over total units sold
    #[default]
    #[serde(rename = "quantile")]
    Quantile,
    /// Standardized k-means with k = 3
    #[serde(rename = "kmeans")]
    KMeans,
}

/// Request for the full sales overview dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOverviewRequest {
    /// Purchase years to keep. Must not be empty.
    pub years: Vec<i32>,
    /// Category for the per-product drill-down (optional)
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub strategy: RegionalizationStrategy,
}

/// Request for the regional breakdown only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionsRequest {
    pub years: Vec<i32>,
    #[serde(default)]
    pub strategy: RegionalizationStrategy,
}

// ---------------------------------------------------------------------------
// Metrics and rankings
// ---------------------------------------------------------------------------

/// Headline totals over the filtered rows
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadlineMetrics {
    /// Sum of `price * order_item_id`
    pub total_revenue: f64,
    /// Raw sum of review scores (not an average)
    pub total_review_score: u64,
    pub total_units_sold: u64,
}

/// One `(key, value)` pair of a ranked aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub key: String,
    pub value: f64,
}

impl RankedEntry {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Units sold per product inside one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDrilldown {
    pub category: String,
    pub top_products: Vec<RankedEntry>,
}

/// Mean review score for a calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReview {
    /// Month in format "YYYY-MM"
    pub period: String,
    /// `None` when no row of the month carries a review
    pub avg_review_score: Option<f64>,
}

/// Units sold and mean review for a calendar month (dual-axis trend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// Month in format "YYYY-MM"
    pub period: String,
    pub units_sold: u64,
    pub avg_review_score: Option<f64>,
}

/// Mean review score for one product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReview {
    pub category: String,
    pub avg_review_score: Option<f64>,
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// Ordered tier produced by quantile binning, serialized as its display label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SalesTier {
    #[serde(rename = "Low Sales Region")]
    Low,
    #[serde(rename = "Medium Sales Region")]
    Medium,
    #[serde(rename = "High Sales Region")]
    High,
}

impl SalesTier {
    pub fn all() -> [SalesTier; 3] {
        [SalesTier::Low, SalesTier::Medium, SalesTier::High]
    }
}

/// Tier annotation of a region. Cluster ids carry no ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum RegionTier {
    Sales(SalesTier),
    Cluster(usize),
}

/// Units sold in one customer region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSalesRecord {
    pub state_code: RegionCode,
    pub total_units_sold: u64,
    /// Filled by exactly one regionalization strategy
    pub tier: Option<RegionTier>,
}

/// One point of the elbow curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElbowPoint {
    pub k: usize,
    /// Within-cluster sum of squared distances on the standardized values
    pub inertia: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileBinning {
    /// `[min, p33, p66, max]`; `None` when there are no regions
    pub edges: Option<[f64; 4]>,
    /// Set when two or more edges coincide
    pub degenerate: bool,
    pub records: Vec<RegionSalesRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansClustering {
    /// Inertia for k = 1..=9
    pub elbow: Vec<ElbowPoint>,
    pub records: Vec<RegionSalesRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy")]
pub enum Regionalization {
    #[serde(rename = "quantile")]
    Quantile(QuantileBinning),
    #[serde(rename = "kmeans")]
    KMeans(KMeansClustering),
}

impl Regionalization {
    pub fn records(&self) -> &[RegionSalesRecord] {
        match self {
            Regionalization::Quantile(binning) => &binning.records,
            Regionalization::KMeans(clustering) => &clustering.records,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response for the sales overview dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOverviewResponse {
    /// Selected years, sorted
    pub years: Vec<i32>,
    pub headline: HeadlineMetrics,
    pub top_categories_by_units: Vec<RankedEntry>,
    pub top_categories_by_revenue: Vec<RankedEntry>,
    pub product_drilldown: Option<ProductDrilldown>,
    pub monthly_sales_trend: Vec<MonthlyTrend>,
    pub monthly_review_trend: Vec<MonthlyReview>,
    pub category_review_means: Vec<CategoryReview>,
    pub regions: Regionalization,
}

/// Error body returned by the dashboard endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardErrorResponse {
    /// Stable machine-readable code, e.g. "no_years_selected"
    pub code: String,
    pub message: String,
}
