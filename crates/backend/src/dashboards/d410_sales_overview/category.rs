use contracts::dashboards::d410_sales_overview::{
    CategoryReview, MonthlyReview, MonthlyTrend, RankedEntry,
};
use contracts::domain::a030_order_line::OrderLine;
use indexmap::IndexMap;
use std::collections::BTreeMap;

use super::metrics::revenue;

/// Length of every ranked table
pub const TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Ranked tables
// ---------------------------------------------------------------------------

/// Top categories by units sold (sum of `order_item_id`)
pub fn top_categories_by_units(lines: &[OrderLine]) -> Vec<RankedEntry> {
    let groups = sum_by_key(
        lines
            .iter()
            .filter_map(|line| line.category().map(|c| (c, f64::from(line.order_item_id)))),
    );
    rank_top_n(groups, TOP_N)
}

/// Top categories by revenue
pub fn top_categories_by_revenue(lines: &[OrderLine]) -> Vec<RankedEntry> {
    let groups = sum_by_key(
        lines
            .iter()
            .filter_map(|line| line.category().map(|c| (c, revenue(line)))),
    );
    rank_top_n(groups, TOP_N)
}

/// Top products by units sold within one category
pub fn top_products_in_category(lines: &[OrderLine], category: &str) -> Vec<RankedEntry> {
    let groups = sum_by_key(
        lines
            .iter()
            .filter(|line| line.category() == Some(category))
            .map(|line| (line.product_id.as_str(), f64::from(line.order_item_id))),
    );
    rank_top_n(groups, TOP_N)
}

/// Sums values per key; groups keep the order in which keys first appear
pub fn sum_by_key<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Vec<RankedEntry> {
    let mut groups: IndexMap<&str, f64> = IndexMap::new();
    for (key, value) in pairs {
        *groups.entry(key).or_insert(0.0) += value;
    }
    groups
        .into_iter()
        .map(|(key, value)| RankedEntry::new(key, value))
        .collect()
}

/// Sorts descending by value and keeps the first `n`.
///
/// The sort is stable, so ties stay in first-encountered order and
/// re-ranking an already ranked table is a no-op.
pub fn rank_top_n(mut entries: Vec<RankedEntry>, n: usize) -> Vec<RankedEntry> {
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries.truncate(n);
    entries
}

// ---------------------------------------------------------------------------
// Monthly trends
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MonthBucket {
    units: u64,
    review_sum: u64,
    review_count: u64,
}

impl MonthBucket {
    fn avg_review(&self) -> Option<f64> {
        mean(self.review_sum, self.review_count)
    }
}

/// Calendar-month buckets, chronological. Months without rows never appear.
fn month_buckets(lines: &[OrderLine]) -> BTreeMap<(i32, u32), MonthBucket> {
    let mut buckets: BTreeMap<(i32, u32), MonthBucket> = BTreeMap::new();
    for line in lines {
        let bucket = buckets.entry(line.purchase_month()).or_default();
        bucket.units += u64::from(line.order_item_id);
        if let Some(score) = line.review_score {
            bucket.review_sum += u64::from(score);
            bucket.review_count += 1;
        }
    }
    buckets
}

/// Month label in format "YYYY-MM"
pub fn format_period(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Units sold and mean review per month (dual-axis trend)
pub fn monthly_sales_trend(lines: &[OrderLine]) -> Vec<MonthlyTrend> {
    month_buckets(lines)
        .into_iter()
        .map(|((year, month), bucket)| MonthlyTrend {
            period: format_period(year, month),
            units_sold: bucket.units,
            avg_review_score: bucket.avg_review(),
        })
        .collect()
}

/// Mean review per month
pub fn monthly_review_trend(lines: &[OrderLine]) -> Vec<MonthlyReview> {
    month_buckets(lines)
        .into_iter()
        .map(|((year, month), bucket)| MonthlyReview {
            period: format_period(year, month),
            avg_review_score: bucket.avg_review(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category reviews
// ---------------------------------------------------------------------------

/// Mean review per category, every category, ordered by category name
pub fn category_review_means(lines: &[OrderLine]) -> Vec<CategoryReview> {
    let mut groups: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for line in lines {
        let Some(category) = line.category() else {
            continue;
        };
        let (sum, count) = groups.entry(category).or_insert((0, 0));
        if let Some(score) = line.review_score {
            *sum += u64::from(score);
            *count += 1;
        }
    }

    groups
        .into_iter()
        .map(|(category, (sum, count))| CategoryReview {
            category: category.to_string(),
            avg_review_score: mean(sum, count),
        })
        .collect()
}

fn mean(sum: u64, count: u64) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}
