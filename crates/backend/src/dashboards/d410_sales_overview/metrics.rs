use contracts::dashboards::d410_sales_overview::HeadlineMetrics;
use contracts::domain::a030_order_line::OrderLine;

/// Per-row revenue: `price * order_item_id`
pub fn revenue(line: &OrderLine) -> f64 {
    line.price * f64::from(line.order_item_id)
}

/// Revenue of every row, parallel to the input
pub fn derive_revenue(lines: &[OrderLine]) -> Vec<f64> {
    lines.iter().map(revenue).collect()
}

/// Headline totals. Empty input yields all zeros.
pub fn headline_metrics(lines: &[OrderLine]) -> HeadlineMetrics {
    let mut metrics = HeadlineMetrics::default();

    for line in lines {
        metrics.total_revenue += revenue(line);
        // Raw sum, not a mean
        metrics.total_review_score += line.review_score.map(u64::from).unwrap_or(0);
        metrics.total_units_sold += u64::from(line.order_item_id);
    }

    metrics
}
