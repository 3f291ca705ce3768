use contracts::dashboards::d410_sales_overview::{
    QuantileBinning, RegionSalesRecord, RegionTier, SalesTier,
};

pub const LOWER_QUANTILE: f64 = 0.33;
pub const UPPER_QUANTILE: f64 = 0.66;

/// Quantile of ascending `sorted` values with linear interpolation
/// between the two closest ranks (`pos = q * (n - 1)`).
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Bin edges `[min, p33, p66, max]`
pub fn bin_edges(values: &[f64]) -> Option<[f64; 4]> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let min = *sorted.first()?;
    let max = *sorted.last()?;
    Some([
        min,
        quantile_linear(&sorted, LOWER_QUANTILE)?,
        quantile_linear(&sorted, UPPER_QUANTILE)?,
        max,
    ])
}

/// `[min, e1]` is Low, `(e1, e2]` Medium, `(e2, max]` High.
///
/// Coinciding edges leave empty bins, which collapse into the lower tier.
pub fn assign_tier(value: f64, edges: &[f64; 4]) -> SalesTier {
    if value <= edges[1] {
        SalesTier::Low
    } else if value <= edges[2] {
        SalesTier::Medium
    } else {
        SalesTier::High
    }
}

pub fn is_degenerate(edges: &[f64; 4]) -> bool {
    edges.windows(2).any(|pair| pair[0] == pair[1])
}

/// Tier every region by the tercile bins of its units sold
pub fn quantile_binning(mut records: Vec<RegionSalesRecord>) -> QuantileBinning {
    let values: Vec<f64> = records.iter().map(|r| r.total_units_sold as f64).collect();

    let Some(edges) = bin_edges(&values) else {
        return QuantileBinning {
            edges: None,
            degenerate: false,
            records,
        };
    };

    let degenerate = is_degenerate(&edges);
    if degenerate {
        tracing::warn!(
            "Quantile bin edges coincide ({:?}) for {} regions; empty bins collapse downward",
            edges,
            records.len()
        );
    }

    for record in &mut records {
        let tier = assign_tier(record.total_units_sold as f64, &edges);
        record.tier = Some(RegionTier::Sales(tier));
    }

    QuantileBinning {
        edges: Some(edges),
        degenerate,
        records,
    }
}
