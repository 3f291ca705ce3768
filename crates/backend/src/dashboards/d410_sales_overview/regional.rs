use contracts::dashboards::d410_sales_overview::RegionSalesRecord;
use contracts::domain::a030_order_line::OrderLine;
use contracts::enums::region_code::RegionCode;
use indexmap::IndexMap;

/// Units sold per customer region.
///
/// One record per region present in `lines`, in first-encountered order.
/// Regions without rows are absent, not zero-filled. Tiers are left empty.
pub fn units_by_region(lines: &[OrderLine]) -> Vec<RegionSalesRecord> {
    let mut totals: IndexMap<&RegionCode, u64> = IndexMap::new();
    for line in lines {
        *totals.entry(&line.customer_state).or_insert(0) += u64::from(line.order_item_id);
    }

    let unmapped = totals.keys().filter(|code| !code.is_mapped()).count();
    if unmapped > 0 {
        tracing::warn!("{} region codes outside the known set", unmapped);
    }

    totals
        .into_iter()
        .map(|(state_code, total_units_sold)| RegionSalesRecord {
            state_code: state_code.clone(),
            total_units_sold,
            tier: None,
        })
        .collect()
}
