use contracts::dashboards::d410_sales_overview::{
    ProductDrilldown, Regionalization, RegionsRequest, SalesOverviewRequest,
    SalesOverviewResponse,
};
use contracts::domain::a030_order_line::OrderLine;

use super::year_filter::{filter_by_years, YearSelection};
use super::{category, metrics, regional, regionalizer};
use crate::shared::data::dataset_loader::{available_years, distinct_categories, OrderLineSource};
use crate::shared::error::DashboardError;
use crate::shared::format::format_amount;

/// Full dashboard recomputation: load, filter, derive, aggregate, regionalize.
///
/// The year selection is validated first, so an empty selection returns
/// `NoYearsSelected` before anything is loaded or aggregated.
pub fn build_overview<S: OrderLineSource + ?Sized>(
    source: &S,
    request: &SalesOverviewRequest,
) -> Result<SalesOverviewResponse, DashboardError> {
    // Validate inputs before touching the dataset
    let selection = YearSelection::new(request.years.iter().copied())?;
    let lines = source.load()?;

    if let Some(selected) = &request.category {
        ensure_category_exists(&lines, selected)?;
    }

    let filtered = filter_by_years(&lines, &selection);

    // Headline totals
    let headline = metrics::headline_metrics(&filtered);
    tracing::info!(
        "D410: {} rows, revenue {}, units {}",
        filtered.len(),
        format_amount(headline.total_revenue),
        headline.total_units_sold
    );

    let product_drilldown = request.category.as_ref().map(|selected| ProductDrilldown {
        category: selected.clone(),
        top_products: category::top_products_in_category(&filtered, selected),
    });

    // Regional breakdown with the requested strategy
    let regions = regionalizer::regionalize(
        regional::units_by_region(&filtered),
        request.strategy,
    )?;

    Ok(SalesOverviewResponse {
        years: selection.years(),
        headline,
        top_categories_by_units: category::top_categories_by_units(&filtered),
        top_categories_by_revenue: category::top_categories_by_revenue(&filtered),
        product_drilldown,
        monthly_sales_trend: category::monthly_sales_trend(&filtered),
        monthly_review_trend: category::monthly_review_trend(&filtered),
        category_review_means: category::category_review_means(&filtered),
        regions,
    })
}

/// Regional breakdown only
pub fn build_regions<S: OrderLineSource + ?Sized>(
    source: &S,
    request: &RegionsRequest,
) -> Result<Regionalization, DashboardError> {
    let selection = YearSelection::new(request.years.iter().copied())?;
    let lines = source.load()?;
    let filtered = filter_by_years(&lines, &selection);

    regionalizer::regionalize(regional::units_by_region(&filtered), request.strategy)
}

/// Years offered by the year filter
pub fn list_years<S: OrderLineSource + ?Sized>(source: &S) -> Result<Vec<i32>, DashboardError> {
    Ok(available_years(&source.load()?))
}

/// Categories offered by the drill-down selector
pub fn list_categories<S: OrderLineSource + ?Sized>(
    source: &S,
) -> Result<Vec<String>, DashboardError> {
    Ok(distinct_categories(&source.load()?))
}

fn ensure_category_exists(lines: &[OrderLine], category: &str) -> Result<(), DashboardError> {
    if lines.iter().any(|line| line.category() == Some(category)) {
        Ok(())
    } else {
        Err(DashboardError::UnknownCategory(category.to_string()))
    }
}
