use contracts::domain::a030_order_line::OrderLine;
use std::collections::BTreeSet;

use crate::shared::error::DashboardError;

/// Non-empty set of purchase years chosen in the dashboard filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSelection {
    years: BTreeSet<i32>,
}

impl YearSelection {
    /// Fails with `NoYearsSelected` when nothing is selected
    pub fn new(years: impl IntoIterator<Item = i32>) -> Result<Self, DashboardError> {
        let years: BTreeSet<i32> = years.into_iter().collect();
        if years.is_empty() {
            return Err(DashboardError::NoYearsSelected);
        }
        Ok(Self { years })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    /// Selected years, ascending
    pub fn years(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }
}

/// Rows purchased in one of the selected years, in input order
pub fn filter_by_years(lines: &[OrderLine], selection: &YearSelection) -> Vec<OrderLine> {
    let filtered: Vec<OrderLine> = lines
        .iter()
        .filter(|line| selection.contains(line.purchase_year()))
        .cloned()
        .collect();

    tracing::debug!(
        "Year filter {:?}: kept {} of {} rows",
        selection.years,
        filtered.len(),
        lines.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d410_sales_overview::test_support::line;

    #[test]
    fn test_empty_selection_is_rejected() {
        let err = YearSelection::new(Vec::new()).unwrap_err();
        assert!(matches!(err, DashboardError::NoYearsSelected));
    }

    #[test]
    fn test_selection_deduplicates_and_sorts() {
        let selection = YearSelection::new([2018, 2016, 2018]).unwrap();
        assert_eq!(selection.years(), vec![2016, 2018]);
    }

    #[test]
    fn test_filter_keeps_selected_years_in_order() {
        let lines = vec![
            line("2017-01-10 10:00:00", "a", Some("toys"), "SP", 1, 10.0, Some(5)),
            line("2018-02-10 10:00:00", "b", Some("toys"), "RJ", 1, 10.0, Some(4)),
            line("2017-12-31 23:59:59", "c", Some("toys"), "BA", 1, 10.0, Some(3)),
            line("2016-06-01 00:00:00", "d", Some("toys"), "SP", 1, 10.0, Some(2)),
        ];
        let selection = YearSelection::new([2017]).unwrap();

        let filtered = filter_by_years(&lines, &selection);

        let ids: Vec<&str> = filtered.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let lines = vec![
            line("2017-01-10 10:00:00", "a", Some("toys"), "SP", 1, 10.0, Some(5)),
            line("2018-02-10 10:00:00", "b", Some("toys"), "RJ", 2, 10.0, Some(4)),
            line("2016-06-01 00:00:00", "c", None, "SP", 1, 10.0, None),
        ];
        let selection = YearSelection::new([2017, 2018]).unwrap();

        let once = filter_by_years(&lines, &selection);
        let twice = filter_by_years(&once, &selection);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_year_absent_from_data_yields_empty_view() {
        let lines = vec![line("2017-01-10 10:00:00", "a", Some("toys"), "SP", 1, 10.0, Some(5))];
        let selection = YearSelection::new([2020]).unwrap();

        assert!(filter_by_years(&lines, &selection).is_empty());
    }
}
