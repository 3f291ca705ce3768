use crate::enums::region_code::RegionCode;
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One line of the merged orders dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_purchase_timestamp: NaiveDateTime,
    pub product_id: String,
    /// `None` when the product has no translated category
    pub product_category_name_english: Option<String>,
    pub customer_state: RegionCode,
    /// Summed as a unit count by every aggregation
    pub order_item_id: u32,
    pub price: f64,
    /// `None` when the order was never reviewed
    pub review_score: Option<u8>,
}

impl OrderLine {
    pub fn purchase_year(&self) -> i32 {
        self.order_purchase_timestamp.year()
    }

    /// Calendar month bucket as `(year, month)`
    pub fn purchase_month(&self) -> (i32, u32) {
        let ts = &self.order_purchase_timestamp;
        (ts.year(), ts.month())
    }

    pub fn category(&self) -> Option<&str> {
        self.product_category_name_english.as_deref()
    }
}
