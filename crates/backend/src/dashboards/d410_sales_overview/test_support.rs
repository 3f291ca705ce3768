use chrono::NaiveDateTime;
use contracts::domain::a030_order_line::OrderLine;
use contracts::enums::region_code::RegionCode;

/// Builds an order line for tests; `ts` is `YYYY-MM-DD HH:MM:SS`
pub fn line(
    ts: &str,
    product_id: &str,
    category: Option<&str>,
    state: &str,
    order_item_id: u32,
    price: f64,
    review_score: Option<u8>,
) -> OrderLine {
    OrderLine {
        order_purchase_timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
            .expect("test timestamp"),
        product_id: product_id.to_string(),
        product_category_name_english: category.map(str::to_string),
        customer_state: RegionCode::from_code(state),
        order_item_id,
        price,
        review_score,
    }
}
