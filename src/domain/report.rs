use bigdecimal::BigDecimal;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct DailySales {
    pub date: NaiveDate,
    pub orders: i64,
    pub revenue: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct ProductSales {
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue: BigDecimal,
}

/// Sales aggregate over a date range. Orders count as revenue once they
/// reach PAID or later; the bucketing date is paid_at falling back to
/// created_at.
#[derive(Debug, Clone)]
pub struct SalesReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_transactions: i64,
    pub total_revenue: BigDecimal,
    pub daily: Vec<DailySales>,
    pub top_products: Vec<ProductSales>,
}
