use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AuthContext;
use crate::domain::report::SalesReport;
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SalesReportParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailySalesResponse {
    pub date: NaiveDate,
    pub orders: i64,
    pub revenue: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSalesResponse {
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalesReportResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_transactions: i64,
    pub total_revenue: String,
    pub daily: Vec<DailySalesResponse>,
    pub top_products: Vec<ProductSalesResponse>,
}

impl From<SalesReport> for SalesReportResponse {
    fn from(report: SalesReport) -> Self {
        SalesReportResponse {
            start_date: report.start,
            end_date: report.end,
            total_transactions: report.total_transactions,
            total_revenue: report.total_revenue.to_string(),
            daily: report
                .daily
                .into_iter()
                .map(|day| DailySalesResponse {
                    date: day.date,
                    orders: day.orders,
                    revenue: day.revenue.to_string(),
                })
                .collect(),
            top_products: report
                .top_products
                .into_iter()
                .map(|product| ProductSalesResponse {
                    product_name: product.product_name,
                    quantity_sold: product.quantity_sold,
                    revenue: product.revenue.to_string(),
                })
                .collect(),
        }
    }
}

/// GET /reports/sales
///
/// Revenue summary over a date range for staff: orders in PAID or later,
/// bucketed by paid_at falling back to created_at.
#[utoipa::path(
    get,
    path = "/reports/sales",
    params(
        ("start_date" = NaiveDate, Query, description = "Range start (YYYY-MM-DD)"),
        ("end_date" = NaiveDate, Query, description = "Range end (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Sales report", body = SalesReportResponse),
        (status = 400, description = "Inverted date range"),
        (status = 403, description = "Caller is not staff"),
    ),
    tag = "reports"
)]
pub async fn sales_report(
    state: web::Data<AppState>,
    auth: AuthContext,
    query: web::Query<SalesReportParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let report = web::block(move || {
        state
            .reports
            .sales(&auth, params.start_date, params.end_date)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(SalesReportResponse::from(report)))
}
