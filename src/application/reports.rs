use chrono::NaiveDate;

use crate::domain::errors::DomainError;
use crate::domain::ports::{AuthContext, OrderRepository};
use crate::domain::report::SalesReport;

use super::require_staff;

pub struct ReportService<R> {
    orders: R,
}

impl<R: OrderRepository> ReportService<R> {
    pub fn new(orders: R) -> Self {
        Self { orders }
    }

    pub fn sales(
        &self,
        auth: &AuthContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SalesReport, DomainError> {
        require_staff(auth)?;
        if start > end {
            return Err(DomainError::Validation(
                "start date must not be after end date".to_string(),
            ));
        }
        self.orders.sales_report(start, end)
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use chrono::Utc;

    use super::*;
    use crate::application::fakes::{admin, customer, sample_checkout, InMemoryWorld};
    use crate::application::orders::OrderService;
    use crate::domain::statuses::OrderStatus;

    #[test]
    fn sales_report_is_staff_only_and_counts_paid_orders() {
        let world = InMemoryWorld::new();
        let user = world.add_user("buyer@example.com");
        let variant = world.add_variant("Gamis", "50000", 10);
        let orders = OrderService::new(world.clone());

        let paid = orders
            .checkout(
                &customer(user),
                sample_checkout(vec![(variant, 2)], "15000"),
            )
            .expect("checkout");
        orders
            .update_status(&admin(), paid.id, OrderStatus::Paid)
            .expect("pay");
        // A second order that never gets paid must not count.
        orders
            .checkout(&customer(user), sample_checkout(vec![(variant, 1)], "0"))
            .expect("checkout");

        let service = ReportService::new(world);
        let today = Utc::now().date_naive();

        assert!(matches!(
            service.sales(&customer(user), today, today),
            Err(DomainError::Forbidden(_))
        ));

        let report = service.sales(&admin(), today, today).expect("report");
        assert_eq!(report.total_transactions, 1);
        assert_eq!(report.total_revenue, BigDecimal::from(115000));
        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.top_products.len(), 1);
        assert_eq!(report.top_products[0].product_name, "Gamis");
        assert_eq!(report.top_products[0].quantity_sold, 2);
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let world = InMemoryWorld::new();
        let service = ReportService::new(world);
        let today = Utc::now().date_naive();
        let yesterday = today.pred_opt().unwrap();

        assert!(matches!(
            service.sales(&admin(), today, yesterday),
            Err(DomainError::Validation(_))
        ));
    }
}
