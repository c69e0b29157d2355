use uuid::Uuid;

use crate::domain::checkout;
use crate::domain::errors::DomainError;
use crate::domain::order::{CheckoutInput, OrderPage, OrderView};
use crate::domain::ports::{AuthContext, OrderRepository};
use crate::domain::statuses::OrderStatus;

use super::require_staff;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Checkout for the calling customer. The repository runs the stock
    /// check, decrement and inserts as one atomic unit.
    pub fn checkout(
        &self,
        auth: &AuthContext,
        mut input: CheckoutInput,
    ) -> Result<OrderView, DomainError> {
        checkout::ensure_has_lines(&input.lines)?;
        input.user_id = auth.user_id;
        self.repo.checkout(input)
    }

    pub fn my_orders(&self, auth: &AuthContext) -> Result<Vec<OrderView>, DomainError> {
        self.repo.list_for_user(auth.user_id)
    }

    /// Customers may only read their own orders; staff read everything.
    pub fn get(&self, auth: &AuthContext, id: Uuid) -> Result<OrderView, DomainError> {
        let order = self
            .repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::NotFound(format!("order {id} not found")))?;
        if !auth.is_staff() && order.user_id != auth.user_id {
            return Err(DomainError::Forbidden(
                "you do not have access to this order".to_string(),
            ));
        }
        Ok(order)
    }

    pub fn list(
        &self,
        auth: &AuthContext,
        page: i64,
        limit: i64,
        status: Option<OrderStatus>,
    ) -> Result<OrderPage, DomainError> {
        require_staff(auth)?;
        self.repo.list(page, limit, status)
    }

    pub fn update_status(
        &self,
        auth: &AuthContext,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<OrderView, DomainError> {
        require_staff(auth)?;
        self.repo.update_status(id, status)
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::application::fakes::{admin, customer, sample_checkout, InMemoryWorld};
    use crate::domain::order::LineRequest;

    #[test]
    fn checkout_decrements_stock_and_computes_totals() {
        let world = InMemoryWorld::new();
        let user = world.add_user("buyer@example.com");
        let variant_a = world.add_variant("Gamis", "50000", 10);
        let variant_b = world.add_variant("Hijab", "30000", 10);
        let service = OrderService::new(world.clone());

        let order = service
            .checkout(
                &customer(user),
                sample_checkout(vec![(variant_a, 2), (variant_b, 1)], "15000"),
            )
            .expect("checkout");

        assert_eq!(order.subtotal, BigDecimal::from(130000));
        assert_eq!(order.total, BigDecimal::from(145000));
        assert_eq!(world.variant_stock(variant_a), 8);
        assert_eq!(world.variant_stock(variant_b), 9);
        assert!(order.order_number.starts_with("ORD-"));
        assert!(order.order_number.ends_with("-00001"));
    }

    #[test]
    fn checkout_rejects_insufficient_stock_without_touching_it() {
        let world = InMemoryWorld::new();
        let user = world.add_user("buyer@example.com");
        let variant = world.add_variant("Gamis", "50000", 3);
        let service = OrderService::new(world.clone());

        let err = service
            .checkout(&customer(user), sample_checkout(vec![(variant, 5)], "0"))
            .expect_err("must reject");

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(world.variant_stock(variant), 3);
    }

    #[test]
    fn checkout_rejects_empty_orders() {
        let world = InMemoryWorld::new();
        let user = world.add_user("buyer@example.com");
        let service = OrderService::new(world);

        let err = service
            .checkout(&customer(user), sample_checkout(vec![], "0"))
            .expect_err("must reject");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn checkout_for_unknown_user_is_not_found() {
        let world = InMemoryWorld::new();
        let variant = world.add_variant("Gamis", "50000", 3);
        let service = OrderService::new(world);

        let err = service
            .checkout(
                &customer(uuid::Uuid::new_v4()),
                sample_checkout(vec![(variant, 1)], "0"),
            )
            .expect_err("must reject");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn customers_cannot_read_other_customers_orders() {
        let world = InMemoryWorld::new();
        let owner = world.add_user("owner@example.com");
        let stranger = world.add_user("stranger@example.com");
        let variant = world.add_variant("Gamis", "50000", 10);
        let service = OrderService::new(world);

        let order = service
            .checkout(&customer(owner), sample_checkout(vec![(variant, 1)], "0"))
            .expect("checkout");

        let err = service
            .get(&customer(stranger), order.id)
            .expect_err("forbidden");
        assert!(matches!(err, DomainError::Forbidden(_)));

        assert!(service.get(&customer(owner), order.id).is_ok());
        assert!(service.get(&admin(), order.id).is_ok());
    }

    #[test]
    fn listing_and_status_updates_are_staff_only() {
        let world = InMemoryWorld::new();
        let user = world.add_user("buyer@example.com");
        let variant = world.add_variant("Gamis", "50000", 10);
        let service = OrderService::new(world);

        let order = service
            .checkout(&customer(user), sample_checkout(vec![(variant, 1)], "0"))
            .expect("checkout");

        assert!(matches!(
            service.list(&customer(user), 1, 10, None),
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            service.update_status(&customer(user), order.id, OrderStatus::Paid),
            Err(DomainError::Forbidden(_))
        ));

        let paid = service
            .update_status(&admin(), order.id, OrderStatus::Paid)
            .expect("pay");
        assert_eq!(paid.status, OrderStatus::Paid);
        assert!(paid.paid_at.is_some());
    }

    #[test]
    fn cancel_restores_stock_exactly_once() {
        let world = InMemoryWorld::new();
        let user = world.add_user("buyer@example.com");
        let variant = world.add_variant("Gamis", "50000", 10);
        let service = OrderService::new(world.clone());

        let order = service
            .checkout(
                &customer(user),
                sample_checkout(vec![(variant, 4)], "10000"),
            )
            .expect("checkout");
        assert_eq!(world.variant_stock(variant), 6);

        let cancelled = service
            .update_status(&admin(), order.id, OrderStatus::Cancelled)
            .expect("cancel");
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(world.variant_stock(variant), 10);

        let err = service
            .update_status(&admin(), order.id, OrderStatus::Cancelled)
            .expect_err("terminal");
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert_eq!(world.variant_stock(variant), 10, "no double restore");
    }

    #[test]
    fn terminal_orders_reject_every_requested_status() {
        let world = InMemoryWorld::new();
        let user = world.add_user("buyer@example.com");
        let variant = world.add_variant("Gamis", "50000", 10);
        let service = OrderService::new(world);

        let order = service
            .checkout(&customer(user), sample_checkout(vec![(variant, 1)], "0"))
            .expect("checkout");
        service
            .update_status(&admin(), order.id, OrderStatus::Completed)
            .expect("complete");

        for requested in [
            OrderStatus::PendingPayment,
            OrderStatus::Paid,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Cancelled,
        ] {
            assert!(matches!(
                service.update_status(&admin(), order.id, requested),
                Err(DomainError::InvalidState(_))
            ));
        }
    }

    #[test]
    fn my_orders_only_returns_the_callers_orders() {
        let world = InMemoryWorld::new();
        let alice = world.add_user("alice@example.com");
        let bob = world.add_user("bob@example.com");
        let variant = world.add_variant("Gamis", "50000", 10);
        let service = OrderService::new(world);

        service
            .checkout(&customer(alice), sample_checkout(vec![(variant, 1)], "0"))
            .expect("checkout");
        service
            .checkout(&customer(bob), sample_checkout(vec![(variant, 1)], "0"))
            .expect("checkout");

        let mine = service.my_orders(&customer(alice)).expect("list");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, alice);
    }

    #[test]
    fn line_request_quantities_must_be_positive() {
        let world = InMemoryWorld::new();
        let user = world.add_user("buyer@example.com");
        let variant = world.add_variant("Gamis", "50000", 10);
        let service = OrderService::new(world);

        let mut input = sample_checkout(vec![], "0");
        input.lines = vec![LineRequest {
            variant_id: variant,
            quantity: 0,
        }];
        assert!(matches!(
            service.checkout(&customer(user), input),
            Err(DomainError::Validation(_))
        ));
    }
}
