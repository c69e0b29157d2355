use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::payment::{
    self, GatewayNotification, NewPaymentRecord, PaymentStatusUpdate, PaymentView,
};
use crate::domain::ports::{AuthContext, OrderRepository, PaymentGateway, PaymentRepository};
use crate::domain::statuses::{OrderStatus, PaymentMethod};

use super::require_staff;

pub struct PaymentService<P, O, G> {
    payments: P,
    orders: O,
    gateway: G,
}

impl<P, O, G> PaymentService<P, O, G>
where
    P: PaymentRepository,
    O: OrderRepository,
    G: PaymentGateway,
{
    pub fn new(payments: P, orders: O, gateway: G) -> Self {
        Self {
            payments,
            orders,
            gateway,
        }
    }

    /// Starts a payment attempt: the order must be awaiting payment and
    /// must not already have a pending attempt. On gateway success the
    /// redirect URL and a 24-hour expiry are persisted; on gateway
    /// failure nothing is.
    pub fn create(
        &self,
        auth: &AuthContext,
        order_id: Uuid,
        method: PaymentMethod,
    ) -> Result<PaymentView, DomainError> {
        let order = self
            .orders
            .find_by_id(order_id)?
            .ok_or_else(|| DomainError::NotFound(format!("order {order_id} not found")))?;
        if !auth.is_staff() && order.user_id != auth.user_id {
            return Err(DomainError::Forbidden(
                "you do not have access to this order".to_string(),
            ));
        }
        if order.status != OrderStatus::PendingPayment {
            return Err(DomainError::InvalidState(format!(
                "order with status {} cannot be paid",
                order.status
            )));
        }
        if self.payments.find_pending_for_order(order_id)?.is_some() {
            return Err(DomainError::InvalidState(
                "order already has a pending payment".to_string(),
            ));
        }

        let transaction_id = self.payments.next_transaction_id()?;
        let now = Utc::now();
        let charge = payment::build_charge(&order, &transaction_id, now);
        let redirect = self.gateway.create_transaction(&charge)?;

        self.payments.create(NewPaymentRecord {
            order_id,
            transaction_id,
            method,
            amount: order.total.clone(),
            redirect_url: Some(redirect.redirect_url),
            expires_at: Some(now + Duration::hours(payment::EXPIRY_HOURS)),
            initiated_at: now,
        })
    }

    pub fn list_for_order(
        &self,
        auth: &AuthContext,
        order_id: Uuid,
    ) -> Result<Vec<PaymentView>, DomainError> {
        let order = self
            .orders
            .find_by_id(order_id)?
            .ok_or_else(|| DomainError::NotFound(format!("order {order_id} not found")))?;
        if !auth.is_staff() && order.user_id != auth.user_id {
            return Err(DomainError::Forbidden(
                "you do not have access to this order".to_string(),
            ));
        }
        self.payments.list_for_order(order_id)
    }

    pub fn get(&self, auth: &AuthContext, id: Uuid) -> Result<PaymentView, DomainError> {
        let payment = self
            .payments
            .find_by_id(id)?
            .ok_or_else(|| DomainError::NotFound(format!("payment {id} not found")))?;
        if !auth.is_staff() {
            let order = self
                .orders
                .find_by_id(payment.order_id)?
                .ok_or_else(|| {
                    DomainError::NotFound(format!("order {} not found", payment.order_id))
                })?;
            if order.user_id != auth.user_id {
                return Err(DomainError::Forbidden(
                    "you do not have access to this payment".to_string(),
                ));
            }
        }
        Ok(payment)
    }

    /// Manual status override, admin only.
    pub fn update_status(
        &self,
        auth: &AuthContext,
        id: Uuid,
        update: PaymentStatusUpdate,
    ) -> Result<PaymentView, DomainError> {
        require_staff(auth)?;
        self.payments.apply_status(id, update)
    }

    /// Webhook entry point. Verifies the notification signature, maps the
    /// gateway status vocabulary onto ours and applies the update; a
    /// settlement cascades the order to PAID.
    pub fn apply_webhook(
        &self,
        notification: GatewayNotification,
    ) -> Result<PaymentView, DomainError> {
        if !self.gateway.verify_signature(
            &notification.transaction_id,
            &notification.status_code,
            &notification.gross_amount,
            &notification.signature_key,
        ) {
            return Err(DomainError::Forbidden(
                "webhook signature mismatch".to_string(),
            ));
        }

        let status = payment::map_notification_status(
            &notification.transaction_status,
            notification.fraud_status.as_deref(),
        )
        .ok_or_else(|| {
            DomainError::Validation(format!(
                "unrecognized transaction status '{}'",
                notification.transaction_status
            ))
        })?;

        let payment = self
            .payments
            .find_by_transaction_id(&notification.transaction_id)?
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "payment with transaction id {} not found",
                    notification.transaction_id
                ))
            })?;

        self.payments.apply_status(
            payment.id,
            PaymentStatusUpdate {
                status,
                webhook_payload: Some(notification.raw),
                signature_key: Some(notification.signature_key),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use super::*;
    use crate::application::fakes::{admin, customer, sample_checkout, FakeGateway, InMemoryWorld};
    use crate::application::orders::OrderService;
    use crate::domain::statuses::PaymentStatus;

    struct Setup {
        world: InMemoryWorld,
        service: PaymentService<InMemoryWorld, InMemoryWorld, FakeGateway>,
        user: Uuid,
        order: Uuid,
    }

    fn setup(gateway: FakeGateway) -> Setup {
        let world = InMemoryWorld::new();
        let user = world.add_user("buyer@example.com");
        let variant = world.add_variant("Gamis", "50000", 10);
        let orders = OrderService::new(world.clone());
        let order = orders
            .checkout(
                &customer(user),
                sample_checkout(vec![(variant, 2)], "15000"),
            )
            .expect("checkout");
        let service = PaymentService::new(world.clone(), world.clone(), gateway);
        Setup {
            world,
            service,
            user,
            order: order.id,
        }
    }

    fn notification(transaction_id: &str, status: &str) -> GatewayNotification {
        GatewayNotification {
            transaction_id: transaction_id.to_string(),
            transaction_status: status.to_string(),
            fraud_status: None,
            status_code: "200".to_string(),
            gross_amount: "115000.00".to_string(),
            signature_key: "sig".to_string(),
            raw: json!({ "transaction_status": status }),
        }
    }

    #[test]
    fn create_payment_persists_redirect_and_expiry() {
        let s = setup(FakeGateway::default());

        let payment = s
            .service
            .create(&customer(s.user), s.order, PaymentMethod::Qris)
            .expect("create");

        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.transaction_id.starts_with("TRX-"));
        assert!(payment.redirect_url.is_some());
        let expires = payment.expires_at.expect("expiry");
        assert_eq!(expires - payment.initiated_at, Duration::hours(24));
    }

    #[test]
    fn create_rejects_orders_not_awaiting_payment() {
        let s = setup(FakeGateway::default());
        s.world.set_order_status(s.order, OrderStatus::Paid);

        let err = s
            .service
            .create(&customer(s.user), s.order, PaymentMethod::Qris)
            .expect_err("must reject");
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn create_rejects_duplicate_pending_payment() {
        let s = setup(FakeGateway::default());

        s.service
            .create(&customer(s.user), s.order, PaymentMethod::Qris)
            .expect("first");
        let err = s
            .service
            .create(&customer(s.user), s.order, PaymentMethod::BankTransfer)
            .expect_err("second must fail");
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn gateway_failure_surfaces_and_persists_nothing() {
        let s = setup(FakeGateway::failing());

        let err = s
            .service
            .create(&customer(s.user), s.order, PaymentMethod::Qris)
            .expect_err("gateway down");
        assert!(matches!(err, DomainError::Upstream(_)));

        let payments = s
            .service
            .list_for_order(&admin(), s.order)
            .expect("list");
        assert!(payments.is_empty());
    }

    #[test]
    fn strangers_cannot_pay_someone_elses_order() {
        let s = setup(FakeGateway::default());
        let stranger = s.world.add_user("stranger@example.com");

        let err = s
            .service
            .create(&customer(stranger), s.order, PaymentMethod::Qris)
            .expect_err("forbidden");
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn settlement_webhook_marks_order_paid_and_stamps_it() {
        let s = setup(FakeGateway::default());
        let payment = s
            .service
            .create(&customer(s.user), s.order, PaymentMethod::Qris)
            .expect("create");

        let updated = s
            .service
            .apply_webhook(notification(&payment.transaction_id, "settlement"))
            .expect("webhook");

        assert_eq!(updated.status, PaymentStatus::Settlement);
        assert!(updated.settled_at.is_some());
        let order = s.world.order(s.order);
        assert_eq!(order.status, OrderStatus::Paid);
        assert!(order.paid_at.is_some());
    }

    #[test]
    fn expiry_leaves_the_order_open_for_a_new_attempt() {
        let s = setup(FakeGateway::default());
        let payment = s
            .service
            .create(&customer(s.user), s.order, PaymentMethod::Qris)
            .expect("create");

        s.service
            .apply_webhook(notification(&payment.transaction_id, "expire"))
            .expect("webhook");

        let order = s.world.order(s.order);
        assert_eq!(order.status, OrderStatus::PendingPayment);
        assert!(order.paid_at.is_none());

        // A fresh attempt is a new payment row.
        let second = s
            .service
            .create(&customer(s.user), s.order, PaymentMethod::BankTransfer)
            .expect("retry");
        assert_ne!(second.transaction_id, payment.transaction_id);
    }

    #[test]
    fn unknown_transaction_status_is_a_validation_error() {
        let s = setup(FakeGateway::default());
        let payment = s
            .service
            .create(&customer(s.user), s.order, PaymentMethod::Qris)
            .expect("create");

        let err = s
            .service
            .apply_webhook(notification(&payment.transaction_id, "teleported"))
            .expect_err("must reject");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn webhook_for_unknown_transaction_is_not_found() {
        let s = setup(FakeGateway::default());
        let err = s
            .service
            .apply_webhook(notification("TRX-19700101-00001", "settlement"))
            .expect_err("must reject");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn rejected_signature_is_forbidden() {
        let s = setup(FakeGateway::rejecting_signatures());
        let err = s
            .service
            .apply_webhook(notification("TRX-20250101-00001", "settlement"))
            .expect_err("must reject");
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn manual_status_update_is_staff_only() {
        let s = setup(FakeGateway::default());
        let payment = s
            .service
            .create(&customer(s.user), s.order, PaymentMethod::Qris)
            .expect("create");

        let update = PaymentStatusUpdate {
            status: PaymentStatus::Cancel,
            webhook_payload: None,
            signature_key: None,
        };
        assert!(matches!(
            s.service
                .update_status(&customer(s.user), payment.id, update.clone()),
            Err(DomainError::Forbidden(_))
        ));
        let cancelled = s
            .service
            .update_status(&admin(), payment.id, update)
            .expect("cancel");
        assert_eq!(cancelled.status, PaymentStatus::Cancel);
    }
}
