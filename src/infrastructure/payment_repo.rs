use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::payment::{NewPaymentRecord, PaymentStatusUpdate, PaymentView};
use crate::domain::ports::PaymentRepository;
use crate::domain::sequence;
use crate::domain::statuses::{OrderStatus, PaymentStatus};
use crate::schema::{orders, payments};

use super::models::{NewPaymentRow, PaymentRow};
use super::sequences;

#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl PaymentRepository for DieselPaymentRepository {
    fn next_transaction_id(&self) -> Result<String, DomainError> {
        let mut conn = self.pool.get()?;
        let today = Utc::now().date_naive();
        let seq = sequences::next_value(&mut conn, sequence::TRANSACTION_SCOPE, today)?;
        Ok(sequence::format_reference(
            sequence::TRANSACTION_SCOPE,
            today,
            seq,
        ))
    }

    fn create(&self, record: NewPaymentRecord) -> Result<PaymentView, DomainError> {
        let mut conn = self.pool.get()?;

        let id = Uuid::new_v4();
        diesel::insert_into(payments::table)
            .values(&NewPaymentRow {
                id,
                order_id: record.order_id,
                transaction_id: record.transaction_id,
                method: record.method.as_str().to_string(),
                status: PaymentStatus::Pending.as_str().to_string(),
                amount: record.amount,
                redirect_url: record.redirect_url,
                expires_at: record.expires_at,
                initiated_at: record.initiated_at,
            })
            .execute(&mut conn)?;

        let row = payments::table
            .find(id)
            .select(PaymentRow::as_select())
            .first(&mut conn)?;
        row.into_view()
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = payments::table
            .filter(payments::id.eq(id))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(PaymentRow::into_view).transpose()
    }

    fn list_for_order(&self, order_id: Uuid) -> Result<Vec<PaymentView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = payments::table
            .filter(payments::order_id.eq(order_id))
            .order(payments::created_at.desc())
            .select(PaymentRow::as_select())
            .load(&mut conn)?;
        rows.into_iter().map(PaymentRow::into_view).collect()
    }

    fn find_pending_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Option<PaymentView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = payments::table
            .filter(payments::order_id.eq(order_id))
            .filter(payments::status.eq(PaymentStatus::Pending.as_str()))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(PaymentRow::into_view).transpose()
    }

    fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<PaymentView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = payments::table
            .filter(payments::transaction_id.eq(transaction_id))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(PaymentRow::into_view).transpose()
    }

    fn apply_status(
        &self,
        id: Uuid,
        update: PaymentStatusUpdate,
    ) -> Result<PaymentView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = payments::table
                .filter(payments::id.eq(id))
                .select(PaymentRow::as_select())
                .first(conn)
                .optional()?
                .ok_or_else(|| DomainError::NotFound(format!("payment {id} not found")))?;

            diesel::update(payments::table.find(id))
                .set(payments::status.eq(update.status.as_str()))
                .execute(conn)?;
            if let Some(payload) = &update.webhook_payload {
                diesel::update(payments::table.find(id))
                    .set(payments::webhook_payload.eq(payload))
                    .execute(conn)?;
            }
            if let Some(signature) = &update.signature_key {
                diesel::update(payments::table.find(id))
                    .set(payments::signature_key.eq(signature))
                    .execute(conn)?;
            }

            // A settlement moves the order to PAID in the same transaction.
            // EXPIRE/CANCEL/DENY leave the order in PENDING_PAYMENT so the
            // customer can start a fresh attempt.
            if update.status == PaymentStatus::Settlement {
                let now = Utc::now();
                diesel::update(payments::table.find(id))
                    .set(payments::settled_at.eq(now))
                    .execute(conn)?;
                diesel::update(orders::table.find(row.order_id))
                    .set((
                        orders::status.eq(OrderStatus::Paid.as_str()),
                        orders::paid_at.eq(now),
                    ))
                    .execute(conn)?;
            }

            let row = payments::table
                .find(id)
                .select(PaymentRow::as_select())
                .first(conn)?;
            row.into_view()
        })
    }
}
