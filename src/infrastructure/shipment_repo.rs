use bigdecimal::ToPrimitive;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::payment::whole_units;
use crate::domain::ports::ShipmentRepository;
use crate::domain::shipment::{
    self, NewShipmentRecord, ParcelManifest, RateItem, ShipmentStatusUpdate, ShipmentView,
};
use crate::domain::statuses::{OrderStatus, ShipmentStatus};
use crate::schema::{order_items, orders, products, shipments, users};

use super::models::{NewShipmentRow, OrderItemRow, OrderRow, ProductRow, ShipmentRow};

#[derive(Clone)]
pub struct DieselShipmentRepository {
    pool: DbPool,
}

impl DieselShipmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn load_view(conn: &mut PgConnection, row: ShipmentRow) -> Result<ShipmentView, DomainError> {
    let order_user_id: Uuid = orders::table
        .find(row.order_id)
        .select(orders::user_id)
        .first(conn)?;
    row.into_view(order_user_id)
}

impl ShipmentRepository for DieselShipmentRepository {
    fn create(&self, record: NewShipmentRecord) -> Result<ShipmentView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order = orders::table
                .filter(orders::id.eq(record.order_id))
                .select(OrderRow::as_select())
                .first(conn)
                .optional()?
                .ok_or_else(|| {
                    DomainError::NotFound(format!("order {} not found", record.order_id))
                })?;

            let order_status = OrderStatus::parse(&order.status)?;
            shipment::ensure_shippable(order_status)?;

            let existing: i64 = shipments::table
                .filter(shipments::order_id.eq(record.order_id))
                .count()
                .get_result(conn)?;
            if existing > 0 {
                return Err(DomainError::InvalidState(
                    "order already has a shipment".to_string(),
                ));
            }

            let id = Uuid::new_v4();
            diesel::insert_into(shipments::table)
                .values(&NewShipmentRow {
                    id,
                    order_id: record.order_id,
                    courier: record.courier,
                    service: record.service,
                    tracking_number: record.tracking_number,
                    courier_order_id: record.courier_order_id,
                    courier_tracking_id: record.courier_tracking_id,
                    tracking_url: record.tracking_url,
                    status: ShipmentStatus::Pending.as_str().to_string(),
                    cost: record.cost,
                })
                .execute(conn)?;

            // A freshly paid order moves into fulfilment once its
            // shipment exists.
            if order_status == OrderStatus::Paid {
                diesel::update(orders::table.find(record.order_id))
                    .set(orders::status.eq(OrderStatus::Processing.as_str()))
                    .execute(conn)?;
            }

            let row = shipments::table
                .find(id)
                .select(ShipmentRow::as_select())
                .first(conn)?;
            load_view(conn, row)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<ShipmentView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = shipments::table
            .filter(shipments::id.eq(id))
            .select(ShipmentRow::as_select())
            .first(&mut conn)
            .optional()?;
        match row {
            Some(row) => Ok(Some(load_view(&mut conn, row)?)),
            None => Ok(None),
        }
    }

    fn find_by_order(&self, order_id: Uuid) -> Result<Option<ShipmentView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = shipments::table
            .filter(shipments::order_id.eq(order_id))
            .select(ShipmentRow::as_select())
            .first(&mut conn)
            .optional()?;
        match row {
            Some(row) => Ok(Some(load_view(&mut conn, row)?)),
            None => Ok(None),
        }
    }

    fn update_status(
        &self,
        id: Uuid,
        update: ShipmentStatusUpdate,
    ) -> Result<ShipmentView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = shipments::table
                .filter(shipments::id.eq(id))
                .select(ShipmentRow::as_select())
                .first(conn)
                .optional()?
                .ok_or_else(|| DomainError::NotFound(format!("shipment {id} not found")))?;

            let plan = shipment::plan_transition(update.status);
            let now = Utc::now();

            diesel::update(shipments::table.find(id))
                .set(shipments::status.eq(update.status.as_str()))
                .execute(conn)?;
            if let Some(tracking_number) = &update.tracking_number {
                diesel::update(shipments::table.find(id))
                    .set(shipments::tracking_number.eq(tracking_number))
                    .execute(conn)?;
            }
            if plan.stamp_shipped {
                diesel::update(shipments::table.find(id))
                    .set(shipments::shipped_at.eq(now))
                    .execute(conn)?;
            }
            if plan.stamp_delivered {
                diesel::update(shipments::table.find(id))
                    .set(shipments::delivered_at.eq(now))
                    .execute(conn)?;
            }

            match plan.order_cascade {
                Some(OrderStatus::Shipped) => {
                    diesel::update(orders::table.find(row.order_id))
                        .set(orders::status.eq(OrderStatus::Shipped.as_str()))
                        .execute(conn)?;
                }
                Some(OrderStatus::Completed) => {
                    diesel::update(orders::table.find(row.order_id))
                        .set((
                            orders::status.eq(OrderStatus::Completed.as_str()),
                            orders::completed_at.eq(now),
                        ))
                        .execute(conn)?;
                }
                _ => {}
            }

            let row = shipments::table
                .find(id)
                .select(ShipmentRow::as_select())
                .first(conn)?;
            load_view(conn, row)
        })
    }

    fn update_tracking(
        &self,
        id: Uuid,
        tracking_number: String,
        courier: Option<String>,
    ) -> Result<ShipmentView, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(shipments::table.find(id))
            .set(shipments::tracking_number.eq(&tracking_number))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound(format!("shipment {id} not found")));
        }
        if let Some(courier) = &courier {
            diesel::update(shipments::table.find(id))
                .set(shipments::courier.eq(courier))
                .execute(&mut conn)?;
        }

        let row = shipments::table
            .find(id)
            .select(ShipmentRow::as_select())
            .first(&mut conn)?;
        load_view(&mut conn, row)
    }

    fn order_parcel(&self, order_id: Uuid) -> Result<ParcelManifest, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(order_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| DomainError::NotFound(format!("order {order_id} not found")))?;

        let customer_email: String = users::table
            .find(order.user_id)
            .select(users::email)
            .first(&mut conn)?;

        let rows: Vec<(OrderItemRow, ProductRow)> = order_items::table
            .inner_join(products::table)
            .filter(order_items::order_id.eq(order_id))
            .select((OrderItemRow::as_select(), ProductRow::as_select()))
            .load(&mut conn)?;

        let items = rows
            .into_iter()
            .map(|(item, product)| RateItem {
                name: item.product_name,
                description: Some(item.sku),
                value: whole_units(&item.unit_price),
                length: product.length.to_i32().unwrap_or(0),
                width: product.width.to_i32().unwrap_or(0),
                height: product.height.to_i32().unwrap_or(0),
                weight: product.weight.to_i32().unwrap_or(0),
                quantity: item.quantity,
            })
            .collect();

        Ok(ParcelManifest {
            order_id,
            order_number: order.order_number,
            order_status: OrderStatus::parse(&order.status)?,
            customer_email,
            receiver_name: order.receiver_name,
            receiver_phone: order.receiver_phone,
            items,
        })
    }
}
