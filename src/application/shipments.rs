use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::{AuthContext, CourierGateway, ShipmentRepository, WaybillNotifier};
use crate::domain::shipment::{
    self, AreaSuggestion, BookingRequest, NewShipmentRecord, RateQuery, RateQuote,
    ShipmentStatusUpdate, ShipmentView, TrackingInfo,
};
use crate::domain::statuses::ShipmentStatus;

use super::require_staff;

/// Booking input for a shipment handled by the courier aggregator. The
/// parcel contents come from the stored order; the destination contact
/// comes from the admin's request.
#[derive(Debug, Clone)]
pub struct CourierShipmentRequest {
    pub order_id: Uuid,
    pub courier_company: String,
    pub courier_type: String,
    pub origin_area_id: String,
    pub destination_area_id: String,
    pub destination_contact_name: String,
    pub destination_contact_phone: String,
    pub destination_contact_email: String,
    pub destination_address: String,
    pub destination_postal_code: String,
    pub destination_note: Option<String>,
}

/// Read-only projection exposed to the owning customer.
#[derive(Debug, Clone)]
pub struct TrackingProjection {
    pub courier: Option<String>,
    pub tracking_number: Option<String>,
    pub status: ShipmentStatus,
    pub tracking_url: Option<String>,
}

pub struct ShipmentService<R, C, N> {
    shipments: R,
    courier: C,
    notifier: N,
}

impl<R, C, N> ShipmentService<R, C, N>
where
    R: ShipmentRepository,
    C: CourierGateway,
    N: WaybillNotifier,
{
    pub fn new(shipments: R, courier: C, notifier: N) -> Self {
        Self {
            shipments,
            courier,
            notifier,
        }
    }

    /// Manual shipment entry (courier handled outside the system).
    pub fn create(
        &self,
        auth: &AuthContext,
        record: NewShipmentRecord,
    ) -> Result<ShipmentView, DomainError> {
        require_staff(auth)?;
        self.shipments.create(record)
    }

    /// Books the parcel with the courier aggregator, persists the
    /// returned identifiers, then emails the waybill to the customer.
    /// The preconditions are checked before the external booking so a
    /// rejected order never reaches the courier.
    pub fn create_with_courier(
        &self,
        auth: &AuthContext,
        request: CourierShipmentRequest,
    ) -> Result<ShipmentView, DomainError> {
        require_staff(auth)?;

        let manifest = self.shipments.order_parcel(request.order_id)?;
        shipment::ensure_shippable(manifest.order_status)?;
        if self.shipments.find_by_order(request.order_id)?.is_some() {
            return Err(DomainError::InvalidState(
                "order already has a shipment".to_string(),
            ));
        }

        let booking = self.courier.book(&BookingRequest {
            reference: manifest.order_number.clone(),
            courier_company: request.courier_company.clone(),
            courier_type: request.courier_type.clone(),
            origin_area_id: request.origin_area_id,
            destination_area_id: request.destination_area_id,
            destination_contact_name: request.destination_contact_name,
            destination_contact_phone: request.destination_contact_phone,
            destination_contact_email: request.destination_contact_email,
            destination_address: request.destination_address,
            destination_postal_code: request.destination_postal_code,
            destination_note: request.destination_note,
            items: manifest.items.clone(),
        })?;

        let view = self.shipments.create(NewShipmentRecord {
            order_id: request.order_id,
            courier: Some(request.courier_company.clone()),
            service: Some(request.courier_type),
            tracking_number: booking.waybill.clone(),
            cost: booking
                .price
                .map(BigDecimal::from)
                .unwrap_or_else(|| BigDecimal::from(0)),
            courier_order_id: Some(booking.courier_order_id),
            courier_tracking_id: booking.tracking_id,
            tracking_url: booking.tracking_url,
        })?;

        if let Some(waybill) = &view.tracking_number {
            self.notifier.waybill_assigned(
                &manifest.customer_email,
                &manifest.order_number,
                waybill,
                &request.courier_company,
            );
        }

        Ok(view)
    }

    /// Stateless pass-through to the aggregator's rate endpoint.
    pub fn check_rates(&self, query: RateQuery) -> Result<Vec<RateQuote>, DomainError> {
        shipment::validate_rate_query(&query)?;
        self.courier.check_rates(&query)
    }

    pub fn search_locations(&self, query: &str) -> Result<Vec<AreaSuggestion>, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::Validation(
                "query parameter \"q\" is required".to_string(),
            ));
        }
        self.courier.search_areas(query)
    }

    pub fn get(&self, auth: &AuthContext, id: Uuid) -> Result<ShipmentView, DomainError> {
        let view = self
            .shipments
            .find_by_id(id)?
            .ok_or_else(|| DomainError::NotFound(format!("shipment {id} not found")))?;
        if !auth.is_staff() && view.order_user_id != auth.user_id {
            return Err(DomainError::Forbidden(
                "you do not have access to this shipment".to_string(),
            ));
        }
        Ok(view)
    }

    pub fn update_status(
        &self,
        auth: &AuthContext,
        id: Uuid,
        update: ShipmentStatusUpdate,
    ) -> Result<ShipmentView, DomainError> {
        require_staff(auth)?;
        self.shipments.update_status(id, update)
    }

    /// Tracking-number-only update, e.g. from courier webhook ingestion.
    pub fn update_tracking(
        &self,
        auth: &AuthContext,
        id: Uuid,
        tracking_number: String,
        courier: Option<String>,
    ) -> Result<ShipmentView, DomainError> {
        require_staff(auth)?;
        self.shipments.update_tracking(id, tracking_number, courier)
    }

    pub fn track_by_order(
        &self,
        auth: &AuthContext,
        order_id: Uuid,
    ) -> Result<TrackingProjection, DomainError> {
        let view = self.shipments.find_by_order(order_id)?.ok_or_else(|| {
            DomainError::NotFound(format!("shipment for order {order_id} not found"))
        })?;
        if !auth.is_staff() && view.order_user_id != auth.user_id {
            return Err(DomainError::Forbidden(
                "you do not have access to this shipment".to_string(),
            ));
        }
        Ok(TrackingProjection {
            courier: view.courier,
            tracking_number: view.tracking_number,
            status: view.status,
            tracking_url: view.tracking_url,
        })
    }

    /// Live tracking through the aggregator, keyed by the stored courier
    /// tracking id.
    pub fn live_tracking(&self, auth: &AuthContext, id: Uuid) -> Result<TrackingInfo, DomainError> {
        let view = self.get(auth, id)?;
        let tracking_id = view.courier_tracking_id.ok_or_else(|| {
            DomainError::InvalidState("shipment has no courier tracking id".to_string())
        })?;
        self.courier.track(&tracking_id)
    }
}
