//! Biteship client: rate quotes, order booking, tracking and area
//! search. Every call is a plain JSON request with the API key in the
//! Authorization header.

use reqwest::blocking::Client;
use serde_json::{json, Map, Value};

use crate::config::BiteshipConfig;
use crate::domain::errors::DomainError;
use crate::domain::ports::CourierGateway;
use crate::domain::shipment::{
    AreaSuggestion, BookingRequest, CourierBooking, RateItem, RateQuery, RateQuote, TrackingEvent,
    TrackingInfo,
};

#[derive(Clone)]
pub struct BiteshipGateway {
    client: Client,
    api_key: String,
    base_url: String,
}

impl BiteshipGateway {
    pub fn new(config: &BiteshipConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn unreachable(e: reqwest::Error) -> DomainError {
        DomainError::Upstream(format!("courier aggregator unreachable: {e}"))
    }

    fn unreadable(e: reqwest::Error) -> DomainError {
        DomainError::Upstream(format!(
            "courier aggregator returned an unreadable response: {e}"
        ))
    }

    fn error_from(payload: &Value) -> DomainError {
        let message = payload
            .get("error")
            .or_else(|| payload.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("unknown aggregator error");
        DomainError::Upstream(format!("courier aggregator error: {message}"))
    }

    fn items_json(items: &[RateItem]) -> Vec<Value> {
        items
            .iter()
            .map(|item| {
                json!({
                    "name": item.name,
                    "description": item.description.clone().unwrap_or_default(),
                    "value": item.value,
                    "length": item.length,
                    "width": item.width,
                    "height": item.height,
                    "weight": item.weight,
                    "quantity": item.quantity,
                })
            })
            .collect()
    }
}

impl CourierGateway for BiteshipGateway {
    fn check_rates(&self, query: &RateQuery) -> Result<Vec<RateQuote>, DomainError> {
        let mut body = Map::new();
        if let Some(v) = &query.origin_area_id {
            body.insert("origin_area_id".to_string(), json!(v));
        }
        if let Some(v) = &query.destination_area_id {
            body.insert("destination_area_id".to_string(), json!(v));
        }
        if let Some(v) = &query.origin_postal_code {
            body.insert("origin_postal_code".to_string(), json!(v));
        }
        if let Some(v) = &query.destination_postal_code {
            body.insert("destination_postal_code".to_string(), json!(v));
        }
        body.insert("couriers".to_string(), json!(query.couriers));
        body.insert("items".to_string(), json!(Self::items_json(&query.items)));

        let response = self
            .client
            .post(format!("{}/v1/rates/couriers", self.base_url))
            .header("Authorization", &self.api_key)
            .json(&Value::Object(body))
            .send()
            .map_err(Self::unreachable)?;
        let status = response.status();
        let payload: Value = response.json().map_err(Self::unreadable)?;
        if !status.is_success() {
            return Err(Self::error_from(&payload));
        }

        let quotes = payload
            .get("pricing")
            .and_then(|p| p.as_array())
            .map(|pricing| {
                pricing
                    .iter()
                    .map(|entry| RateQuote {
                        courier_code: str_field(entry, "courier_code"),
                        courier_name: str_field(entry, "courier_name"),
                        service: str_field(entry, "courier_service_name"),
                        description: opt_str_field(entry, "description"),
                        price: entry.get("price").and_then(|p| p.as_i64()).unwrap_or(0),
                        estimated_days: opt_str_field(entry, "duration"),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(quotes)
    }

    fn book(&self, request: &BookingRequest) -> Result<CourierBooking, DomainError> {
        let body = json!({
            "reference_id": request.reference,
            "origin_area_id": request.origin_area_id,
            "destination_area_id": request.destination_area_id,
            "destination_contact_name": request.destination_contact_name,
            "destination_contact_phone": request.destination_contact_phone,
            "destination_contact_email": request.destination_contact_email,
            "destination_address": request.destination_address,
            "destination_postal_code": request.destination_postal_code,
            "destination_note": request.destination_note.clone().unwrap_or_default(),
            "courier_company": request.courier_company,
            "courier_type": request.courier_type,
            "delivery_type": "now",
            "items": Self::items_json(&request.items),
        });

        let response = self
            .client
            .post(format!("{}/v1/orders", self.base_url))
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .map_err(Self::unreachable)?;
        let status = response.status();
        let payload: Value = response.json().map_err(Self::unreadable)?;
        if !status.is_success() {
            return Err(Self::error_from(&payload));
        }

        let courier_order_id = payload
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| {
                DomainError::Upstream("courier aggregator response had no order id".to_string())
            })?
            .to_string();
        let courier = payload.get("courier").cloned().unwrap_or(Value::Null);

        Ok(CourierBooking {
            courier_order_id,
            tracking_id: opt_str_field(&courier, "tracking_id"),
            waybill: opt_str_field(&courier, "waybill_id"),
            tracking_url: opt_str_field(&courier, "link"),
            price: payload.get("price").and_then(|p| p.as_i64()),
        })
    }

    fn track(&self, courier_tracking_id: &str) -> Result<TrackingInfo, DomainError> {
        let response = self
            .client
            .get(format!(
                "{}/v1/trackings/{courier_tracking_id}",
                self.base_url
            ))
            .header("Authorization", &self.api_key)
            .send()
            .map_err(Self::unreachable)?;
        let status = response.status();
        let payload: Value = response.json().map_err(Self::unreadable)?;
        if !status.is_success() {
            return Err(Self::error_from(&payload));
        }

        let history = payload
            .get("history")
            .and_then(|h| h.as_array())
            .map(|events| {
                events
                    .iter()
                    .map(|event| TrackingEvent {
                        status: str_field(event, "status"),
                        note: opt_str_field(event, "note"),
                        updated_at: opt_str_field(event, "updated_at"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(TrackingInfo {
            status: str_field(&payload, "status"),
            waybill: opt_str_field(&payload, "waybill_id"),
            link: opt_str_field(&payload, "link"),
            history,
        })
    }

    fn search_areas(&self, query: &str) -> Result<Vec<AreaSuggestion>, DomainError> {
        let response = self
            .client
            .get(format!("{}/v1/maps/areas", self.base_url))
            .header("Authorization", &self.api_key)
            .query(&[("countries", "ID"), ("input", query), ("type", "single")])
            .send()
            .map_err(Self::unreachable)?;
        let status = response.status();
        let payload: Value = response.json().map_err(Self::unreadable)?;
        if !status.is_success() {
            return Err(Self::error_from(&payload));
        }

        let areas = payload
            .get("areas")
            .and_then(|a| a.as_array())
            .map(|areas| {
                areas
                    .iter()
                    .map(|area| AreaSuggestion {
                        id: str_field(area, "id"),
                        name: str_field(area, "name"),
                        postal_code: area.get("postal_code").and_then(|p| p.as_i64()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(areas)
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn opt_str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
