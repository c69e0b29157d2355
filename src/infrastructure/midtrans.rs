//! Midtrans Snap client. Only `createTransaction` is consumed; status
//! changes come back to us through the webhook, never by polling.

use reqwest::blocking::Client;
use serde_json::json;
use sha2::{Digest, Sha512};

use crate::config::MidtransConfig;
use crate::domain::errors::DomainError;
use crate::domain::payment::{ChargeRequest, GatewayRedirect};
use crate::domain::ports::PaymentGateway;

const PRODUCTION_URL: &str = "https://app.midtrans.com/snap/v1";
const SANDBOX_URL: &str = "https://app.sandbox.midtrans.com/snap/v1";

#[derive(Clone)]
pub struct MidtransGateway {
    client: Client,
    server_key: String,
    base_url: String,
}

impl MidtransGateway {
    pub fn new(config: &MidtransConfig) -> Self {
        let base_url = if config.is_production {
            PRODUCTION_URL.to_string()
        } else {
            SANDBOX_URL.to_string()
        };
        Self {
            client: Client::new(),
            server_key: config.server_key.clone(),
            base_url,
        }
    }
}

impl PaymentGateway for MidtransGateway {
    fn create_transaction(&self, charge: &ChargeRequest) -> Result<GatewayRedirect, DomainError> {
        let items: Vec<serde_json::Value> = charge
            .items
            .iter()
            .map(|item| {
                json!({
                    "id": item.id,
                    "price": item.price,
                    "quantity": item.quantity,
                    "name": item.name,
                })
            })
            .collect();
        let address = json!({
            "first_name": charge.customer.first_name,
            "phone": charge.customer.phone,
            "address": charge.customer.address,
            "city": charge.customer.city,
            "postal_code": charge.customer.postal_code,
            "country_code": "IDN",
        });
        let body = json!({
            "transaction_details": {
                "order_id": charge.transaction_id,
                "gross_amount": charge.gross_amount,
            },
            "customer_details": {
                "first_name": charge.customer.first_name,
                "email": charge.customer.email,
                "phone": charge.customer.phone,
                "billing_address": address,
                "shipping_address": address,
            },
            "item_details": items,
            "expiry": {
                "start_time": charge.start_time.format("%Y-%m-%d %H:%M:%S %z").to_string(),
                "unit": "hours",
                "duration": charge.expiry_hours,
            },
        });

        let response = self
            .client
            .post(format!("{}/transactions", self.base_url))
            .basic_auth(&self.server_key, Some(""))
            .json(&body)
            .send()
            .map_err(|e| DomainError::Upstream(format!("payment gateway unreachable: {e}")))?;

        let status = response.status();
        let payload: serde_json::Value = response.json().map_err(|e| {
            DomainError::Upstream(format!("payment gateway returned an unreadable response: {e}"))
        })?;

        if !status.is_success() {
            let message = payload
                .get("error_messages")
                .and_then(|m| m.get(0))
                .and_then(|m| m.as_str())
                .unwrap_or("unknown gateway error");
            return Err(DomainError::Upstream(format!(
                "failed to create payment: {message}"
            )));
        }

        let redirect_url = payload
            .get("redirect_url")
            .and_then(|u| u.as_str())
            .ok_or_else(|| {
                DomainError::Upstream("payment gateway response had no redirect_url".to_string())
            })?;

        Ok(GatewayRedirect {
            token: payload
                .get("token")
                .and_then(|t| t.as_str())
                .map(String::from),
            redirect_url: redirect_url.to_string(),
        })
    }

    fn verify_signature(
        &self,
        transaction_id: &str,
        status_code: &str,
        gross_amount: &str,
        signature: &str,
    ) -> bool {
        // Sandbox-style setups run without a server key and skip the check.
        if self.server_key.is_empty() {
            return true;
        }
        let mut hasher = Sha512::new();
        hasher.update(transaction_id.as_bytes());
        hasher.update(status_code.as_bytes());
        hasher.update(gross_amount.as_bytes());
        hasher.update(self.server_key.as_bytes());
        hex::encode(hasher.finalize()) == signature.to_lowercase()
    }
}
