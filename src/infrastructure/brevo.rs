//! Waybill notification over Brevo's transactional email API. Strictly
//! fire-and-forget: a lost email must never fail the shipment update
//! that triggered it.

use reqwest::blocking::Client;
use serde_json::json;

use crate::config::BrevoConfig;
use crate::domain::ports::WaybillNotifier;

const BREVO_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Clone)]
pub struct BrevoNotifier {
    client: Client,
    api_key: Option<String>,
    from_email: String,
    from_name: String,
    frontend_url: String,
}

impl BrevoNotifier {
    pub fn new(config: &BrevoConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
            frontend_url: config.frontend_url.trim_end_matches('/').to_string(),
        }
    }
}

impl WaybillNotifier for BrevoNotifier {
    fn waybill_assigned(&self, email: &str, order_number: &str, waybill: &str, courier: &str) {
        let Some(api_key) = &self.api_key else {
            log::warn!("email API key not configured, skipping waybill notification");
            return;
        };

        let tracking_url = format!("{}/tracking/{waybill}/{courier}", self.frontend_url);
        let html = format!(
            "<p>Your order <strong>#{order_number}</strong> is on its way.</p>\
             <p>Waybill: <strong>{waybill}</strong></p>\
             <p><a href=\"{tracking_url}\">Track your package</a></p>"
        );
        let body = json!({
            "sender": { "email": self.from_email, "name": self.from_name },
            "to": [{ "email": email }],
            "subject": format!("Your order #{order_number} has shipped"),
            "htmlContent": html,
        });

        match self
            .client
            .post(BREVO_URL)
            .header("api-key", api_key)
            .json(&body)
            .send()
        {
            Ok(response) if response.status().is_success() => {
                log::info!("waybill email sent to {email}");
            }
            Ok(response) => {
                log::error!(
                    "waybill email to {email} rejected with status {}",
                    response.status()
                );
            }
            Err(e) => log::error!("waybill email to {email} failed: {e}"),
        }
    }
}
