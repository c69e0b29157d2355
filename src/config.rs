use std::env;

#[derive(Debug, Clone)]
pub struct MidtransConfig {
    pub server_key: String,
    pub is_production: bool,
}

#[derive(Debug, Clone)]
pub struct BiteshipConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct BrevoConfig {
    /// Absent key means notifications are logged and skipped.
    pub api_key: Option<String>,
    pub from_email: String,
    pub from_name: String,
    pub frontend_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub midtrans: MidtransConfig,
    pub biteship: BiteshipConfig,
    pub brevo: BrevoConfig,
}

impl AppConfig {
    /// Reads the whole configuration from the environment. DATABASE_URL
    /// and JWT_SECRET are mandatory; everything else has a development
    /// default.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_ttl_hours: env::var("JWT_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_TTL_HOURS must be a valid number"),
            midtrans: MidtransConfig {
                server_key: env::var("MIDTRANS_SERVER_KEY").unwrap_or_default(),
                is_production: env::var("MIDTRANS_IS_PRODUCTION")
                    .map(|v| v == "true")
                    .unwrap_or(false),
            },
            biteship: BiteshipConfig {
                api_key: env::var("BITESHIP_API_KEY").unwrap_or_default(),
                base_url: env::var("BITESHIP_BASE_URL")
                    .unwrap_or_else(|_| "https://api.biteship.com".to_string()),
            },
            brevo: BrevoConfig {
                api_key: env::var("BREVO_API_KEY").ok(),
                from_email: env::var("EMAIL_FROM")
                    .unwrap_or_else(|_| "noreply@example.com".to_string()),
                from_name: env::var("EMAIL_FROM_NAME")
                    .unwrap_or_else(|_| "Storefront".to_string()),
                frontend_url: env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            },
        }
    }
}
