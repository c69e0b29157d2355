pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::orders::OrderService;
use crate::application::payments::PaymentService;
use crate::application::reports::ReportService;
use crate::application::shipments::ShipmentService;
use crate::auth::TokenCodec;
use crate::config::AppConfig;
use crate::infrastructure::biteship::BiteshipGateway;
use crate::infrastructure::brevo::BrevoNotifier;
use crate::infrastructure::catalog_repo::DieselCatalogRepository;
use crate::infrastructure::midtrans::MidtransGateway;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::payment_repo::DieselPaymentRepository;
use crate::infrastructure::shipment_repo::DieselShipmentRepository;
use crate::infrastructure::user_repo::DieselUserRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Everything the handlers need, wired once at startup.
pub struct AppState {
    pub orders: OrderService<DieselOrderRepository>,
    pub payments: PaymentService<DieselPaymentRepository, DieselOrderRepository, MidtransGateway>,
    pub shipments: ShipmentService<DieselShipmentRepository, BiteshipGateway, BrevoNotifier>,
    pub reports: ReportService<DieselOrderRepository>,
    pub users: DieselUserRepository,
    pub catalog: DieselCatalogRepository,
    pub tokens: TokenCodec,
}

pub fn build_state(pool: DbPool, config: &AppConfig) -> AppState {
    AppState {
        orders: OrderService::new(DieselOrderRepository::new(pool.clone())),
        payments: PaymentService::new(
            DieselPaymentRepository::new(pool.clone()),
            DieselOrderRepository::new(pool.clone()),
            MidtransGateway::new(&config.midtrans),
        ),
        shipments: ShipmentService::new(
            DieselShipmentRepository::new(pool.clone()),
            BiteshipGateway::new(&config.biteship),
            BrevoNotifier::new(&config.brevo),
        ),
        reports: ReportService::new(DieselOrderRepository::new(pool.clone())),
        users: DieselUserRepository::new(pool.clone()),
        catalog: DieselCatalogRepository::new(pool),
        tokens: TokenCodec::new(config.jwt_secret.clone(), config.jwt_ttl_hours),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::list_addresses,
        handlers::auth::create_address,
        handlers::auth::update_address,
        handlers::auth::delete_address,
        handlers::catalog::list_categories,
        handlers::catalog::create_category,
        handlers::catalog::update_category,
        handlers::catalog::delete_category,
        handlers::catalog::list_products,
        handlers::catalog::get_product,
        handlers::catalog::create_product,
        handlers::catalog::update_product,
        handlers::catalog::delete_product,
        handlers::catalog::list_variants,
        handlers::catalog::create_variant,
        handlers::catalog::update_variant,
        handlers::catalog::delete_variant,
        handlers::orders::create_order,
        handlers::orders::my_orders,
        handlers::orders::get_order,
        handlers::orders::list_orders,
        handlers::orders::update_order_status,
        handlers::payments::create_payment,
        handlers::payments::list_payments_for_order,
        handlers::payments::get_payment,
        handlers::payments::update_payment_status,
        handlers::payments::payment_webhook,
        handlers::shipments::check_rates,
        handlers::shipments::create_shipment,
        handlers::shipments::create_courier_shipment,
        handlers::shipments::search_locations,
        handlers::shipments::track_by_order,
        handlers::shipments::live_tracking,
        handlers::shipments::get_shipment,
        handlers::shipments::update_shipment_status,
        handlers::shipments::update_tracking,
        handlers::reports::sales_report,
    ),
    components(schemas(
        domain::statuses::OrderStatus,
        domain::statuses::PaymentStatus,
        domain::statuses::PaymentMethod,
        domain::statuses::ShipmentStatus,
        domain::statuses::OrderType,
        domain::statuses::Role,
        domain::shipment::RateItem,
        domain::shipment::RateQuery,
        domain::shipment::RateQuote,
        domain::shipment::TrackingEvent,
        domain::shipment::TrackingInfo,
        domain::shipment::AreaSuggestion,
    )),
    tags(
        (name = "auth", description = "Accounts, sessions and the address book"),
        (name = "catalog", description = "Categories, products and variants"),
        (name = "orders", description = "Checkout and the order lifecycle"),
        (name = "payments", description = "Payment attempts and gateway webhooks"),
        (name = "shipments", description = "Shipments, rates and tracking"),
        (name = "reports", description = "Sales reporting"),
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::auth::register))
                    .route("/login", web::post().to(handlers::auth::login))
                    .route("/me", web::get().to(handlers::auth::me))
                    .route("/addresses", web::get().to(handlers::auth::list_addresses))
                    .route("/addresses", web::post().to(handlers::auth::create_address))
                    .route(
                        "/addresses/{id}",
                        web::put().to(handlers::auth::update_address),
                    )
                    .route(
                        "/addresses/{id}",
                        web::delete().to(handlers::auth::delete_address),
                    ),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(handlers::catalog::list_categories))
                    .route("", web::post().to(handlers::catalog::create_category))
                    .route("/{id}", web::put().to(handlers::catalog::update_category))
                    .route(
                        "/{id}",
                        web::delete().to(handlers::catalog::delete_category),
                    ),
            )
            .service(
                web::scope("/products")
                    .route("", web::get().to(handlers::catalog::list_products))
                    .route("", web::post().to(handlers::catalog::create_product))
                    .route(
                        "/{id}/variants",
                        web::get().to(handlers::catalog::list_variants),
                    )
                    .route(
                        "/{id}/variants",
                        web::post().to(handlers::catalog::create_variant),
                    )
                    .route("/{id}", web::get().to(handlers::catalog::get_product))
                    .route("/{id}", web::put().to(handlers::catalog::update_product))
                    .route("/{id}", web::delete().to(handlers::catalog::delete_product)),
            )
            .service(
                web::scope("/variants")
                    .route("/{id}", web::put().to(handlers::catalog::update_variant))
                    .route("/{id}", web::delete().to(handlers::catalog::delete_variant)),
            )
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/my", web::get().to(handlers::orders::my_orders))
                    .route(
                        "/{id}/status",
                        web::put().to(handlers::orders::update_order_status),
                    )
                    .route("/{id}", web::get().to(handlers::orders::get_order)),
            )
            .service(
                web::scope("/payments")
                    .route("", web::post().to(handlers::payments::create_payment))
                    .route("/webhook", web::post().to(handlers::payments::payment_webhook))
                    .route(
                        "/order/{order_id}",
                        web::get().to(handlers::payments::list_payments_for_order),
                    )
                    .route(
                        "/{id}/status",
                        web::put().to(handlers::payments::update_payment_status),
                    )
                    .route("/{id}", web::get().to(handlers::payments::get_payment)),
            )
            .service(
                web::scope("/shipments")
                    .route("/check-rates", web::post().to(handlers::shipments::check_rates))
                    .route(
                        "/biteship",
                        web::post().to(handlers::shipments::create_courier_shipment),
                    )
                    .route(
                        "/locations/search",
                        web::get().to(handlers::shipments::search_locations),
                    )
                    .route(
                        "/order/{order_id}/track",
                        web::get().to(handlers::shipments::track_by_order),
                    )
                    .route(
                        "/{id}/tracking",
                        web::get().to(handlers::shipments::live_tracking),
                    )
                    .route(
                        "/{id}/tracking",
                        web::put().to(handlers::shipments::update_tracking),
                    )
                    .route(
                        "/{id}/status",
                        web::put().to(handlers::shipments::update_shipment_status),
                    )
                    .route("/{id}", web::get().to(handlers::shipments::get_shipment))
                    .route("", web::post().to(handlers::shipments::create_shipment)),
            )
            .service(
                web::scope("/reports")
                    .route("/sales", web::get().to(handlers::reports::sales_report)),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
