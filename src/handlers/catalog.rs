use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::require_staff;
use crate::domain::ports::AuthContext;
use crate::errors::AppError;
use crate::infrastructure::catalog_repo::{NewCategoryInput, NewProductInput, NewVariantInput};
use crate::infrastructure::models::{CategoryRow, ProductRow, VariantRow};
use crate::AppState;

use super::parse_money;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub active: bool,
}

impl From<CategoryRow> for CategoryResponse {
    fn from(row: CategoryRow) -> Self {
        CategoryResponse {
            id: row.id,
            parent_id: row.parent_id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            active: row.active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Decimal amounts as strings, e.g. "150000.00"
    pub base_price: String,
    /// Grams
    pub weight: String,
    /// Centimetres
    pub length: String,
    pub width: String,
    pub height: String,
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl ProductRequest {
    fn into_input(self) -> Result<NewProductInput, AppError> {
        Ok(NewProductInput {
            category_id: self.category_id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            base_price: parse_money("base_price", &self.base_price)?,
            weight: parse_money("weight", &self.weight)?,
            length: parse_money("length", &self.length)?,
            width: parse_money("width", &self.width)?,
            height: parse_money("height", &self.height)?,
            image_url: self.image_url,
            active: self.active,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub base_price: String,
    pub weight: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub image_url: Option<String>,
    pub active: bool,
    pub variants: Vec<VariantResponse>,
}

impl ProductResponse {
    fn from_row(row: ProductRow, variants: Vec<VariantRow>) -> Self {
        ProductResponse {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            base_price: row.base_price.to_string(),
            weight: row.weight.to_string(),
            length: row.length.to_string(),
            width: row.width.to_string(),
            height: row.height.to_string(),
            image_url: row.image_url,
            active: row.active,
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VariantRequest {
    pub sku: String,
    pub size: String,
    pub color: String,
    pub stock: i32,
    pub price_override: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl VariantRequest {
    fn into_input(self) -> Result<NewVariantInput, AppError> {
        if self.stock < 0 {
            return Err(AppError::BadRequest("stock must not be negative".to_string()));
        }
        Ok(NewVariantInput {
            sku: self.sku,
            size: self.size,
            color: self.color,
            stock: self.stock,
            price_override: self
                .price_override
                .map(|p| parse_money("price_override", &p))
                .transpose()?,
            active: self.active,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VariantResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub size: String,
    pub color: String,
    pub stock: i32,
    pub price_override: Option<String>,
    pub active: bool,
}

impl From<VariantRow> for VariantResponse {
    fn from(row: VariantRow) -> Self {
        VariantResponse {
            id: row.id,
            product_id: row.product_id,
            sku: row.sku,
            size: row.size,
            color: row.color,
            stock: row.stock,
            price_override: row.price_override.map(|p| p.to_string()),
            active: row.active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListProductsParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub category_id: Option<Uuid>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListProductsResponse {
    pub items: Vec<ProductResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Category handlers ────────────────────────────────────────────────────────

/// GET /categories
#[utoipa::path(
    get,
    path = "/categories",
    responses((status = 200, description = "All categories", body = [CategoryResponse])),
    tag = "catalog"
)]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let rows = web::block(move || state.catalog.list_categories().map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let categories: Vec<CategoryResponse> = rows.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(categories))
}

/// POST /categories
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 403, description = "Caller is not staff"),
    ),
    tag = "catalog"
)]
pub async fn create_category(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth)?;
    let body = body.into_inner();
    let input = NewCategoryInput {
        parent_id: body.parent_id,
        name: body.name,
        slug: body.slug,
        description: body.description,
        active: body.active,
    };

    let row = web::block(move || state.catalog.create_category(input).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CategoryResponse::from(row)))
}

/// PUT /categories/{id}
#[utoipa::path(
    put,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found"),
    ),
    tag = "catalog"
)]
pub async fn update_category(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth)?;
    let category_id = path.into_inner();
    let body = body.into_inner();
    let input = NewCategoryInput {
        parent_id: body.parent_id,
        name: body.name,
        slug: body.slug,
        description: body.description,
        active: body.active,
    };

    let row = web::block(move || {
        state
            .catalog
            .update_category(category_id, input)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CategoryResponse::from(row)))
}

/// DELETE /categories/{id}
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
    ),
    tag = "catalog"
)]
pub async fn delete_category(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth)?;
    let category_id = path.into_inner();
    web::block(move || state.catalog.delete_category(category_id).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

// ── Product handlers ─────────────────────────────────────────────────────────

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("category_id" = Option<Uuid>, Query, description = "Filter by category"),
    ),
    responses((status = 200, description = "Paginated products", body = ListProductsResponse)),
    tag = "catalog"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let category_id = params.category_id;

    let result = web::block(move || {
        state
            .catalog
            .list_products(page, limit, category_id)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListProductsResponse {
        items: result
            .items
            .into_iter()
            .map(|row| ProductResponse::from_row(row, vec![]))
            .collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product with its variants", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let response = web::block(move || {
        let row = state
            .catalog
            .find_product(product_id)
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("product {product_id} not found")))?;
        let variants = state
            .catalog
            .list_variants(product_id)
            .map_err(AppError::from)?;
        Ok::<_, AppError>(ProductResponse::from_row(row, variants))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(response))
}

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "Category not found"),
    ),
    tag = "catalog"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth)?;
    let input = body.into_inner().into_input()?;

    let row = web::block(move || state.catalog.create_product(input).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductResponse::from_row(row, vec![])))
}

/// PUT /products/{id}
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn update_product(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth)?;
    let product_id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let row = web::block(move || {
        state
            .catalog
            .update_product(product_id, input)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from_row(row, vec![])))
}

/// DELETE /products/{id}
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 204, description = "Product soft-deleted"),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth)?;
    let product_id = path.into_inner();
    web::block(move || state.catalog.delete_product(product_id).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

// ── Variant handlers ─────────────────────────────────────────────────────────

/// GET /products/{id}/variants
#[utoipa::path(
    get,
    path = "/products/{id}/variants",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses((status = 200, description = "Variants of the product", body = [VariantResponse])),
    tag = "catalog"
)]
pub async fn list_variants(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let rows = web::block(move || state.catalog.list_variants(product_id).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let variants: Vec<VariantResponse> = rows.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(variants))
}

/// POST /products/{id}/variants
#[utoipa::path(
    post,
    path = "/products/{id}/variants",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = VariantRequest,
    responses(
        (status = 201, description = "Variant created", body = VariantResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn create_variant(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<VariantRequest>,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth)?;
    let product_id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let row = web::block(move || {
        state
            .catalog
            .create_variant(product_id, input)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(VariantResponse::from(row)))
}

/// PUT /variants/{id}
#[utoipa::path(
    put,
    path = "/variants/{id}",
    params(("id" = Uuid, Path, description = "Variant UUID")),
    request_body = VariantRequest,
    responses(
        (status = 200, description = "Variant updated", body = VariantResponse),
        (status = 404, description = "Variant not found"),
    ),
    tag = "catalog"
)]
pub async fn update_variant(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<VariantRequest>,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth)?;
    let variant_id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let row = web::block(move || {
        state
            .catalog
            .update_variant(variant_id, input)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(VariantResponse::from(row)))
}

/// DELETE /variants/{id}
#[utoipa::path(
    delete,
    path = "/variants/{id}",
    params(("id" = Uuid, Path, description = "Variant UUID")),
    responses(
        (status = 204, description = "Variant deleted"),
        (status = 404, description = "Variant not found"),
    ),
    tag = "catalog"
)]
pub async fn delete_variant(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth)?;
    let variant_id = path.into_inner();
    web::block(move || state.catalog.delete_variant(variant_id).map_err(AppError::from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
