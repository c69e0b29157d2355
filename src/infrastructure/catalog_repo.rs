use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::schema::{categories, product_variants, products};

use super::models::{
    CategoryRow, NewCategoryRow, NewProductRow, NewVariantRow, ProductRow, VariantRow,
};

#[derive(Debug, Clone)]
pub struct NewCategoryInput {
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct NewProductInput {
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub base_price: BigDecimal,
    pub weight: BigDecimal,
    pub length: BigDecimal,
    pub width: BigDecimal,
    pub height: BigDecimal,
    pub image_url: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct NewVariantInput {
    pub sku: String,
    pub size: String,
    pub color: String,
    pub stock: i32,
    pub price_override: Option<BigDecimal>,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct ProductPage {
    pub items: Vec<ProductRow>,
    pub total: i64,
}

#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // ── categories ───────────────────────────────────────────────────────────

    pub fn list_categories(&self) -> Result<Vec<CategoryRow>, DomainError> {
        let mut conn = self.pool.get()?;
        categories::table
            .order(categories::name.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)
            .map_err(Into::into)
    }

    pub fn find_category(&self, id: Uuid) -> Result<Option<CategoryRow>, DomainError> {
        let mut conn = self.pool.get()?;
        categories::table
            .filter(categories::id.eq(id))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    pub fn create_category(&self, input: NewCategoryInput) -> Result<CategoryRow, DomainError> {
        let mut conn = self.pool.get()?;

        if let Some(parent_id) = input.parent_id {
            let exists: i64 = categories::table
                .filter(categories::id.eq(parent_id))
                .count()
                .get_result(&mut conn)?;
            if exists == 0 {
                return Err(DomainError::NotFound(format!(
                    "category {parent_id} not found"
                )));
            }
        }

        let id = Uuid::new_v4();
        diesel::insert_into(categories::table)
            .values(&NewCategoryRow {
                id,
                parent_id: input.parent_id,
                name: input.name,
                slug: input.slug,
                description: input.description,
                active: input.active,
            })
            .execute(&mut conn)?;

        categories::table
            .find(id)
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .map_err(Into::into)
    }

    pub fn update_category(
        &self,
        id: Uuid,
        input: NewCategoryInput,
    ) -> Result<CategoryRow, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(categories::table.find(id))
            .set((
                categories::parent_id.eq(input.parent_id),
                categories::name.eq(input.name),
                categories::slug.eq(input.slug),
                categories::description.eq(input.description),
                categories::active.eq(input.active),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound(format!("category {id} not found")));
        }

        categories::table
            .find(id)
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .map_err(Into::into)
    }

    pub fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(categories::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound(format!("category {id} not found")));
        }
        Ok(())
    }

    // ── products ─────────────────────────────────────────────────────────────

    pub fn list_products(
        &self,
        page: i64,
        limit: i64,
        category_id: Option<Uuid>,
    ) -> Result<ProductPage, DomainError> {
        let mut conn = self.pool.get()?;
        let offset = (page - 1) * limit;

        let total: i64 = match category_id {
            Some(category_id) => products::table
                .filter(products::deleted_at.is_null())
                .filter(products::category_id.eq(category_id))
                .count()
                .get_result(&mut conn)?,
            None => products::table
                .filter(products::deleted_at.is_null())
                .count()
                .get_result(&mut conn)?,
        };

        let mut page_query = products::table
            .filter(products::deleted_at.is_null())
            .select(ProductRow::as_select())
            .into_boxed();
        if let Some(category_id) = category_id {
            page_query = page_query.filter(products::category_id.eq(category_id));
        }
        let items = page_query
            .order(products::created_at.desc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)?;

        Ok(ProductPage { items, total })
    }

    pub fn find_product(&self, id: Uuid) -> Result<Option<ProductRow>, DomainError> {
        let mut conn = self.pool.get()?;
        products::table
            .filter(products::id.eq(id))
            .filter(products::deleted_at.is_null())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    pub fn create_product(&self, input: NewProductInput) -> Result<ProductRow, DomainError> {
        let mut conn = self.pool.get()?;

        let category_exists: i64 = categories::table
            .filter(categories::id.eq(input.category_id))
            .count()
            .get_result(&mut conn)?;
        if category_exists == 0 {
            return Err(DomainError::NotFound(format!(
                "category {} not found",
                input.category_id
            )));
        }

        let id = Uuid::new_v4();
        diesel::insert_into(products::table)
            .values(&NewProductRow {
                id,
                category_id: input.category_id,
                name: input.name,
                slug: input.slug,
                description: input.description,
                base_price: input.base_price,
                weight: input.weight,
                length: input.length,
                width: input.width,
                height: input.height,
                image_url: input.image_url,
                active: input.active,
            })
            .execute(&mut conn)?;

        products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .map_err(Into::into)
    }

    pub fn update_product(
        &self,
        id: Uuid,
        input: NewProductInput,
    ) -> Result<ProductRow, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            products::table
                .filter(products::id.eq(id))
                .filter(products::deleted_at.is_null()),
        )
        .set((
            products::category_id.eq(input.category_id),
            products::name.eq(input.name),
            products::slug.eq(input.slug),
            products::description.eq(input.description),
            products::base_price.eq(input.base_price),
            products::weight.eq(input.weight),
            products::length.eq(input.length),
            products::width.eq(input.width),
            products::height.eq(input.height),
            products::image_url.eq(input.image_url),
            products::active.eq(input.active),
        ))
        .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound(format!("product {id} not found")));
        }

        products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .map_err(Into::into)
    }

    /// Soft delete: the product disappears from the catalog but order
    /// item snapshots keep pointing at a real row.
    pub fn delete_product(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(
            products::table
                .filter(products::id.eq(id))
                .filter(products::deleted_at.is_null()),
        )
        .set((
            products::deleted_at.eq(Utc::now()),
            products::active.eq(false),
        ))
        .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound(format!("product {id} not found")));
        }
        Ok(())
    }

    // ── variants ─────────────────────────────────────────────────────────────

    pub fn list_variants(&self, product_id: Uuid) -> Result<Vec<VariantRow>, DomainError> {
        let mut conn = self.pool.get()?;
        product_variants::table
            .filter(product_variants::product_id.eq(product_id))
            .order(product_variants::sku.asc())
            .select(VariantRow::as_select())
            .load(&mut conn)
            .map_err(Into::into)
    }

    pub fn create_variant(
        &self,
        product_id: Uuid,
        input: NewVariantInput,
    ) -> Result<VariantRow, DomainError> {
        let mut conn = self.pool.get()?;

        let product_exists: i64 = products::table
            .filter(products::id.eq(product_id))
            .filter(products::deleted_at.is_null())
            .count()
            .get_result(&mut conn)?;
        if product_exists == 0 {
            return Err(DomainError::NotFound(format!(
                "product {product_id} not found"
            )));
        }

        let id = Uuid::new_v4();
        diesel::insert_into(product_variants::table)
            .values(&NewVariantRow {
                id,
                product_id,
                sku: input.sku,
                size: input.size,
                color: input.color,
                stock: input.stock,
                price_override: input.price_override,
                active: input.active,
            })
            .execute(&mut conn)?;

        product_variants::table
            .find(id)
            .select(VariantRow::as_select())
            .first(&mut conn)
            .map_err(Into::into)
    }

    pub fn update_variant(
        &self,
        id: Uuid,
        input: NewVariantInput,
    ) -> Result<VariantRow, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(product_variants::table.find(id))
            .set((
                product_variants::sku.eq(input.sku),
                product_variants::size.eq(input.size),
                product_variants::color.eq(input.color),
                product_variants::stock.eq(input.stock),
                product_variants::price_override.eq(input.price_override),
                product_variants::active.eq(input.active),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound(format!("variant {id} not found")));
        }

        product_variants::table
            .find(id)
            .select(VariantRow::as_select())
            .first(&mut conn)
            .map_err(Into::into)
    }

    pub fn delete_variant(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(product_variants::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound(format!("variant {id} not found")));
        }
        Ok(())
    }
}
