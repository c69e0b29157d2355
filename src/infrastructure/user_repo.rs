use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::statuses::Role;
use crate::schema::{addresses, users};

use super::models::{AddressRow, NewAddressRow, NewUserRow, UserRow};

#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewAddressInput {
    pub label: Option<String>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub is_default: bool,
}

fn account(row: UserRow) -> Result<UserAccount, DomainError> {
    Ok(UserAccount {
        id: row.id,
        email: row.email,
        password_hash: row.password_hash,
        full_name: row.full_name,
        phone: row.phone,
        role: Role::parse(&row.role)?,
        created_at: row.created_at,
    })
}

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn create_user(&self, record: NewUserRecord) -> Result<UserAccount, DomainError> {
        let mut conn = self.pool.get()?;

        let taken: i64 = users::table
            .filter(users::email.eq(&record.email))
            .count()
            .get_result(&mut conn)?;
        if taken > 0 {
            return Err(DomainError::Validation(format!(
                "email {} is already registered",
                record.email
            )));
        }

        let id = Uuid::new_v4();
        diesel::insert_into(users::table)
            .values(&NewUserRow {
                id,
                email: record.email,
                password_hash: record.password_hash,
                full_name: record.full_name,
                phone: record.phone,
                role: record.role.as_str().to_string(),
            })
            .execute(&mut conn)?;

        let row = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)?;
        account(row)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(account).transpose()
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = users::table
            .filter(users::id.eq(id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(account).transpose()
    }

    pub fn list_addresses(&self, user_id: Uuid) -> Result<Vec<AddressRow>, DomainError> {
        let mut conn = self.pool.get()?;
        addresses::table
            .filter(addresses::user_id.eq(user_id))
            .order(addresses::created_at.desc())
            .select(AddressRow::as_select())
            .load(&mut conn)
            .map_err(Into::into)
    }

    pub fn create_address(
        &self,
        user_id: Uuid,
        input: NewAddressInput,
    ) -> Result<AddressRow, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Only one default address per user.
            if input.is_default {
                diesel::update(addresses::table.filter(addresses::user_id.eq(user_id)))
                    .set(addresses::is_default.eq(false))
                    .execute(conn)?;
            }

            let id = Uuid::new_v4();
            diesel::insert_into(addresses::table)
                .values(&NewAddressRow {
                    id,
                    user_id,
                    label: input.label,
                    recipient_name: input.recipient_name,
                    recipient_phone: input.recipient_phone,
                    line1: input.line1,
                    line2: input.line2,
                    city: input.city,
                    province: input.province,
                    postal_code: input.postal_code,
                    is_default: input.is_default,
                })
                .execute(conn)?;

            addresses::table
                .find(id)
                .select(AddressRow::as_select())
                .first(conn)
                .map_err(Into::into)
        })
    }

    pub fn update_address(
        &self,
        user_id: Uuid,
        address_id: Uuid,
        input: NewAddressInput,
    ) -> Result<AddressRow, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let owned: i64 = addresses::table
                .filter(addresses::id.eq(address_id))
                .filter(addresses::user_id.eq(user_id))
                .count()
                .get_result(conn)?;
            if owned == 0 {
                return Err(DomainError::NotFound(format!(
                    "address {address_id} not found"
                )));
            }

            if input.is_default {
                diesel::update(addresses::table.filter(addresses::user_id.eq(user_id)))
                    .set(addresses::is_default.eq(false))
                    .execute(conn)?;
            }

            diesel::update(addresses::table.find(address_id))
                .set((
                    addresses::label.eq(input.label),
                    addresses::recipient_name.eq(input.recipient_name),
                    addresses::recipient_phone.eq(input.recipient_phone),
                    addresses::line1.eq(input.line1),
                    addresses::line2.eq(input.line2),
                    addresses::city.eq(input.city),
                    addresses::province.eq(input.province),
                    addresses::postal_code.eq(input.postal_code),
                    addresses::is_default.eq(input.is_default),
                ))
                .execute(conn)?;

            addresses::table
                .find(address_id)
                .select(AddressRow::as_select())
                .first(conn)
                .map_err(Into::into)
        })
    }

    pub fn delete_address(&self, user_id: Uuid, address_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(
            addresses::table
                .filter(addresses::id.eq(address_id))
                .filter(addresses::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound(format!(
                "address {address_id} not found"
            )));
        }
        Ok(())
    }
}
