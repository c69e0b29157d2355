use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::errors::DomainError;
use crate::schema::daily_sequences;

/// Draws the next value of a date-scoped counter. The upsert increments
/// the row atomically, so concurrent draws for the same scope and day
/// each observe a distinct value.
pub fn next_value(
    conn: &mut PgConnection,
    scope: &str,
    date: NaiveDate,
) -> Result<i32, DomainError> {
    diesel::insert_into(daily_sequences::table)
        .values((
            daily_sequences::scope.eq(scope),
            daily_sequences::seq_date.eq(date),
            daily_sequences::value.eq(1),
        ))
        .on_conflict((daily_sequences::scope, daily_sequences::seq_date))
        .do_update()
        .set(daily_sequences::value.eq(daily_sequences::value + 1))
        .returning(daily_sequences::value)
        .get_result(conn)
        .map_err(Into::into)
}
