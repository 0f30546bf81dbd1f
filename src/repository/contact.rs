use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::contact::{
    Contact as DomainContact, NewContact as DomainNewContact, UpdateContact as DomainUpdateContact,
};
use crate::models::contact::{
    Contact as DbContact, NewContact as DbNewContact, UpdateContact as DbUpdateContact,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ContactReader, ContactWriter, DieselRepository};

impl ContactReader for DieselRepository {
    fn list_contacts(&self, user_id: i32) -> RepositoryResult<Vec<DomainContact>> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let items = contacts::table
            .filter(contacts::user_id.eq(user_id))
            .order((contacts::is_main.desc(), contacts::id.asc()))
            .load::<DbContact>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    fn get_contact(
        &self,
        user_id: i32,
        contact_id: i32,
    ) -> RepositoryResult<Option<DomainContact>> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let contact = contacts::table
            .filter(contacts::id.eq(contact_id))
            .filter(contacts::user_id.eq(user_id))
            .first::<DbContact>(&mut conn)
            .optional()?;

        Ok(contact.map(Into::into))
    }
}

impl ContactWriter for DieselRepository {
    fn create_contact(&self, new_contact: &DomainNewContact) -> RepositoryResult<DomainContact> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(contacts::table)
                .values(DbNewContact::from(new_contact))
                .get_result::<DbContact>(conn)?;

            if new_contact.is_main {
                return promote(conn, new_contact.user_id, created.id);
            }

            Ok(created.into())
        })
    }

    fn update_contact(
        &self,
        user_id: i32,
        contact_id: i32,
        updates: &DomainUpdateContact,
    ) -> RepositoryResult<DomainContact> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateContact::new(updates, Local::now().naive_utc());

        let target = contacts::table
            .filter(contacts::id.eq(contact_id))
            .filter(contacts::user_id.eq(user_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbContact>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_contacts(&self, user_id: i32, contact_ids: &[i32]) -> RepositoryResult<usize> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            contacts::table
                .filter(contacts::user_id.eq(user_id))
                .filter(contacts::id.eq_any(contact_ids)),
        )
        .execute(&mut conn)?;

        Ok(deleted)
    }

    fn promote_contact(&self, user_id: i32, contact_id: i32) -> RepositoryResult<DomainContact> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            promote(conn, user_id, contact_id)
        })
    }
}

/// Demote the current main contact of the same type, then flag `contact_id`.
fn promote(
    conn: &mut SqliteConnection,
    user_id: i32,
    contact_id: i32,
) -> RepositoryResult<DomainContact> {
    use crate::schema::contacts;

    let contact = contacts::table
        .filter(contacts::id.eq(contact_id))
        .filter(contacts::user_id.eq(user_id))
        .first::<DbContact>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

    diesel::update(
        contacts::table
            .filter(contacts::user_id.eq(user_id))
            .filter(contacts::contact_type.eq(&contact.contact_type))
            .filter(contacts::is_main.eq(true)),
    )
    .set(contacts::is_main.eq(false))
    .execute(conn)?;

    let promoted = diesel::update(contacts::table.find(contact.id))
        .set(contacts::is_main.eq(true))
        .get_result::<DbContact>(conn)?;

    Ok(promoted.into())
}
