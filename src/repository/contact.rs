use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel::sqlite::Sqlite;

use crate::db::{get_connection, lower_unicode};
use crate::domain::contact::{Contact, NewContact, UpdateContact};
use crate::domain::filter::{ContactField, ContactPredicate, FieldMatch};
use crate::domain::types::ContactId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ContactListQuery, ContactReader, ContactWriter, DieselRepository};
use crate::schema::contacts;

type ContactCondition = Box<dyn BoxableExpression<contacts::table, Sqlite, SqlType = Bool>>;

fn clause_condition(clause: &FieldMatch) -> ContactCondition {
    let pattern = clause.like_pattern();
    match clause.field() {
        ContactField::Name => Box::new(
            lower_unicode(contacts::name.nullable())
                .assume_not_null()
                .like(pattern)
                .escape('\\'),
        ),
        // NULL phones make the clause NULL, which never selects a row.
        ContactField::Phone => Box::new(
            lower_unicode(contacts::phone)
                .assume_not_null()
                .like(pattern)
                .escape('\\'),
        ),
    }
}

/// Renders the predicate as a SQL condition; `None` means "no WHERE clause".
fn predicate_condition(predicate: &ContactPredicate) -> Option<ContactCondition> {
    predicate
        .clauses()
        .iter()
        .map(clause_condition)
        .reduce(|acc, next| -> ContactCondition { Box::new(acc.or(next)) })
}

impl ContactReader for DieselRepository {
    fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<(usize, Vec<Contact>)> {
        use crate::models::contact::Contact as DbContact;

        let mut conn = get_connection(&self.pool)?;

        let mut count_query = contacts::table.count().into_boxed();
        if let Some(condition) = predicate_condition(&query.predicate) {
            count_query = count_query.filter(condition);
        }
        let total: i64 = count_query.get_result(&mut conn)?;

        let mut items_query = contacts::table
            .order(contacts::id.asc())
            .select(DbContact::as_select())
            .into_boxed();
        if let Some(condition) = predicate_condition(&query.predicate) {
            items_query = items_query.filter(condition);
        }
        if let Some(page) = query.pagination {
            items_query = items_query
                .limit(i64::try_from(page.per_page()).unwrap_or(i64::MAX))
                .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX));
        }

        let items = items_query
            .load::<DbContact>(&mut conn)?
            .into_iter()
            .map(Contact::try_from)
            .collect::<Result<Vec<Contact>, _>>()?;

        Ok((total as usize, items))
    }

    fn get_contact_by_id(&self, id: ContactId) -> RepositoryResult<Contact> {
        use crate::models::contact::Contact as DbContact;

        let mut conn = get_connection(&self.pool)?;
        let contact = contacts::table
            .find(id.get())
            .select(DbContact::as_select())
            .first::<DbContact>(&mut conn)?;

        Ok(Contact::try_from(contact)?)
    }

    fn contact_exists(&self, contact: &NewContact) -> RepositoryResult<bool> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = contacts::table
            .select(contacts::id)
            .filter(contacts::name.eq(contact.name.as_str()))
            .into_boxed();
        query = match &contact.phone {
            Some(phone) => query.filter(contacts::phone.eq(phone.as_str())),
            None => query.filter(contacts::phone.is_null()),
        };

        let found = query.first::<i32>(&mut conn).optional()?;
        Ok(found.is_some())
    }
}

impl ContactWriter for DieselRepository {
    fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact> {
        use crate::models::contact::{Contact as DbContact, NewContact as DbNewContact};

        let mut conn = get_connection(&self.pool)?;
        let insertable = DbNewContact::from_domain(new_contact, Utc::now().naive_utc());

        let created = diesel::insert_into(contacts::table)
            .values(&insertable)
            .returning(DbContact::as_returning())
            .get_result::<DbContact>(&mut conn)?;

        Ok(Contact::try_from(created)?)
    }

    fn update_contact(&self, id: ContactId, updates: &UpdateContact) -> RepositoryResult<Contact> {
        use crate::models::contact::{Contact as DbContact, UpdateContact as DbUpdateContact};

        let mut conn = get_connection(&self.pool)?;
        let changes = DbUpdateContact::from_domain(updates, Utc::now().naive_utc());

        let updated = diesel::update(contacts::table.find(id.get()))
            .set(&changes)
            .returning(DbContact::as_returning())
            .get_result::<DbContact>(&mut conn)?;

        Ok(Contact::try_from(updated)?)
    }

    fn delete_contact(&self, id: ContactId) -> RepositoryResult<()> {
        let mut conn = get_connection(&self.pool)?;

        let affected = diesel::delete(contacts::table.find(id.get())).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
