use diesel::prelude::*;

use crate::domain::user::{
    ConfirmEmailToken as DomainConfirmEmailToken, NewUser as DomainNewUser, User as DomainUser,
    UserCredentials,
};
use crate::models::user::{
    ConfirmEmailToken as DbConfirmEmailToken, NewAuthToken, NewConfirmEmailToken,
    NewUser as DbNewUser, User as DbUser,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .find(id)
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<DomainUser>> {
        Ok(self
            .get_credentials_by_email(email)?
            .map(|credentials| credentials.user))
    }

    fn get_credentials_by_email(&self, email: &str) -> RepositoryResult<Option<UserCredentials>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn get_user_by_token(&self, key: &str) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::{auth_tokens, users};

        let mut conn = self.conn()?;
        let user = users::table
            .inner_join(auth_tokens::table)
            .filter(auth_tokens::key.eq(key))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn get_confirm_email_token(
        &self,
        user_id: i32,
    ) -> RepositoryResult<Option<DomainConfirmEmailToken>> {
        use crate::schema::confirm_email_tokens;

        let mut conn = self.conn()?;
        let token = confirm_email_tokens::table
            .filter(confirm_email_tokens::user_id.eq(user_id))
            .order(confirm_email_tokens::created_at.desc())
            .first::<DbConfirmEmailToken>(&mut conn)
            .optional()?;

        Ok(token.map(Into::into))
    }
}

impl UserWriter for DieselRepository {
    fn create_user_with_token(
        &self,
        new_user: &DomainNewUser,
        confirm_key: &str,
    ) -> RepositoryResult<(DomainUser, DomainConfirmEmailToken)> {
        use crate::schema::{confirm_email_tokens, users};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let user = diesel::insert_into(users::table)
                .values(DbNewUser::from(new_user))
                .get_result::<DbUser>(conn)?;

            let token = diesel::insert_into(confirm_email_tokens::table)
                .values(NewConfirmEmailToken {
                    user_id: user.id,
                    key: confirm_key,
                })
                .get_result::<DbConfirmEmailToken>(conn)?;

            Ok((user.into(), token.into()))
        })
    }

    fn confirm_email(&self, email: &str, key: &str) -> RepositoryResult<DomainUser> {
        use crate::schema::{confirm_email_tokens, users};

        let mut conn = self.conn()?;
        let email = email.trim().to_lowercase();

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let token = confirm_email_tokens::table
                .inner_join(users::table)
                .filter(users::email.eq(&email))
                .filter(confirm_email_tokens::key.eq(key))
                .select(DbConfirmEmailToken::as_select())
                .first::<DbConfirmEmailToken>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let user = diesel::update(users::table.find(token.user_id))
                .set((
                    users::is_active.eq(true),
                    users::updated_at.eq(chrono::Local::now().naive_utc()),
                ))
                .get_result::<DbUser>(conn)?;

            diesel::delete(confirm_email_tokens::table.find(token.id)).execute(conn)?;

            Ok(user.into())
        })
    }

    fn get_or_create_auth_token(
        &self,
        user_id: i32,
        candidate_key: &str,
    ) -> RepositoryResult<String> {
        use crate::schema::auth_tokens;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let existing = auth_tokens::table
                .filter(auth_tokens::user_id.eq(user_id))
                .select(auth_tokens::key)
                .first::<String>(conn)
                .optional()?;

            if let Some(key) = existing {
                return Ok(key);
            }

            diesel::insert_into(auth_tokens::table)
                .values(NewAuthToken {
                    key: candidate_key,
                    user_id,
                })
                .execute(conn)?;

            Ok(candidate_key.to_string())
        })
    }
}
