use diesel::prelude::*;

use crate::domain::shop::Shop as DomainShop;
use crate::models::shop::Shop as DbShop;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ShopReader, ShopWriter};

impl ShopReader for DieselRepository {
    fn list_active_shops(&self) -> RepositoryResult<Vec<DomainShop>> {
        use crate::schema::shops;

        let mut conn = self.conn()?;
        let items = shops::table
            .filter(shops::state.eq(true))
            .order(shops::name.asc())
            .load::<DbShop>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    fn get_shop_by_owner(&self, user_id: i32) -> RepositoryResult<Option<DomainShop>> {
        use crate::schema::shops;

        let mut conn = self.conn()?;
        let shop = shops::table
            .filter(shops::user_id.eq(user_id))
            .first::<DbShop>(&mut conn)
            .optional()?;

        Ok(shop.map(Into::into))
    }
}

impl ShopWriter for DieselRepository {
    fn set_shop_state(&self, user_id: i32, state: bool) -> RepositoryResult<DomainShop> {
        use crate::schema::shops;

        let mut conn = self.conn()?;
        let updated = diesel::update(shops::table.filter(shops::user_id.eq(user_id)))
            .set((
                shops::state.eq(state),
                shops::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .get_result::<DbShop>(&mut conn)?;

        Ok(updated.into())
    }
}
