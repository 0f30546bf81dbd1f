use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::product::{
    ProductInfo as DomainProductInfo, ProductListQuery, ProductParameterValue, ShopSummary,
};
use crate::models::category::Category as DbCategory;
use crate::models::product::{Product as DbProduct, ProductInfo as DbProductInfo};
use crate::models::shop::Shop as DbShop;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProductReader};

type ListingRow = (DbProductInfo, DbProduct, DbCategory, DbShop);

impl ProductReader for DieselRepository {
    fn get_product_info(&self, id: i32) -> RepositoryResult<Option<DomainProductInfo>> {
        use crate::schema::{categories, product_infos, products, shops};

        let mut conn = self.conn()?;
        let row = product_infos::table
            .inner_join(products::table.inner_join(categories::table))
            .inner_join(shops::table)
            .filter(product_infos::id.eq(id))
            .select((
                DbProductInfo::as_select(),
                DbProduct::as_select(),
                DbCategory::as_select(),
                DbShop::as_select(),
            ))
            .first::<ListingRow>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(assemble_listings(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn list_product_infos(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProductInfo>)> {
        use crate::schema::{categories, product_infos, products, shops};

        let mut conn = self.conn()?;

        let mut count_query = product_infos::table
            .inner_join(products::table)
            .inner_join(shops::table)
            .into_boxed::<Sqlite>();

        if let Some(shop_id) = query.shop_id {
            count_query = count_query.filter(product_infos::shop_id.eq(shop_id));
        }
        if let Some(category_id) = query.category_id {
            count_query = count_query.filter(products::category_id.eq(category_id));
        }
        if query.only_available {
            count_query = count_query
                .filter(shops::state.eq(true))
                .filter(product_infos::quantity.gt(0));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = product_infos::table
            .inner_join(products::table.inner_join(categories::table))
            .inner_join(shops::table)
            .select((
                DbProductInfo::as_select(),
                DbProduct::as_select(),
                DbCategory::as_select(),
                DbShop::as_select(),
            ))
            .into_boxed::<Sqlite>();

        if let Some(shop_id) = query.shop_id {
            items = items.filter(product_infos::shop_id.eq(shop_id));
        }
        if let Some(category_id) = query.category_id {
            items = items.filter(products::category_id.eq(category_id));
        }
        if query.only_available {
            items = items
                .filter(shops::state.eq(true))
                .filter(product_infos::quantity.gt(0));
        }

        items = items.order(product_infos::id.asc());

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let rows = items.load::<ListingRow>(&mut conn)?;
        let listings = assemble_listings(&mut conn, rows)?;

        Ok((total, listings))
    }

    fn shop_lists_product(&self, user_id: i32, product_id: i32) -> RepositoryResult<bool> {
        use crate::schema::{product_infos, shops};

        let mut conn = self.conn()?;
        let listed = diesel::select(diesel::dsl::exists(
            product_infos::table
                .inner_join(shops::table)
                .filter(shops::user_id.eq(user_id))
                .filter(product_infos::product_id.eq(product_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(listed)
    }
}

fn assemble_listings(
    conn: &mut SqliteConnection,
    rows: Vec<ListingRow>,
) -> RepositoryResult<Vec<DomainProductInfo>> {
    let ids: Vec<i32> = rows.iter().map(|(info, ..)| info.id).collect();
    let mut parameters = load_parameters(conn, &ids)?;

    Ok(rows
        .into_iter()
        .map(|(info, product, category, shop)| DomainProductInfo {
            id: info.id,
            product: product.into(),
            category: category.into(),
            shop: ShopSummary {
                id: shop.id,
                name: shop.name,
                state: shop.state,
            },
            name: info.name,
            model: info.model,
            external_id: info.external_id,
            quantity: info.quantity,
            price: info.price,
            price_rrc: info.price_rrc,
            parameters: parameters.remove(&info.id).unwrap_or_default(),
        })
        .collect())
}

fn load_parameters(
    conn: &mut SqliteConnection,
    product_info_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<ProductParameterValue>>> {
    use crate::schema::{parameters, product_parameters};

    if product_info_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_parameters::table
        .inner_join(parameters::table)
        .filter(product_parameters::product_info_id.eq_any(product_info_ids))
        .order((product_parameters::product_info_id, parameters::name))
        .select((
            product_parameters::product_info_id,
            parameters::name,
            product_parameters::value,
        ))
        .load::<(i32, String, String)>(conn)?;

    let mut map: HashMap<i32, Vec<ProductParameterValue>> = HashMap::new();
    for (product_info_id, parameter, value) in rows {
        map.entry(product_info_id)
            .or_default()
            .push(ProductParameterValue { parameter, value });
    }

    Ok(map)
}
