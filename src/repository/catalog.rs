use std::collections::HashSet;

use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::catalog::{CatalogImport, ImportGood, ImportSummary};
use crate::models::category::{Category as DbCategory, ShopCategory};
use crate::models::product::{NewParameter, NewProduct, NewProductInfo, NewProductParameter};
use crate::models::shop::{NewShop, Shop as DbShop};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CatalogWriter, DieselRepository};

impl CatalogWriter for DieselRepository {
    fn import_catalog(
        &self,
        owner_id: i32,
        import: &CatalogImport,
    ) -> RepositoryResult<ImportSummary> {
        use crate::schema::{order_items, orders, product_infos};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let shop = upsert_owned_shop(conn, owner_id, &import.shop_name, &import.url)?;

            for category in &import.categories {
                upsert_category(conn, category.id, &category.name)?;
                link_category(conn, shop.id, category.id)?;
            }

            // Placed orders keep their copied lines; carts lose lines for replaced listings.
            let dropped = diesel::delete(
                order_items::table
                    .filter(order_items::shop_id.eq(shop.id))
                    .filter(
                        order_items::order_id.eq_any(
                            orders::table
                                .filter(orders::status.eq("cart"))
                                .select(orders::id),
                        ),
                    ),
            )
            .execute(conn)?;
            log::debug!("Dropped {dropped} cart lines of shop {} before import", shop.id);

            let removed =
                diesel::delete(product_infos::table.filter(product_infos::shop_id.eq(shop.id)))
                    .execute(conn)?;
            log::debug!("Removed {removed} listings of shop {} before import", shop.id);

            let mut products = HashSet::new();
            let mut parameters = 0usize;

            for (index, good) in import.goods.iter().enumerate() {
                ensure_category_exists(conn, index, good.category_id)?;
                link_category(conn, shop.id, good.category_id)?;

                let product_id = get_or_create_product(conn, &good.name, good.category_id)?;
                products.insert(product_id);

                let product_info_id = insert_listing(conn, shop.id, product_id, good)?;
                for parameter in &good.parameters {
                    let parameter_id = get_or_create_parameter(conn, &parameter.parameter)?;
                    diesel::insert_into(crate::schema::product_parameters::table)
                        .values(NewProductParameter {
                            product_info_id,
                            parameter_id,
                            value: &parameter.value,
                        })
                        .execute(conn)?;
                    parameters += 1;
                }
            }

            Ok(ImportSummary {
                shop_id: shop.id,
                categories: import.categories.len(),
                products: products.len(),
                listings: import.goods.len(),
                parameters,
            })
        })
    }
}

/// Each vendor owns at most one shop; a renamed feed renames that shop.
fn upsert_owned_shop(
    conn: &mut SqliteConnection,
    owner_id: i32,
    name: &str,
    url: &str,
) -> RepositoryResult<DbShop> {
    use crate::schema::shops;

    let now = Local::now().naive_utc();
    let existing = shops::table
        .filter(shops::user_id.eq(owner_id))
        .first::<DbShop>(conn)
        .optional()?;

    let shop = match existing {
        Some(shop) => diesel::update(shops::table.find(shop.id))
            .set((
                shops::name.eq(name),
                shops::url.eq(url),
                shops::updated_at.eq(now),
            ))
            .get_result::<DbShop>(conn)?,
        None => diesel::insert_into(shops::table)
            .values(NewShop {
                name,
                url: Some(url),
                user_id: Some(owner_id),
                updated_at: now,
            })
            .get_result::<DbShop>(conn)?,
    };

    Ok(shop)
}

fn upsert_category(conn: &mut SqliteConnection, id: i32, name: &str) -> RepositoryResult<()> {
    use crate::schema::categories;

    let existing = categories::table
        .find(id)
        .first::<DbCategory>(conn)
        .optional()?;

    match existing {
        Some(category) if category.name == name => Ok(()),
        Some(category) => Err(RepositoryError::Rejected(format!(
            "Category {id} is already registered as `{}`, feed names it `{name}`",
            category.name
        ))),
        None => {
            diesel::insert_into(categories::table)
                .values(DbCategory {
                    id,
                    name: name.to_string(),
                })
                .execute(conn)?;
            Ok(())
        }
    }
}

fn link_category(
    conn: &mut SqliteConnection,
    shop_id: i32,
    category_id: i32,
) -> RepositoryResult<()> {
    use crate::schema::shop_categories;

    diesel::insert_or_ignore_into(shop_categories::table)
        .values(ShopCategory {
            shop_id,
            category_id,
        })
        .execute(conn)?;

    Ok(())
}

fn ensure_category_exists(
    conn: &mut SqliteConnection,
    index: usize,
    category_id: i32,
) -> RepositoryResult<()> {
    use crate::schema::categories;

    let found = categories::table
        .find(category_id)
        .count()
        .get_result::<i64>(conn)?;

    if found == 0 {
        return Err(RepositoryError::Rejected(format!(
            "goods[{index}]: unknown category {category_id}"
        )));
    }

    Ok(())
}

fn get_or_create_product(
    conn: &mut SqliteConnection,
    name: &str,
    category_id: i32,
) -> RepositoryResult<i32> {
    use crate::schema::products;

    let existing = products::table
        .filter(products::name.eq(name))
        .filter(products::category_id.eq(category_id))
        .select(products::id)
        .first::<i32>(conn)
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id = diesel::insert_into(products::table)
        .values(NewProduct { name, category_id })
        .returning(products::id)
        .get_result::<i32>(conn)?;

    Ok(id)
}

fn insert_listing(
    conn: &mut SqliteConnection,
    shop_id: i32,
    product_id: i32,
    good: &ImportGood,
) -> RepositoryResult<i32> {
    use crate::schema::product_infos;

    let id = diesel::insert_into(product_infos::table)
        .values(NewProductInfo {
            product_id,
            shop_id,
            name: &good.name,
            model: good.model.as_deref(),
            external_id: good.external_id,
            quantity: good.quantity,
            price: good.price,
            price_rrc: good.price_rrc,
        })
        .returning(product_infos::id)
        .get_result::<i32>(conn)?;

    Ok(id)
}

fn get_or_create_parameter(conn: &mut SqliteConnection, name: &str) -> RepositoryResult<i32> {
    use crate::schema::parameters;

    let existing = parameters::table
        .filter(parameters::name.eq(name))
        .select(parameters::id)
        .first::<i32>(conn)
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id = diesel::insert_into(parameters::table)
        .values(NewParameter { name })
        .returning(parameters::id)
        .get_result::<i32>(conn)?;

    Ok(id)
}
