use std::collections::HashMap;

use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::contact::Contact as DomainContact;
use crate::domain::order::{
    CartItemInput, CartItemUpdate, Order as DomainOrder, OrderDetails, OrderLine, OrderListQuery,
    OrderScope, OrderStatus,
};
use crate::models::contact::Contact as DbContact;
use crate::models::order::{NewOrder, NewOrderItem, Order as DbOrder};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CartWriter, DieselRepository, OrderReader, OrderWriter};

const CART: &str = "cart";

impl OrderReader for DieselRepository {
    fn get_cart(&self, user_id: i32) -> RepositoryResult<Option<OrderDetails>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let cart = orders::table
            .filter(orders::user_id.eq(user_id))
            .filter(orders::status.eq(CART))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        match cart {
            Some(cart) => Ok(load_details(&mut conn, vec![cart])?.pop()),
            None => Ok(None),
        }
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<OrderDetails>)> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        let mut count_query = orders::table
            .filter(orders::status.ne(CART))
            .into_boxed::<Sqlite>();

        if let Some(user_id) = query.user_id {
            count_query = count_query.filter(orders::user_id.eq(user_id));
        }
        if let Some(shop_id) = query.shop_id {
            count_query = count_query.filter(
                orders::id.eq_any(
                    order_items::table
                        .filter(order_items::shop_id.eq(shop_id))
                        .select(order_items::order_id),
                ),
            );
        }
        if let Some(status) = query.status {
            count_query = count_query.filter(orders::status.eq(status.as_str()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = orders::table
            .filter(orders::status.ne(CART))
            .into_boxed::<Sqlite>();

        if let Some(user_id) = query.user_id {
            items = items.filter(orders::user_id.eq(user_id));
        }
        if let Some(shop_id) = query.shop_id {
            items = items.filter(
                orders::id.eq_any(
                    order_items::table
                        .filter(order_items::shop_id.eq(shop_id))
                        .select(order_items::order_id),
                ),
            );
        }
        if let Some(status) = query.status {
            items = items.filter(orders::status.eq(status.as_str()));
        }

        items = items.order((orders::created_at.desc(), orders::id.desc()));

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let db_orders = items.load::<DbOrder>(&mut conn)?;
        let details = load_details(&mut conn, db_orders)?;

        Ok((total, details))
    }

    fn get_user_order(
        &self,
        user_id: i32,
        order_id: i32,
    ) -> RepositoryResult<Option<OrderDetails>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::id.eq(order_id))
            .filter(orders::user_id.eq(user_id))
            .filter(orders::status.ne(CART))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        match order {
            Some(order) => Ok(load_details(&mut conn, vec![order])?.pop()),
            None => Ok(None),
        }
    }

    fn get_order_details(&self, order_id: i32) -> RepositoryResult<Option<OrderDetails>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let order = orders::table
            .find(order_id)
            .first::<DbOrder>(&mut conn)
            .optional()?;

        match order {
            Some(order) => Ok(load_details(&mut conn, vec![order])?.pop()),
            None => Ok(None),
        }
    }
}

impl CartWriter for DieselRepository {
    fn add_cart_items(&self, user_id: i32, items: &[CartItemInput]) -> RepositoryResult<usize> {
        use crate::schema::{order_items, product_infos, shops};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let cart_id = get_or_create_cart(conn, user_id)?;

            for (index, item) in items.iter().enumerate() {
                let listing = product_infos::table
                    .inner_join(shops::table)
                    .filter(product_infos::id.eq(item.product_info_id))
                    .select((
                        product_infos::shop_id,
                        product_infos::name,
                        product_infos::price,
                        product_infos::quantity,
                        shops::state,
                    ))
                    .first::<(i32, String, i32, i32, bool)>(conn)
                    .optional()?;

                let Some((shop_id, name, price, in_stock, shop_active)) = listing else {
                    return Err(RepositoryError::Rejected(format!(
                        "items[{index}]: product {} does not exist",
                        item.product_info_id
                    )));
                };
                if !shop_active {
                    return Err(RepositoryError::Rejected(format!(
                        "items[{index}]: shop is not accepting orders"
                    )));
                }
                check_stock(index, item.quantity, in_stock)?;

                diesel::insert_into(order_items::table)
                    .values(NewOrderItem {
                        order_id: cart_id,
                        product_info_id: item.product_info_id,
                        shop_id,
                        product_name: &name,
                        price,
                        quantity: item.quantity,
                    })
                    .on_conflict((order_items::order_id, order_items::product_info_id))
                    .do_update()
                    .set((
                        order_items::quantity.eq(item.quantity),
                        order_items::product_name.eq(&name),
                        order_items::price.eq(price),
                    ))
                    .execute(conn)?;
            }

            touch_order(conn, cart_id)?;
            Ok(items.len())
        })
    }

    fn update_cart_items(
        &self,
        user_id: i32,
        items: &[CartItemUpdate],
    ) -> RepositoryResult<usize> {
        use crate::schema::{order_items, product_infos};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let Some(cart_id) = find_cart(conn, user_id)? else {
                return Ok(0);
            };

            let mut updated = 0usize;
            for (index, item) in items.iter().enumerate() {
                let in_stock = order_items::table
                    .inner_join(product_infos::table)
                    .filter(order_items::id.eq(item.order_item_id))
                    .filter(order_items::order_id.eq(cart_id))
                    .select(product_infos::quantity)
                    .first::<i32>(conn)
                    .optional()?;

                let Some(in_stock) = in_stock else {
                    continue;
                };
                check_stock(index, item.quantity, in_stock)?;

                updated += diesel::update(order_items::table.find(item.order_item_id))
                    .set(order_items::quantity.eq(item.quantity))
                    .execute(conn)?;
            }

            if updated > 0 {
                touch_order(conn, cart_id)?;
            }
            Ok(updated)
        })
    }

    fn delete_cart_items(&self, user_id: i32, item_ids: &[i32]) -> RepositoryResult<usize> {
        use crate::schema::order_items;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let Some(cart_id) = find_cart(conn, user_id)? else {
                return Ok(0);
            };

            let deleted = diesel::delete(
                order_items::table
                    .filter(order_items::order_id.eq(cart_id))
                    .filter(order_items::id.eq_any(item_ids)),
            )
            .execute(conn)?;

            if deleted > 0 {
                touch_order(conn, cart_id)?;
            }
            Ok(deleted)
        })
    }
}

impl OrderWriter for DieselRepository {
    fn checkout(
        &self,
        user_id: i32,
        order_id: i32,
        contact_id: Option<i32>,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::{contacts, order_items, orders};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let cart = orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::user_id.eq(user_id))
                .filter(orders::status.eq(CART))
                .first::<DbOrder>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let lines = order_items::table
                .filter(order_items::order_id.eq(cart.id))
                .count()
                .get_result::<i64>(conn)?;
            if lines == 0 {
                return Err(RepositoryError::Rejected("Cart is empty".to_string()));
            }

            if let Some(contact_id) = contact_id {
                let owned = contacts::table
                    .filter(contacts::id.eq(contact_id))
                    .filter(contacts::user_id.eq(user_id))
                    .count()
                    .get_result::<i64>(conn)?;
                if owned == 0 {
                    return Err(RepositoryError::Rejected(format!(
                        "Contact {contact_id} not found"
                    )));
                }
            }

            let current = OrderStatus::from(cart.status.as_str());
            if !current.can_transition_to(OrderStatus::New) {
                return Err(RepositoryError::Rejected(format!(
                    "Cannot change order status from {} to {}",
                    current.as_str(),
                    OrderStatus::New.as_str()
                )));
            }

            let placed = diesel::update(orders::table.find(cart.id))
                .set((
                    orders::status.eq(OrderStatus::New.as_str()),
                    orders::contact_id.eq(contact_id),
                    orders::updated_at.eq(Local::now().naive_utc()),
                ))
                .get_result::<DbOrder>(conn)?;

            Ok(placed.into())
        })
    }

    fn transition_order(
        &self,
        order_id: i32,
        scope: OrderScope,
        next: OrderStatus,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let mut lookup = orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::status.ne(CART))
                .into_boxed::<Sqlite>();

            match scope {
                OrderScope::Customer(user_id) => {
                    lookup = lookup.filter(orders::user_id.eq(user_id));
                }
                OrderScope::Shop(shop_id) => {
                    lookup = lookup.filter(
                        orders::id.eq_any(
                            order_items::table
                                .filter(order_items::shop_id.eq(shop_id))
                                .select(order_items::order_id),
                        ),
                    );
                }
                OrderScope::Staff => {}
            }

            let order = lookup
                .first::<DbOrder>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let current = OrderStatus::from(order.status.as_str());
            if !current.can_transition_to(next) {
                return Err(RepositoryError::Rejected(format!(
                    "Cannot change order status from {} to {}",
                    current.as_str(),
                    next.as_str()
                )));
            }

            let updated = diesel::update(orders::table.find(order.id))
                .set((
                    orders::status.eq(next.as_str()),
                    orders::updated_at.eq(Local::now().naive_utc()),
                ))
                .get_result::<DbOrder>(conn)?;

            Ok(updated.into())
        })
    }
}

fn find_cart(conn: &mut SqliteConnection, user_id: i32) -> RepositoryResult<Option<i32>> {
    use crate::schema::orders;

    let id = orders::table
        .filter(orders::user_id.eq(user_id))
        .filter(orders::status.eq(CART))
        .select(orders::id)
        .first::<i32>(conn)
        .optional()?;

    Ok(id)
}

fn get_or_create_cart(conn: &mut SqliteConnection, user_id: i32) -> RepositoryResult<i32> {
    use crate::schema::orders;

    if let Some(id) = find_cart(conn, user_id)? {
        return Ok(id);
    }

    let id = diesel::insert_into(orders::table)
        .values(NewOrder {
            user_id,
            status: CART,
            updated_at: Local::now().naive_utc(),
        })
        .returning(orders::id)
        .get_result::<i32>(conn)?;

    Ok(id)
}

fn touch_order(conn: &mut SqliteConnection, order_id: i32) -> RepositoryResult<()> {
    use crate::schema::orders;

    diesel::update(orders::table.find(order_id))
        .set(orders::updated_at.eq(Local::now().naive_utc()))
        .execute(conn)?;

    Ok(())
}

fn check_stock(index: usize, requested: i32, in_stock: i32) -> RepositoryResult<()> {
    if requested < 1 {
        return Err(RepositoryError::Rejected(format!(
            "items[{index}]: quantity must be at least 1"
        )));
    }
    if requested > in_stock {
        return Err(RepositoryError::Rejected(format!(
            "items[{index}]: only {in_stock} in stock"
        )));
    }
    Ok(())
}

type LineRow = (i32, i32, Option<i32>, String, i32, String, i32, i32);

fn load_details(
    conn: &mut SqliteConnection,
    db_orders: Vec<DbOrder>,
) -> RepositoryResult<Vec<OrderDetails>> {
    use crate::schema::{contacts, order_items, shops};

    if db_orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();
    let rows = order_items::table
        .inner_join(shops::table)
        .filter(order_items::order_id.eq_any(&order_ids))
        .order(order_items::id.asc())
        .select((
            order_items::id,
            order_items::order_id,
            order_items::product_info_id,
            order_items::product_name,
            order_items::shop_id,
            shops::name,
            order_items::price,
            order_items::quantity,
        ))
        .load::<LineRow>(conn)?;

    let mut lines: HashMap<i32, Vec<OrderLine>> = HashMap::new();
    for (id, order_id, product_info_id, product_name, shop_id, shop_name, price, quantity) in rows {
        lines.entry(order_id).or_default().push(OrderLine {
            id,
            product_info_id,
            product_name,
            shop_id,
            shop_name,
            price,
            quantity,
        });
    }

    let contact_ids: Vec<i32> = db_orders
        .iter()
        .filter_map(|order| order.contact_id)
        .collect();
    let mut contact_map: HashMap<i32, DomainContact> = HashMap::new();
    if !contact_ids.is_empty() {
        for contact in contacts::table
            .filter(contacts::id.eq_any(&contact_ids))
            .load::<DbContact>(conn)?
        {
            contact_map.insert(contact.id, contact.into());
        }
    }

    Ok(db_orders
        .into_iter()
        .map(|order| {
            let items = lines.remove(&order.id).unwrap_or_default();
            let contact = order
                .contact_id
                .and_then(|id| contact_map.get(&id).cloned());
            OrderDetails {
                order: order.into(),
                items,
                contact,
            }
        })
        .collect())
}
