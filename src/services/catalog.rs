//! Public catalog reads.

use serde::Deserialize;

use crate::domain::category::Category;
use crate::domain::product::{ProductInfo, ProductListQuery};
use crate::domain::shop::Shop;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CategoryReader, ProductReader, ShopReader};
use crate::services::{ServiceResult, total_pages};

/// Query string accepted by `GET /products/`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub shop_id: Option<i32>,
    pub category_id: Option<i32>,
    pub page: Option<usize>,
}

/// Orderable listings, optionally filtered by shop and category.
pub fn list_products<R>(repo: &R, query: ProductsQuery) -> ServiceResult<Paginated<ProductInfo>>
where
    R: ProductReader + ?Sized,
{
    let page = query.page.unwrap_or(1).max(1);

    let mut list_query = ProductListQuery::available().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(shop_id) = query.shop_id {
        list_query = list_query.shop(shop_id);
    }
    if let Some(category_id) = query.category_id {
        list_query = list_query.category(category_id);
    }

    let (total, items) = repo.list_product_infos(list_query)?;

    Ok(Paginated::new(
        items,
        page,
        total_pages(total, DEFAULT_ITEMS_PER_PAGE),
    ))
}

pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader + ?Sized,
{
    Ok(repo.list_categories()?)
}

/// Shops currently accepting orders.
pub fn list_shops<R>(repo: &R) -> ServiceResult<Vec<Shop>>
where
    R: ShopReader + ?Sized,
{
    Ok(repo.list_active_shops()?)
}
