use crate::db::{DbConnection, DbPool};
use crate::domain::catalog::{CatalogImport, ImportSummary};
use crate::domain::category::Category;
use crate::domain::contact::{Contact, NewContact, UpdateContact};
use crate::domain::order::{
    CartItemInput, CartItemUpdate, Order, OrderDetails, OrderListQuery, OrderScope, OrderStatus,
};
use crate::domain::product::{ProductInfo, ProductListQuery};
use crate::domain::product_image::{NewProductImage, ProductImage, UpdateProductImage};
use crate::domain::shop::Shop;
use crate::domain::user::{ConfirmEmailToken, NewUser, User, UserCredentials};
use crate::repository::errors::RepositoryResult;

pub mod catalog;
pub mod category;
pub mod contact;
pub mod errors;
pub mod order;
pub mod product;
pub mod product_image;
pub mod shop;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over accounts and their tokens.
pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    fn get_credentials_by_email(&self, email: &str) -> RepositoryResult<Option<UserCredentials>>;
    /// Resolve the owner of an API token.
    fn get_user_by_token(&self, key: &str) -> RepositoryResult<Option<User>>;
    /// Pending email confirmation token of the user, if any.
    fn get_confirm_email_token(&self, user_id: i32)
    -> RepositoryResult<Option<ConfirmEmailToken>>;
}

/// Write operations over accounts and their tokens.
pub trait UserWriter {
    /// Insert the user and its email confirmation token atomically.
    fn create_user_with_token(
        &self,
        new_user: &NewUser,
        confirm_key: &str,
    ) -> RepositoryResult<(User, ConfirmEmailToken)>;
    /// Activate the account matching `(email, key)` and consume the token.
    fn confirm_email(&self, email: &str, key: &str) -> RepositoryResult<User>;
    /// Return the user's API token, storing `candidate_key` if none exists yet.
    fn get_or_create_auth_token(&self, user_id: i32, candidate_key: &str)
    -> RepositoryResult<String>;
}

pub trait ShopReader {
    /// Shops currently accepting orders.
    fn list_active_shops(&self) -> RepositoryResult<Vec<Shop>>;
    fn get_shop_by_owner(&self, user_id: i32) -> RepositoryResult<Option<Shop>>;
}

pub trait ShopWriter {
    /// Toggle whether the owner's shop accepts orders.
    fn set_shop_state(&self, user_id: i32, state: bool) -> RepositoryResult<Shop>;
}

pub trait CategoryReader {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}

/// Read-only operations over shop listings.
pub trait ProductReader {
    fn get_product_info(&self, id: i32) -> RepositoryResult<Option<ProductInfo>>;
    fn list_product_infos(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<ProductInfo>)>;
    /// Whether `user_id` owns a shop that lists the product.
    fn shop_lists_product(&self, user_id: i32, product_id: i32) -> RepositoryResult<bool>;
}

/// Full-replace synchronisation of a shop catalog.
pub trait CatalogWriter {
    fn import_catalog(&self, owner_id: i32, import: &CatalogImport)
    -> RepositoryResult<ImportSummary>;
}

/// Read-only operations over carts and placed orders.
pub trait OrderReader {
    /// The user's open cart, if one has been created.
    fn get_cart(&self, user_id: i32) -> RepositoryResult<Option<OrderDetails>>;
    /// Placed orders (never carts) matching the query, newest first.
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<OrderDetails>)>;
    /// A placed order owned by `user_id`.
    fn get_user_order(&self, user_id: i32, order_id: i32)
    -> RepositoryResult<Option<OrderDetails>>;
    fn get_order_details(&self, order_id: i32) -> RepositoryResult<Option<OrderDetails>>;
}

/// Mutations of the per-user cart. Each call runs in one immediate transaction.
pub trait CartWriter {
    /// Upsert items into the user's cart, creating the cart on first use.
    fn add_cart_items(&self, user_id: i32, items: &[CartItemInput]) -> RepositoryResult<usize>;
    /// Set quantities of existing cart lines; unknown ids are skipped.
    fn update_cart_items(&self, user_id: i32, items: &[CartItemUpdate])
    -> RepositoryResult<usize>;
    /// Delete cart lines by id; lines outside the user's cart are untouched.
    fn delete_cart_items(&self, user_id: i32, item_ids: &[i32]) -> RepositoryResult<usize>;
}

pub trait OrderWriter {
    /// Turn the user's cart `order_id` into a `new` order.
    fn checkout(
        &self,
        user_id: i32,
        order_id: i32,
        contact_id: Option<i32>,
    ) -> RepositoryResult<Order>;
    /// Apply a state machine transition to an order visible in `scope`.
    fn transition_order(
        &self,
        order_id: i32,
        scope: OrderScope,
        next: OrderStatus,
    ) -> RepositoryResult<Order>;
}

pub trait ContactReader {
    fn list_contacts(&self, user_id: i32) -> RepositoryResult<Vec<Contact>>;
    fn get_contact(&self, user_id: i32, contact_id: i32) -> RepositoryResult<Option<Contact>>;
}

pub trait ContactWriter {
    fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact>;
    fn update_contact(
        &self,
        user_id: i32,
        contact_id: i32,
        updates: &UpdateContact,
    ) -> RepositoryResult<Contact>;
    fn delete_contacts(&self, user_id: i32, contact_ids: &[i32]) -> RepositoryResult<usize>;
    /// Make the contact the only main one of its type for the user.
    fn promote_contact(&self, user_id: i32, contact_id: i32) -> RepositoryResult<Contact>;
}

pub trait ProductImageReader {
    /// Images ordered by display order, main first, then upload time.
    fn list_product_images(&self, product_id: i32) -> RepositoryResult<Vec<ProductImage>>;
    fn get_product_image(&self, image_id: i32) -> RepositoryResult<Option<ProductImage>>;
}

pub trait ProductImageWriter {
    fn create_product_image(&self, new_image: &NewProductImage) -> RepositoryResult<ProductImage>;
    fn update_product_image(
        &self,
        image_id: i32,
        updates: &UpdateProductImage,
    ) -> RepositoryResult<ProductImage>;
    fn delete_product_image(&self, image_id: i32) -> RepositoryResult<()>;
    /// Make the image the only main one of its product.
    fn promote_product_image(&self, product_id: i32, image_id: i32)
    -> RepositoryResult<ProductImage>;
}
