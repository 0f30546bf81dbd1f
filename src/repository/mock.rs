use mockall::mock;

use super::{
    CartWriter, CatalogWriter, CategoryReader, ContactReader, ContactWriter, OrderReader,
    OrderWriter, ProductImageReader, ProductImageWriter, ProductReader, ShopReader, ShopWriter,
    UserReader, UserWriter,
};
use crate::domain::{
    catalog::{CatalogImport, ImportSummary},
    category::Category,
    contact::{Contact, NewContact, UpdateContact},
    order::{
        CartItemInput, CartItemUpdate, Order, OrderDetails, OrderListQuery, OrderScope,
        OrderStatus,
    },
    product::{ProductInfo, ProductListQuery},
    product_image::{NewProductImage, ProductImage, UpdateProductImage},
    shop::Shop,
    user::{ConfirmEmailToken, NewUser, User, UserCredentials},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn get_credentials_by_email(&self, email: &str) -> RepositoryResult<Option<UserCredentials>>;
        fn get_user_by_token(&self, key: &str) -> RepositoryResult<Option<User>>;
        fn get_confirm_email_token(&self, user_id: i32) -> RepositoryResult<Option<ConfirmEmailToken>>;
    }

    impl UserWriter for Repository {
        fn create_user_with_token(&self, new_user: &NewUser, confirm_key: &str) -> RepositoryResult<(User, ConfirmEmailToken)>;
        fn confirm_email(&self, email: &str, key: &str) -> RepositoryResult<User>;
        fn get_or_create_auth_token(&self, user_id: i32, candidate_key: &str) -> RepositoryResult<String>;
    }

    impl ShopReader for Repository {
        fn list_active_shops(&self) -> RepositoryResult<Vec<Shop>>;
        fn get_shop_by_owner(&self, user_id: i32) -> RepositoryResult<Option<Shop>>;
    }

    impl ShopWriter for Repository {
        fn set_shop_state(&self, user_id: i32, state: bool) -> RepositoryResult<Shop>;
    }

    impl CategoryReader for Repository {
        fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    }

    impl ProductReader for Repository {
        fn get_product_info(&self, id: i32) -> RepositoryResult<Option<ProductInfo>>;
        fn list_product_infos(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<ProductInfo>)>;
        fn shop_lists_product(&self, user_id: i32, product_id: i32) -> RepositoryResult<bool>;
    }

    impl CatalogWriter for Repository {
        fn import_catalog(&self, owner_id: i32, import: &CatalogImport) -> RepositoryResult<ImportSummary>;
    }

    impl OrderReader for Repository {
        fn get_cart(&self, user_id: i32) -> RepositoryResult<Option<OrderDetails>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<OrderDetails>)>;
        fn get_user_order(&self, user_id: i32, order_id: i32) -> RepositoryResult<Option<OrderDetails>>;
        fn get_order_details(&self, order_id: i32) -> RepositoryResult<Option<OrderDetails>>;
    }

    impl CartWriter for Repository {
        fn add_cart_items(&self, user_id: i32, items: &[CartItemInput]) -> RepositoryResult<usize>;
        fn update_cart_items(&self, user_id: i32, items: &[CartItemUpdate]) -> RepositoryResult<usize>;
        fn delete_cart_items(&self, user_id: i32, item_ids: &[i32]) -> RepositoryResult<usize>;
    }

    impl OrderWriter for Repository {
        fn checkout(&self, user_id: i32, order_id: i32, contact_id: Option<i32>) -> RepositoryResult<Order>;
        fn transition_order(&self, order_id: i32, scope: OrderScope, next: OrderStatus) -> RepositoryResult<Order>;
    }

    impl ContactReader for Repository {
        fn list_contacts(&self, user_id: i32) -> RepositoryResult<Vec<Contact>>;
        fn get_contact(&self, user_id: i32, contact_id: i32) -> RepositoryResult<Option<Contact>>;
    }

    impl ContactWriter for Repository {
        fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact>;
        fn update_contact(&self, user_id: i32, contact_id: i32, updates: &UpdateContact) -> RepositoryResult<Contact>;
        fn delete_contacts(&self, user_id: i32, contact_ids: &[i32]) -> RepositoryResult<usize>;
        fn promote_contact(&self, user_id: i32, contact_id: i32) -> RepositoryResult<Contact>;
    }

    impl ProductImageReader for Repository {
        fn list_product_images(&self, product_id: i32) -> RepositoryResult<Vec<ProductImage>>;
        fn get_product_image(&self, image_id: i32) -> RepositoryResult<Option<ProductImage>>;
    }

    impl ProductImageWriter for Repository {
        fn create_product_image(&self, new_image: &NewProductImage) -> RepositoryResult<ProductImage>;
        fn update_product_image(&self, image_id: i32, updates: &UpdateProductImage) -> RepositoryResult<ProductImage>;
        fn delete_product_image(&self, image_id: i32) -> RepositoryResult<()>;
        fn promote_product_image(&self, product_id: i32, image_id: i32) -> RepositoryResult<ProductImage>;
    }
}
