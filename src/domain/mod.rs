pub mod catalog;
pub mod category;
pub mod contact;
pub mod order;
pub mod product;
pub mod product_image;
pub mod shop;
pub mod user;
