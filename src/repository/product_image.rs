use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::product_image::{
    NewProductImage as DomainNewProductImage, ProductImage as DomainProductImage,
    UpdateProductImage as DomainUpdateProductImage,
};
use crate::models::product_image::{
    NewProductImage as DbNewProductImage, ProductImage as DbProductImage,
    UpdateProductImage as DbUpdateProductImage,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProductImageReader, ProductImageWriter};

impl ProductImageReader for DieselRepository {
    fn list_product_images(&self, product_id: i32) -> RepositoryResult<Vec<DomainProductImage>> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        let items = product_images::table
            .filter(product_images::product_id.eq(product_id))
            .order((
                product_images::display_order.asc(),
                product_images::is_main.desc(),
                product_images::created_at.asc(),
                product_images::id.asc(),
            ))
            .load::<DbProductImage>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    fn get_product_image(&self, image_id: i32) -> RepositoryResult<Option<DomainProductImage>> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        let image = product_images::table
            .find(image_id)
            .first::<DbProductImage>(&mut conn)
            .optional()?;

        Ok(image.map(Into::into))
    }
}

impl ProductImageWriter for DieselRepository {
    fn create_product_image(
        &self,
        new_image: &DomainNewProductImage,
    ) -> RepositoryResult<DomainProductImage> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(product_images::table)
                .values(DbNewProductImage::from(new_image))
                .get_result::<DbProductImage>(conn)?;

            let has_main = product_images::table
                .filter(product_images::product_id.eq(new_image.product_id))
                .filter(product_images::is_main.eq(true))
                .count()
                .get_result::<i64>(conn)?
                > 0;

            // The first image of a product becomes its main image.
            if new_image.is_main || !has_main {
                return promote(conn, new_image.product_id, created.id);
            }

            Ok(created.into())
        })
    }

    fn update_product_image(
        &self,
        image_id: i32,
        updates: &DomainUpdateProductImage,
    ) -> RepositoryResult<DomainProductImage> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateProductImage::from(updates);

        if *updates == DomainUpdateProductImage::default() {
            return product_images::table
                .find(image_id)
                .first::<DbProductImage>(&mut conn)
                .map(Into::into)
                .map_err(Into::into);
        }

        let updated = diesel::update(product_images::table.find(image_id))
            .set(&db_updates)
            .get_result::<DbProductImage>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_product_image(&self, image_id: i32) -> RepositoryResult<()> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(product_images::table.find(image_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn promote_product_image(
        &self,
        product_id: i32,
        image_id: i32,
    ) -> RepositoryResult<DomainProductImage> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            promote(conn, product_id, image_id)
        })
    }
}

fn promote(
    conn: &mut SqliteConnection,
    product_id: i32,
    image_id: i32,
) -> RepositoryResult<DomainProductImage> {
    use crate::schema::product_images;

    let image = product_images::table
        .filter(product_images::id.eq(image_id))
        .filter(product_images::product_id.eq(product_id))
        .first::<DbProductImage>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

    diesel::update(
        product_images::table
            .filter(product_images::product_id.eq(product_id))
            .filter(product_images::is_main.eq(true)),
    )
    .set(product_images::is_main.eq(false))
    .execute(conn)?;

    let promoted = diesel::update(product_images::table.find(image.id))
        .set(product_images::is_main.eq(true))
        .get_result::<DbProductImage>(conn)?;

    Ok(promoted.into())
}
