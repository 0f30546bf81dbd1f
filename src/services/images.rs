//! Product image management.
//!
//! Originals are written below `<media root>/products/<product id>/`; the
//! resized variants are produced elsewhere and reported back through
//! [`update_image`].

use std::fs;
use std::path::Path;

use crate::domain::product_image::{NewProductImage, ProductImage};
use crate::domain::user::{AuthenticatedUser, UserRole};
use crate::forms::images::{UpdateImageForm, UploadImageForm};
use crate::repository::{ProductImageReader, ProductImageWriter, ProductReader};
use crate::services::auth::generate_key;
use crate::services::{ServiceError, ServiceResult};

const FILE_NAME_LEN: usize = 16;

/// Admins manage every product; vendors only the products their shop lists.
fn check_product_access<R>(repo: &R, user: &AuthenticatedUser, product_id: i32) -> ServiceResult<()>
where
    R: ProductReader + ?Sized,
{
    if user.has_role(UserRole::Admin) {
        return Ok(());
    }
    if user.has_role(UserRole::Shop) && repo.shop_lists_product(user.id, product_id)? {
        return Ok(());
    }
    Err(ServiceError::Unauthorized)
}

fn load_image<R>(repo: &R, image_id: i32) -> ServiceResult<ProductImage>
where
    R: ProductImageReader + ?Sized,
{
    repo.get_product_image(image_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn list_images<R>(repo: &R, product_id: i32) -> ServiceResult<Vec<ProductImage>>
where
    R: ProductImageReader + ?Sized,
{
    Ok(repo.list_product_images(product_id)?)
}

pub fn get_image<R>(repo: &R, image_id: i32) -> ServiceResult<ProductImage>
where
    R: ProductImageReader + ?Sized,
{
    load_image(repo, image_id)
}

/// Store the uploaded original and register it for the product.
pub fn upload_image<R>(
    repo: &R,
    user: &AuthenticatedUser,
    media_root: &Path,
    product_id: i32,
    form: UploadImageForm,
) -> ServiceResult<ProductImage>
where
    R: ProductReader + ProductImageWriter + ?Sized,
{
    check_product_access(repo, user, product_id)?;

    let upload = form.into_upload()?;

    let relative = format!(
        "products/{product_id}/{}.{}",
        generate_key(FILE_NAME_LEN),
        upload.extension
    );
    let path = media_root.join(&relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| ServiceError::Internal(format!("cannot create {parent:?}: {err}")))?;
    }
    fs::write(&path, &upload.bytes)
        .map_err(|err| ServiceError::Internal(format!("cannot write {path:?}: {err}")))?;

    let mut new_image = NewProductImage::new(product_id, relative)
        .with_alt_text(upload.alt_text)
        .with_display_order(upload.display_order);
    if upload.is_main {
        new_image = new_image.main();
    }

    match repo.create_product_image(&new_image) {
        Ok(image) => Ok(image),
        Err(err) => {
            if let Err(remove_err) = fs::remove_file(&path) {
                log::warn!("Failed to remove orphaned upload {path:?}: {remove_err}");
            }
            Err(err.into())
        }
    }
}

/// Change the alt text or order, or record the paths of generated variants.
pub fn update_image<R>(
    repo: &R,
    user: &AuthenticatedUser,
    image_id: i32,
    form: UpdateImageForm,
) -> ServiceResult<ProductImage>
where
    R: ProductReader + ProductImageReader + ProductImageWriter + ?Sized,
{
    let image = load_image(repo, image_id)?;
    check_product_access(repo, user, image.product_id)?;

    let update = form.into_update()?;

    Ok(repo.update_product_image(image_id, &update)?)
}

pub fn delete_image<R>(
    repo: &R,
    user: &AuthenticatedUser,
    media_root: &Path,
    image_id: i32,
) -> ServiceResult<()>
where
    R: ProductReader + ProductImageReader + ProductImageWriter + ?Sized,
{
    let image = load_image(repo, image_id)?;
    check_product_access(repo, user, image.product_id)?;

    repo.delete_product_image(image_id)?;

    let files = [
        Some(&image.image),
        image.thumbnail.as_ref(),
        image.medium.as_ref(),
        image.large.as_ref(),
        image.webp.as_ref(),
    ];
    for file in files.into_iter().flatten() {
        let path = media_root.join(file);
        if let Err(err) = fs::remove_file(&path) {
            log::warn!("Failed to remove {path:?}: {err}");
        }
    }

    Ok(())
}

/// Make the image the product's only main image.
pub fn set_main_image<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    image_id: i32,
) -> ServiceResult<ProductImage>
where
    R: ProductReader + ProductImageWriter + ?Sized,
{
    check_product_access(repo, user, product_id)?;
    Ok(repo.promote_product_image(product_id, image_id)?)
}
