use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product_image::UpdateProductImage;
use crate::forms::{parse_truthy, sanitize_inline_text};

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Error)]
pub enum ImageFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("error reading uploaded file")]
    FileRead,
    #[error("uploaded file is empty")]
    EmptyFile,
    #[error("unsupported image type, expected one of: jpg, jpeg, png, gif, webp")]
    UnsupportedType,
    #[error("`is_main` must be a boolean")]
    InvalidFlag,
    #[error("`{0}` must be a relative media path")]
    InvalidPath(&'static str),
}

impl From<std::io::Error> for ImageFormError {
    fn from(_: std::io::Error) -> Self {
        ImageFormError::FileRead
    }
}

#[derive(MultipartForm)]
/// Multipart form for uploading a product image.
pub struct UploadImageForm {
    #[multipart(limit = "10MB")]
    pub image: TempFile,
    pub alt_text: Option<Text<String>>,
    pub display_order: Option<Text<i32>>,
    pub is_main: Option<Text<String>>,
}

/// Checked upload ready to be written to the media root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Lowercase file extension without the dot.
    pub extension: String,
    pub bytes: Vec<u8>,
    pub alt_text: String,
    pub display_order: i32,
    pub is_main: bool,
}

impl UploadImageForm {
    pub fn into_upload(mut self) -> Result<ImageUpload, ImageFormError> {
        let extension = self
            .image
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, extension)| extension.to_ascii_lowercase())
            .filter(|extension| ALLOWED_EXTENSIONS.contains(&extension.as_str()))
            .ok_or(ImageFormError::UnsupportedType)?;

        let is_main = match self.is_main.as_ref() {
            None => false,
            Some(value) => parse_truthy(value).ok_or(ImageFormError::InvalidFlag)?,
        };

        self.image.file.rewind()?;
        let mut bytes = Vec::with_capacity(self.image.size);
        self.image.file.read_to_end(&mut bytes)?;
        if bytes.is_empty() {
            return Err(ImageFormError::EmptyFile);
        }

        Ok(ImageUpload {
            extension,
            bytes,
            alt_text: self
                .alt_text
                .map(|text| sanitize_inline_text(&text.into_inner()))
                .unwrap_or_default(),
            display_order: self
                .display_order
                .map(Text::into_inner)
                .unwrap_or_default(),
            is_main,
        })
    }
}

/// `PUT /product-images/{id}/` body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateImageForm {
    #[validate(length(max = 255))]
    pub alt_text: Option<String>,
    pub display_order: Option<i32>,
    pub thumbnail: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub webp: Option<String>,
}

impl UpdateImageForm {
    pub fn into_update(self) -> Result<UpdateProductImage, ImageFormError> {
        self.validate()?;

        Ok(UpdateProductImage {
            alt_text: self.alt_text.map(|text| sanitize_inline_text(&text)),
            display_order: self.display_order,
            thumbnail: media_path(self.thumbnail, "thumbnail")?,
            medium: media_path(self.medium, "medium")?,
            large: media_path(self.large, "large")?,
            webp: media_path(self.webp, "webp")?,
        })
    }
}

fn media_path(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, ImageFormError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty()
        || value.starts_with('/')
        || value.split(['/', '\\']).any(|part| part == "..")
    {
        return Err(ImageFormError::InvalidPath(field));
    }
    Ok(Some(value.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::{SeekFrom, Write};

    use tempfile::NamedTempFile;

    use super::*;

    fn upload(name: &str, content: &[u8]) -> UploadImageForm {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content).expect("write image");
        file.as_file_mut()
            .seek(SeekFrom::Start(0))
            .expect("seek to start");

        UploadImageForm {
            image: TempFile {
                file,
                content_type: None,
                file_name: Some(name.to_string()),
                size: content.len(),
            },
            alt_text: Some(Text(" Front  view ".to_string())),
            display_order: None,
            is_main: Some(Text("yes".to_string())),
        }
    }

    #[test]
    fn upload_reads_the_file() {
        let upload = upload("photo.JPG", b"\xff\xd8\xff").into_upload().unwrap();
        assert_eq!(upload.extension, "jpg");
        assert_eq!(upload.bytes, b"\xff\xd8\xff");
        assert_eq!(upload.alt_text, "Front view");
        assert!(upload.is_main);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        assert!(matches!(
            upload("script.sh", b"#!/bin/sh").into_upload(),
            Err(ImageFormError::UnsupportedType)
        ));
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(
            upload("photo.png", b"").into_upload(),
            Err(ImageFormError::EmptyFile)
        ));
    }

    #[test]
    fn variant_paths_must_stay_inside_media_root() {
        let form = UpdateImageForm {
            thumbnail: Some("../../etc/passwd".to_string()),
            ..UpdateImageForm::default()
        };
        assert!(matches!(
            form.into_update(),
            Err(ImageFormError::InvalidPath("thumbnail"))
        ));

        let form = UpdateImageForm {
            thumbnail: Some("products/1/thumb.jpg".to_string()),
            display_order: Some(2),
            ..UpdateImageForm::default()
        };
        let update = form.into_update().unwrap();
        assert_eq!(update.thumbnail.as_deref(), Some("products/1/thumb.jpg"));
        assert_eq!(update.display_order, Some(2));
    }
}
