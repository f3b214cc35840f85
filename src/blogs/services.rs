use axum::extract::multipart::Field;
use axum::extract::Multipart;
use bson::{doc, Bson, Document};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::blogs::repo::Blog;
use crate::error::ApiError;
use crate::storage::UploadStore;

/// Text fields of the create/update form plus the public URL of a saved
/// upload, if one arrived.
#[derive(Debug, Default)]
pub struct BlogForm {
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub external_link: Option<String>,
    pub image: Option<String>,
}

impl BlogForm {
    /// Presence check only: an empty string fails, whitespace passes.
    pub fn missing_required(&self) -> bool {
        self.title.is_empty()
            || self.content.is_empty()
            || self.author.is_empty()
            || self.category.is_empty()
    }

    pub fn into_blog(self) -> Blog {
        Blog {
            id: ObjectId::new(),
            title: self.title,
            content: self.content,
            author: self.author,
            category: self.category,
            external_link: self.external_link,
            image: self.image,
            created_at: Utc::now(),
        }
    }
}

/// Consumes the multipart body into a `BlogForm`. An uploaded image is
/// written to disk while the body is being read, before any field
/// validation runs; a later 400 leaves that file behind.
pub async fn read_blog_form(
    mut mp: Multipart,
    uploads: &UploadStore,
) -> Result<BlogForm, ApiError> {
    let mut form = BlogForm::default();
    while let Some(field) = mp.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("title") => form.title = read_text(field).await?,
            Some("content") => form.content = read_text(field).await?,
            Some("author") => form.author = read_text(field).await?,
            Some("category") => form.category = read_text(field).await?,
            Some("externalLink") => {
                let value = read_text(field).await?;
                form.external_link = (!value.is_empty()).then_some(value);
            }
            Some("image") => {
                let original = field.file_name().unwrap_or("upload").to_string();
                let body = field.bytes().await.map_err(multipart_error)?;
                let filename = uploads.save(&original, body).await?;
                form.image = Some(UploadStore::public_url(&filename));
            }
            _ => {}
        }
    }
    Ok(form)
}

/// `$set` document for an update: the required fields and `externalLink`
/// are always overwritten (an empty submission clears the link), `image`
/// only when a new file was uploaded.
pub fn update_document(form: &BlogForm) -> Document {
    let mut set = doc! {
        "title": form.title.as_str(),
        "content": form.content.as_str(),
        "author": form.author.as_str(),
        "category": form.category.as_str(),
        "externalLink": form.external_link.clone().map_or(Bson::Null, Bson::String),
    };
    if let Some(image) = &form.image {
        set.insert("image", image.as_str());
    }
    set
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(multipart_error)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::Internal(anyhow::Error::new(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> BlogForm {
        BlogForm {
            title: "Category Theory".into(),
            content: "for programmers".into(),
            author: "alice".into(),
            category: "math".into(),
            external_link: None,
            image: None,
        }
    }

    #[test]
    fn complete_form_passes_validation() {
        assert!(!filled_form().missing_required());
    }

    #[test]
    fn each_required_field_is_checked() {
        let cases: [fn(&mut BlogForm); 4] = [
            |f| f.title.clear(),
            |f| f.content.clear(),
            |f| f.author.clear(),
            |f| f.category.clear(),
        ];
        for strip in cases {
            let mut form = filled_form();
            strip(&mut form);
            assert!(form.missing_required());
        }
    }

    #[test]
    fn whitespace_counts_as_present() {
        let mut form = filled_form();
        form.title = " ".into();
        assert!(!form.missing_required());
    }

    #[test]
    fn update_always_overwrites_external_link() {
        let mut form = filled_form();
        form.external_link = Some("https://example.com".into());
        let set = update_document(&form);
        assert_eq!(
            set.get("externalLink"),
            Some(&Bson::String("https://example.com".into()))
        );

        form.external_link = None;
        let set = update_document(&form);
        assert_eq!(set.get("externalLink"), Some(&Bson::Null));
    }

    #[test]
    fn update_touches_image_only_when_uploaded() {
        let mut form = filled_form();
        let set = update_document(&form);
        assert!(!set.contains_key("image"));

        form.image = Some("/uploads/1690000000000.png".into());
        let set = update_document(&form);
        assert_eq!(
            set.get("image"),
            Some(&Bson::String("/uploads/1690000000000.png".into()))
        );
    }

    #[test]
    fn into_blog_carries_every_field() {
        let mut form = filled_form();
        form.image = Some("/uploads/1.png".into());
        let blog = form.into_blog();
        assert_eq!(blog.title, "Category Theory");
        assert_eq!(blog.author, "alice");
        assert_eq!(blog.image.as_deref(), Some("/uploads/1.png"));
        assert_eq!(blog.external_link, None);
    }
}
