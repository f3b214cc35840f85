use bson::{doc, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

/// Blog document in the `blogs` collection. `author` is a denormalized
/// username string with no reference into the users collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    #[serde(
        rename = "externalLink",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub external_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        rename = "createdAt",
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
}

/// Equality filter on the author, or match-all when no username was given.
pub fn author_filter(username: Option<&str>) -> Document {
    match username {
        Some(author) => doc! { "author": author },
        None => doc! {},
    }
}

/// Case-insensitive substring match on the title. The query string goes to
/// the regex engine as-is; metacharacters are not escaped.
pub fn title_filter(title: Option<&str>) -> Document {
    match title {
        Some(title) => doc! { "title": { "$regex": title, "$options": "i" } },
        None => doc! {},
    }
}

impl Blog {
    fn collection(db: &Database) -> Collection<Blog> {
        db.collection("blogs")
    }

    pub async fn insert(db: &Database, blog: &Blog) -> anyhow::Result<()> {
        Self::collection(db).insert_one(blog, None).await?;
        Ok(())
    }

    pub async fn find_by_id(db: &Database, id: ObjectId) -> anyhow::Result<Option<Blog>> {
        let blog = Self::collection(db)
            .find_one(doc! { "_id": id }, None)
            .await?;
        Ok(blog)
    }

    /// All blogs matching the filter, in the store's natural order.
    pub async fn find_all(db: &Database, filter: Document) -> anyhow::Result<Vec<Blog>> {
        let cursor = Self::collection(db).find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Applies a `$set` and returns the document as it looks afterwards,
    /// or None when the id matches nothing.
    pub async fn update_by_id(
        db: &Database,
        id: ObjectId,
        set: Document,
    ) -> anyhow::Result<Option<Blog>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let blog = Self::collection(db)
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await?;
        Ok(blog)
    }

    /// True when a document was actually removed.
    pub async fn delete_by_id(db: &Database, id: ObjectId) -> anyhow::Result<bool> {
        let result = Self::collection(db)
            .delete_one(doc! { "_id": id }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }
}
