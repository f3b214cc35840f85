use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blogs::repo::Blog;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub title: Option<String>,
}

/// One blog as it appears in responses: hex id, RFC 3339 timestamp,
/// optional fields omitted when absent.
#[derive(Debug, Serialize)]
pub struct BlogPayload {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    #[serde(rename = "externalLink", skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<Blog> for BlogPayload {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id.to_hex(),
            title: blog.title,
            content: blog.content,
            author: blog.author,
            category: blog.category,
            external_link: blog.external_link,
            image: blog.image,
            created_at: blog.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogListResponse {
    pub blogs: Vec<BlogPayload>,
}

/// Response for create and update.
#[derive(Debug, Serialize)]
pub struct BlogMutationResponse {
    pub message: String,
    pub blog: BlogPayload,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
