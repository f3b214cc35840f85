use bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

/// User record in the `users` collection. The password field holds an argon2
/// PHC string, never the plaintext; the record itself is never serialized
/// into a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub password: String,
}

impl User {
    fn collection(db: &Database) -> Collection<User> {
        db.collection("users")
    }

    /// Unique index on `username`. A duplicate insert that slipped past the
    /// pre-insert existence check fails here.
    pub async fn ensure_indexes(db: &Database) -> anyhow::Result<()> {
        Self::collection(db)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
                None,
            )
            .await?;
        Ok(())
    }

    /// Find a user by exact username match.
    pub async fn find_by_username(db: &Database, username: &str) -> anyhow::Result<Option<User>> {
        let user = Self::collection(db)
            .find_one(doc! { "username": username }, None)
            .await?;
        Ok(user)
    }

    /// Create a new user with an already-hashed password.
    pub async fn create(db: &Database, username: &str, password_hash: &str) -> anyhow::Result<User> {
        let user = User {
            id: ObjectId::new(),
            username: username.to_string(),
            password: password_hash.to_string(),
        };
        Self::collection(db).insert_one(&user, None).await?;
        Ok(user)
    }
}
