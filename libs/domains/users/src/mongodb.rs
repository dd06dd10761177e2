//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

pub const COLLECTION: &str = "users";

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<User>(collection_name),
        }
    }

    /// Unique email and reset-token lookup indexes
    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_email_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "reset_password_token": 1 })
                .options(
                    IndexOptions::builder()
                        .sparse(true)
                        .name("idx_reset_token".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

fn write_error(err: mongodb::error::Error, email: &str) -> UserError {
    if is_duplicate_key(&err) {
        UserError::DuplicateEmail(email.to_string())
    } else {
        err.into()
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: User) -> UserResult<User> {
        self.collection
            .insert_one(&user)
            .await
            .map_err(|e| write_error(e, &user.email))?;

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self, token_hash))]
    async fn get_by_reset_token(&self, token_hash: &str) -> UserResult<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "reset_password_token": token_hash })
            .await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> UserResult<Vec<User>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> UserResult<User> {
        let result = self
            .collection
            .replace_one(doc! { "_id": user.id.as_str() }, &user)
            .await
            .map_err(|e| write_error(e, &user.email))?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id));
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> UserResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
