#[cfg(test)]
pub mod memory;
pub mod store;

pub use store::FoodStore;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use crate::error::{is_duplicate_key, AppError};
use crate::models::{Account, FoodRequest, RequestFilter, Role};

const REQUESTS: &str = "requests";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    /// Connects, pings the server and makes sure the indexes exist.
    ///
    /// The database named in the URI wins over `default_db`.
    pub async fn new(uri: &str, default_db: &str) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| default_db.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        db.run_command(doc! { "ping": 1 }).await?;
        log::info!("Connected to MongoDB database: {}", db_name);

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("Creating database indexes...");

        for role in [Role::User, Role::Donor] {
            let accounts = self.accounts(role);
            for field in ["username", "email"] {
                let mut keys = Document::new();
                keys.insert(field, 1);

                let index = IndexModel::builder()
                    .keys(keys)
                    .options(IndexOptions::builder().unique(true).build())
                    .build();

                accounts.create_index(index).await?;
                log::debug!("Index ready: {}({}) unique", role.collection(), field);
            }
        }

        let requests = self.requests();

        // Covers the recipient listings, with or without the donor filter.
        let by_user = IndexModel::builder()
            .keys(doc! { "userUsername": 1, "donorUsername": 1, "timestamp": 1 })
            .build();
        requests.create_index(by_user).await?;

        let by_donor = IndexModel::builder()
            .keys(doc! { "donorUsername": 1, "timestamp": 1 })
            .build();
        requests.create_index(by_donor).await?;

        log::info!("Database indexes ready");

        Ok(())
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    fn accounts(&self, role: Role) -> Collection<Account> {
        self.collection(role.collection())
    }

    fn requests(&self) -> Collection<FoodRequest> {
        self.collection(REQUESTS)
    }
}

fn request_query(filter: &RequestFilter) -> Document {
    let mut query = Document::new();
    if let Some(user) = &filter.user_username {
        query.insert("userUsername", user.as_str());
    }
    if let Some(donor) = &filter.donor_username {
        query.insert("donorUsername", donor.as_str());
    }
    if let Some(accepted) = filter.is_accepted {
        query.insert("isAccepted", accepted);
    }
    query
}

#[async_trait]
impl FoodStore for MongoDB {
    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn account_exists(&self, role: Role, username: &str) -> Result<bool, AppError> {
        let count = self
            .accounts(role)
            .count_documents(doc! { "username": username })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn account_taken(
        &self,
        role: Role,
        username: &str,
        email: &str,
    ) -> Result<bool, AppError> {
        let count = self
            .accounts(role)
            .count_documents(doc! {
                "$or": [
                    { "username": username },
                    { "email": email }
                ]
            })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn find_account_by_email(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<Account>, AppError> {
        Ok(self.accounts(role).find_one(doc! { "email": email }).await?)
    }

    async fn find_account_by_username(
        &self,
        role: Role,
        username: &str,
    ) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts(role)
            .find_one(doc! { "username": username })
            .await?)
    }

    async fn insert_account(&self, role: Role, account: &Account) -> Result<(), AppError> {
        match self.accounts(role).insert_one(account).await {
            Ok(_) => Ok(()),
            // Lost a race with a concurrent signup for the same username/email.
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::invalid(format!("{} already exists", role.label())))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_request(&self, request: &FoodRequest) -> Result<(), AppError> {
        self.requests().insert_one(request).await?;
        Ok(())
    }

    async fn find_request(&self, id: ObjectId) -> Result<Option<FoodRequest>, AppError> {
        Ok(self.requests().find_one(doc! { "_id": id }).await?)
    }

    async fn find_requests(&self, filter: &RequestFilter) -> Result<Vec<FoodRequest>, AppError> {
        let cursor = self
            .requests()
            .find(request_query(filter))
            .sort(doc! { "timestamp": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn set_request_accepted(
        &self,
        id: ObjectId,
        accepted: bool,
    ) -> Result<Option<FoodRequest>, AppError> {
        Ok(self
            .requests()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": { "isAccepted": accepted } })
            .return_document(ReturnDocument::After)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_query_only_includes_set_fields() {
        let query = request_query(&RequestFilter {
            user_username: Some("ravi".into()),
            donor_username: None,
            is_accepted: Some(true),
        });

        assert_eq!(query, doc! { "userUsername": "ravi", "isAccepted": true });
    }

    #[test]
    fn empty_filter_matches_all() {
        assert!(request_query(&RequestFilter::default()).is_empty());
    }

    #[actix_rt::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let db = MongoDB::new(&uri, "food_donation_test").await;
        assert!(db.is_ok());
        assert!(db.unwrap().ping().await.is_ok());
    }
}
