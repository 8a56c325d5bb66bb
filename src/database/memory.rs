use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::FoodStore;
use crate::error::AppError;
use crate::models::{Account, FoodRequest, RequestFilter, Role};

/// In-process store for tests.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<Account>>,
    donors: RwLock<Vec<Account>>,
    requests: RwLock<Vec<FoodRequest>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self, role: Role) -> &RwLock<Vec<Account>> {
        match role {
            Role::User => &self.users,
            Role::Donor => &self.donors,
        }
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

fn matches(filter: &RequestFilter, request: &FoodRequest) -> bool {
    filter
        .user_username
        .as_ref()
        .map_or(true, |user| *user == request.user_username)
        && filter
            .donor_username
            .as_ref()
            .map_or(true, |donor| *donor == request.donor_username)
        && filter
            .is_accepted
            .map_or(true, |accepted| accepted == request.is_accepted)
}

#[async_trait]
impl FoodStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn account_exists(&self, role: Role, username: &str) -> Result<bool, AppError> {
        let accounts = self.accounts(role).read().await;
        Ok(accounts.iter().any(|a| a.username == username))
    }

    async fn account_taken(
        &self,
        role: Role,
        username: &str,
        email: &str,
    ) -> Result<bool, AppError> {
        let accounts = self.accounts(role).read().await;
        Ok(accounts
            .iter()
            .any(|a| a.username == username || a.email == email))
    }

    async fn find_account_by_email(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<Account>, AppError> {
        let accounts = self.accounts(role).read().await;
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_account_by_username(
        &self,
        role: Role,
        username: &str,
    ) -> Result<Option<Account>, AppError> {
        let accounts = self.accounts(role).read().await;
        Ok(accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn insert_account(&self, role: Role, account: &Account) -> Result<(), AppError> {
        let mut accounts = self.accounts(role).write().await;
        if accounts
            .iter()
            .any(|a| a.username == account.username || a.email == account.email)
        {
            return Err(AppError::invalid(format!("{} already exists", role.label())));
        }
        let mut stored = account.clone();
        stored.id.get_or_insert_with(ObjectId::new);
        accounts.push(stored);
        Ok(())
    }

    async fn insert_request(&self, request: &FoodRequest) -> Result<(), AppError> {
        let mut stored = request.clone();
        stored.id.get_or_insert_with(ObjectId::new);
        self.requests.write().await.push(stored);
        Ok(())
    }

    async fn find_request(&self, id: ObjectId) -> Result<Option<FoodRequest>, AppError> {
        let requests = self.requests.read().await;
        Ok(requests.iter().find(|r| r.id == Some(id)).cloned())
    }

    async fn find_requests(&self, filter: &RequestFilter) -> Result<Vec<FoodRequest>, AppError> {
        let requests = self.requests.read().await;
        let mut found: Vec<FoodRequest> = requests
            .iter()
            .filter(|r| matches(filter, r))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.timestamp);
        Ok(found)
    }

    async fn set_request_accepted(
        &self,
        id: ObjectId,
        accepted: bool,
    ) -> Result<Option<FoodRequest>, AppError> {
        let mut requests = self.requests.write().await;
        Ok(requests.iter_mut().find(|r| r.id == Some(id)).map(|r| {
            r.is_accepted = accepted;
            r.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime as BsonDateTime;

    fn sample(user: &str, donor: &str, accepted: bool) -> FoodRequest {
        FoodRequest {
            id: Some(ObjectId::new()),
            donor_username: donor.into(),
            user_username: user.into(),
            location: String::new(),
            available_food: "rice".into(),
            is_accepted: accepted,
            timestamp: BsonDateTime::from_millis(0),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(matches(&RequestFilter::default(), &sample("u", "d", false)));
    }

    #[test]
    fn filter_constrains_each_set_field() {
        let filter = RequestFilter {
            user_username: Some("u".into()),
            donor_username: None,
            is_accepted: Some(true),
        };

        assert!(matches(&filter, &sample("u", "any", true)));
        assert!(!matches(&filter, &sample("u", "any", false)));
        assert!(!matches(&filter, &sample("other", "any", true)));
    }

    #[actix_rt::test]
    async fn update_of_unknown_id_inserts_nothing() {
        let store = MemoryStore::new();
        let updated = store.set_request_accepted(ObjectId::new(), true).await.unwrap();

        assert!(updated.is_none());
        assert_eq!(store.request_count().await, 0);
    }
}
