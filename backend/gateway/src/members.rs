//! In-memory member registry.
//!
//! Lives for the lifetime of the process; nothing is persisted.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use lineqr_core::MemberStore;

#[derive(Default)]
pub struct InMemoryMemberStore {
    members: RwLock<HashSet<String>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn add(&self, user_id: &str) -> bool {
        self.members.write().await.insert(user_id.to_string())
    }

    async fn remove(&self, user_id: &str) -> bool {
        self.members.write().await.remove(user_id)
    }

    async fn contains(&self, user_id: &str) -> bool {
        self.members.read().await.contains(user_id)
    }

    async fn count(&self) -> usize {
        self.members.read().await.len()
    }
}
