//! Authorization guard evaluated before every mutating operation.
//!
//! One predicate, three shapes: the caller must hold the required role, a
//! parent must own the targeted child, and a child must be the entity's
//! assignee. A failed check aborts the call before any further state is read,
//! so no partial authorization ever leaks into a mutation.

use log::warn;
use std::sync::Arc;

use crate::domain::errors::{LedgerError, LedgerResult};
use crate::domain::models::{Child, Parent};
use crate::storage::IdentityStorage;

#[derive(Clone)]
pub struct AuthorizationGuard {
    identity: Arc<dyn IdentityStorage>,
}

impl AuthorizationGuard {
    pub fn new(identity: Arc<dyn IdentityStorage>) -> Self {
        Self { identity }
    }

    /// Caller must be a registered parent.
    pub async fn require_parent(&self, caller: &str) -> LedgerResult<Parent> {
        match self.identity.get_parent(caller).await? {
            Some(parent) => Ok(parent),
            None => {
                warn!("rejecting call: {caller} is not a registered parent");
                Err(LedgerError::Unauthorized)
            }
        }
    }

    /// Caller must be a registered child.
    pub async fn require_child(&self, caller: &str) -> LedgerResult<Child> {
        match self.identity.get_child(caller).await? {
            Some(child) => Ok(child),
            None => {
                warn!("rejecting call: {caller} is not a registered child");
                Err(LedgerError::Unauthorized)
            }
        }
    }

    /// Creation-side check: caller must be a parent and `child_address` a
    /// member of the caller's family group.
    pub async fn require_member(
        &self,
        caller: &str,
        child_address: &str,
    ) -> LedgerResult<(Parent, Child)> {
        let parent = self.require_parent(caller).await?;
        if !parent.is_member(child_address) {
            warn!("rejecting call: {child_address} is not in {caller}'s family group");
            return Err(LedgerError::NotFamilyMember(child_address.to_string()));
        }
        let child = self
            .identity
            .get_child(child_address)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("child {child_address}")))?;
        Ok((parent, child))
    }

    /// Mutation-side check: caller must be the parent owning the child the
    /// entity is assigned to.
    pub async fn require_owner(&self, caller: &str, assigned_to: &str) -> LedgerResult<Parent> {
        let parent = self.require_parent(caller).await?;
        if !parent.is_member(assigned_to) {
            warn!("rejecting call: {caller} does not own entity assigned to {assigned_to}");
            return Err(LedgerError::Unauthorized);
        }
        Ok(parent)
    }

    /// Mutation-side check: caller must be the child the entity is assigned
    /// to.
    pub async fn require_assignee(&self, caller: &str, assigned_to: &str) -> LedgerResult<Child> {
        let child = self.require_child(caller).await?;
        if child.address != assigned_to {
            warn!("rejecting call: {caller} is not the assignee {assigned_to}");
            return Err(LedgerError::Unauthorized);
        }
        Ok(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Child, Parent};
    use crate::storage::MemoryStore;

    async fn setup() -> (Arc<MemoryStore>, AuthorizationGuard) {
        let store = Arc::new(MemoryStore::new());
        let mut alice = Parent::new("0xalice", "Alice");
        alice.children.push("0xbob".to_string());
        store.store_parent(&alice).await.unwrap();
        store
            .store_child(&Child::new("0xbob", "Bob", "0xalice"))
            .await
            .unwrap();
        let guard = AuthorizationGuard::new(store.clone());
        (store, guard)
    }

    #[tokio::test]
    async fn parent_checks() {
        let (_store, guard) = setup().await;
        assert!(guard.require_parent("0xalice").await.is_ok());
        assert!(matches!(
            guard.require_parent("0xbob").await,
            Err(LedgerError::Unauthorized)
        ));
        assert!(matches!(
            guard.require_parent("0xnobody").await,
            Err(LedgerError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn membership_distinguishes_creation_from_mutation() {
        let (store, guard) = setup().await;
        store
            .store_parent(&Parent::new("0xdavid", "David"))
            .await
            .unwrap();

        // Creation against a foreign child reports the membership failure.
        assert!(matches!(
            guard.require_member("0xdavid", "0xbob").await,
            Err(LedgerError::NotFamilyMember(_))
        ));
        // Mutation of a foreign entity is plain Unauthorized.
        assert!(matches!(
            guard.require_owner("0xdavid", "0xbob").await,
            Err(LedgerError::Unauthorized)
        ));
        assert!(guard.require_member("0xalice", "0xbob").await.is_ok());
    }

    #[tokio::test]
    async fn assignee_check_rejects_siblings() {
        let (store, guard) = setup().await;
        store
            .store_child(&Child::new("0xgrace", "Grace", "0xalice"))
            .await
            .unwrap();

        assert!(guard.require_assignee("0xbob", "0xbob").await.is_ok());
        assert!(matches!(
            guard.require_assignee("0xgrace", "0xbob").await,
            Err(LedgerError::Unauthorized)
        ));
    }
}
