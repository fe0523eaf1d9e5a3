//! Identity registry: parent registration and child enrolment.
//!
//! Every address holds exactly one role. A role is assigned once — by
//! `register_parent` or `add_child` — and never reverts to unregistered, so
//! the same address can never be a parent of one family and a child of
//! another.

use log::info;
use std::sync::Arc;

use shared::{Profile, Role};

use crate::domain::authorization::AuthorizationGuard;
use crate::domain::errors::{LedgerError, LedgerResult};
use crate::domain::models::{Child, Parent};
use crate::storage::IdentityStorage;

const MAX_NAME_LEN: usize = 100;

#[derive(Clone)]
pub struct IdentityService {
    identity: Arc<dyn IdentityStorage>,
    guard: Arc<AuthorizationGuard>,
}

impl IdentityService {
    pub fn new(identity: Arc<dyn IdentityStorage>, guard: Arc<AuthorizationGuard>) -> Self {
        Self { identity, guard }
    }

    /// Register the calling address as a parent with an empty family group.
    pub async fn register_parent(&self, caller: &str, name: &str) -> LedgerResult<Profile> {
        validate_name(name)?;
        if self.identity.role_of(caller).await? != Role::Unregistered {
            return Err(LedgerError::AlreadyRegistered);
        }

        let parent = Parent::new(caller, name.trim());
        self.identity.store_parent(&parent).await?;

        info!("registered parent {caller} ({})", parent.name);
        Ok(Profile {
            account_type: Role::Parent,
            name: parent.name,
        })
    }

    /// Enrol `child_address` into the caller's family group with a zero
    /// balance. The address must not hold any role yet, in any family.
    pub async fn add_child(
        &self,
        caller: &str,
        child_address: &str,
        name: &str,
    ) -> LedgerResult<()> {
        validate_name(name)?;
        if child_address.trim().is_empty() {
            return Err(LedgerError::InvalidInput(
                "child address cannot be empty".to_string(),
            ));
        }

        let mut parent = self.guard.require_parent(caller).await?;
        if self.identity.role_of(child_address).await? != Role::Unregistered {
            return Err(LedgerError::AlreadyRegistered);
        }

        let child = Child::new(child_address, name.trim(), caller);
        self.identity.store_child(&child).await?;
        parent.children.push(child_address.to_string());
        self.identity.update_parent(&parent).await?;

        info!("added child {child_address} ({}) to {caller}'s family group", child.name);
        Ok(())
    }

    /// Role of an address. Pure query, never fails for unknown addresses.
    pub async fn role_of(&self, address: &str) -> LedgerResult<Role> {
        Ok(self.identity.role_of(address).await?)
    }

    /// Profile of the calling account; unregistered callers get an empty
    /// name rather than an error so a fresh wallet can always load.
    pub async fn get_profile(&self, caller: &str) -> LedgerResult<Profile> {
        let profile = match self.identity.role_of(caller).await? {
            Role::Parent => {
                let parent = self
                    .identity
                    .get_parent(caller)
                    .await?
                    .ok_or_else(|| LedgerError::NotFound(format!("parent {caller}")))?;
                Profile {
                    account_type: Role::Parent,
                    name: parent.name,
                }
            }
            Role::Child => {
                let child = self
                    .identity
                    .get_child(caller)
                    .await?
                    .ok_or_else(|| LedgerError::NotFound(format!("child {caller}")))?;
                Profile {
                    account_type: Role::Child,
                    name: child.name,
                }
            }
            Role::Unregistered => Profile {
                account_type: Role::Unregistered,
                name: String::new(),
            },
        };
        Ok(profile)
    }
}

fn validate_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::InvalidInput("name cannot be empty".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(LedgerError::InvalidInput(format!(
            "name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn setup() -> IdentityService {
        let store = Arc::new(MemoryStore::new());
        let guard = Arc::new(AuthorizationGuard::new(store.clone()));
        IdentityService::new(store, guard)
    }

    #[tokio::test]
    async fn register_parent_assigns_role_once() {
        let service = setup();

        let profile = service.register_parent("0xalice", "Alice").await.unwrap();
        assert_eq!(profile.account_type, Role::Parent);
        assert_eq!(profile.name, "Alice");
        assert_eq!(service.role_of("0xalice").await.unwrap(), Role::Parent);

        // Second registration of the same address is rejected.
        assert!(matches!(
            service.register_parent("0xalice", "Alice again").await,
            Err(LedgerError::AlreadyRegistered)
        ));
    }

    #[tokio::test]
    async fn add_child_requires_parent_caller() {
        let service = setup();
        assert!(matches!(
            service.add_child("0xnobody", "0xbob", "Bob").await,
            Err(LedgerError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn add_child_rejects_any_existing_role() {
        let service = setup();
        service.register_parent("0xalice", "Alice").await.unwrap();
        service.register_parent("0xdavid", "David").await.unwrap();
        service.add_child("0xalice", "0xbob", "Bob").await.unwrap();

        // Already a child of Alice's family.
        assert!(matches!(
            service.add_child("0xdavid", "0xbob", "Bob").await,
            Err(LedgerError::AlreadyRegistered)
        ));
        // A parent cannot become a child either.
        assert!(matches!(
            service.add_child("0xalice", "0xdavid", "Dave").await,
            Err(LedgerError::AlreadyRegistered)
        ));
        // Failed enrolment left the roles unchanged.
        assert_eq!(service.role_of("0xbob").await.unwrap(), Role::Child);
        assert_eq!(service.role_of("0xdavid").await.unwrap(), Role::Parent);
    }

    #[tokio::test]
    async fn profile_reflects_role_and_name() {
        let service = setup();
        service.register_parent("0xalice", "Alice").await.unwrap();
        service.add_child("0xalice", "0xbob", "Bob").await.unwrap();

        let alice = service.get_profile("0xalice").await.unwrap();
        assert_eq!((alice.account_type, alice.name.as_str()), (Role::Parent, "Alice"));

        let bob = service.get_profile("0xbob").await.unwrap();
        assert_eq!((bob.account_type, bob.name.as_str()), (Role::Child, "Bob"));

        let stranger = service.get_profile("0xnobody").await.unwrap();
        assert_eq!(stranger.account_type, Role::Unregistered);
        assert!(stranger.name.is_empty());
    }

    #[tokio::test]
    async fn names_are_validated_and_trimmed() {
        let service = setup();
        assert!(matches!(
            service.register_parent("0xalice", "   ").await,
            Err(LedgerError::InvalidInput(_))
        ));
        let profile = service.register_parent("0xalice", "  Alice ").await.unwrap();
        assert_eq!(profile.name, "Alice");
    }
}
