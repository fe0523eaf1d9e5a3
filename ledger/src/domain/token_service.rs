//! Token accounting for child balances.
//!
//! Balances only ever change through [`TokenService::credit`] (task approval)
//! and [`TokenService::debit`] (reward purchase); both are crate-private so no
//! client can move tokens directly. All amounts are integer base units scaled
//! by `10^decimals`; there is no floating-point arithmetic anywhere in the
//! ledger.

use log::info;
use std::sync::Arc;

use crate::config::TokenConfig;
use crate::domain::errors::{LedgerError, LedgerResult};
use crate::storage::IdentityStorage;

#[derive(Clone)]
pub struct TokenService {
    identity: Arc<dyn IdentityStorage>,
    config: TokenConfig,
}

impl TokenService {
    pub fn new(identity: Arc<dyn IdentityStorage>, config: TokenConfig) -> Self {
        Self { identity, config }
    }

    /// Token symbol for display purposes.
    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    /// Fixed-point exponent amounts are scaled by.
    pub fn decimals(&self) -> u8 {
        self.config.decimals
    }

    /// Balance of an address in base units. Unregistered and parent addresses
    /// hold no tokens and read as 0.
    pub async fn balance_of(&self, address: &str) -> LedgerResult<u128> {
        Ok(self
            .identity
            .get_child(address)
            .await?
            .map(|c| c.balance)
            .unwrap_or(0))
    }

    /// Credit a child's balance. Only reachable from task approval.
    pub(crate) async fn credit(&self, child_address: &str, amount: u128) -> LedgerResult<u128> {
        let mut child = self
            .identity
            .get_child(child_address)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("child {child_address}")))?;

        child.balance = child
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::InvalidInput("balance overflow".to_string()))?;
        self.identity.update_child(&child).await?;

        info!("credited {amount} base units to {child_address}, balance now {}", child.balance);
        Ok(child.balance)
    }

    /// Debit a child's balance. Only reachable from reward purchase (and the
    /// optional refund path, which reverses a previous debit via `credit`).
    pub(crate) async fn debit(&self, child_address: &str, amount: u128) -> LedgerResult<u128> {
        let mut child = self
            .identity
            .get_child(child_address)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("child {child_address}")))?;

        if child.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                balance: child.balance,
                required: amount,
            });
        }
        child.balance -= amount;
        self.identity.update_child(&child).await?;

        info!("debited {amount} base units from {child_address}, balance now {}", child.balance);
        Ok(child.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Child;
    use crate::storage::MemoryStore;

    async fn setup() -> TokenService {
        let store = Arc::new(MemoryStore::new());
        store
            .store_child(&Child::new("0xbob", "Bob", "0xalice"))
            .await
            .unwrap();
        TokenService::new(store, TokenConfig::default())
    }

    #[tokio::test]
    async fn unknown_address_reads_as_zero() {
        let tokens = setup().await;
        assert_eq!(tokens.balance_of("0xnobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn credit_then_debit_round_trip() {
        let tokens = setup().await;
        assert_eq!(tokens.credit("0xbob", 20).await.unwrap(), 20);
        assert_eq!(tokens.debit("0xbob", 5).await.unwrap(), 15);
        assert_eq!(tokens.balance_of("0xbob").await.unwrap(), 15);
    }

    #[tokio::test]
    async fn debit_rejects_underflow_in_full() {
        let tokens = setup().await;
        tokens.credit("0xbob", 3).await.unwrap();

        let err = tokens.debit("0xbob", 5).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance { balance: 3, required: 5 }
        ));
        // Nothing was withdrawn.
        assert_eq!(tokens.balance_of("0xbob").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn token_metadata_comes_from_config() {
        let tokens = setup().await;
        assert_eq!(tokens.symbol(), "FCT");
        assert_eq!(tokens.decimals(), 18);
    }
}
