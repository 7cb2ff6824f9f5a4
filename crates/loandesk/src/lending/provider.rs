use super::domain::{CreditCard, CustomerId, CustomerProfile, Loan, Transaction};

/// Read-side abstraction over whatever store holds customer records, so the
/// evaluation pipeline can be exercised against files, databases, or fixtures.
pub trait CustomerDataProvider: Send + Sync {
    fn customer(&self, id: &CustomerId) -> Result<Option<CustomerProfile>, ProviderError>;

    /// Transactions ordered most recent first, truncated to `limit`.
    fn transactions(
        &self,
        id: &CustomerId,
        limit: usize,
    ) -> Result<Vec<Transaction>, ProviderError>;

    fn credit_cards(&self, id: &CustomerId) -> Result<Vec<CreditCard>, ProviderError>;

    fn loans(&self, id: &CustomerId) -> Result<Vec<Loan>, ProviderError>;
}

/// Error enumeration for provider failures.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("customer store unavailable: {0}")]
    Unavailable(String),
}
