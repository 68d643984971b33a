use crate::domain::BankAccount;

/// Resolver trait - decides whether a well-formed bank account is actually
/// valid (modulus checking).
///
/// Synchronous and infallible from the pipeline's perspective: the handler
/// only calls it with accounts that already passed the shape check.
pub trait AccountResolver: Send + Sync {
    fn is_valid(&self, account: &BankAccount) -> bool;
}
