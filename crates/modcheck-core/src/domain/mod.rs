//! Domain entities.

mod account;

pub use account::BankAccount;
