//! Account validity resolvers.

mod modulus;

pub use modulus::{ModulusResolver, WeightTableError};
