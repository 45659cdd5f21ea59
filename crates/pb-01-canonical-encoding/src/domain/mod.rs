//! Domain layer: canonical record shapes, fork rules and errors.

pub mod errors;
pub mod forks;
pub mod header;
pub mod receipt;
pub mod transaction;

pub use errors::{EncodingError, RootKind};
pub use forks::ForkSchedule;
pub use header::{CanonicalHeader, HeaderFields};
pub use receipt::{outcome_bytes, CanonicalReceipt};
pub use transaction::{CanonicalTransaction, TransactionType};

pub use shared_types::{Address, Hash, H256, U256};
