//! Activation heights of the forks that change record shapes.

use crate::domain::transaction::TransactionType;

/// Mainnet block that enabled access-list transactions.
pub const MAINNET_BERLIN_BLOCK: u64 = 12_244_000;
/// Mainnet block that enabled dynamic-fee transactions and the base fee.
pub const MAINNET_LONDON_BLOCK: u64 = 12_965_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForkSchedule {
    pub berlin_block: u64,
    pub london_block: u64,
}

impl ForkSchedule {
    pub const fn mainnet() -> Self {
        Self {
            berlin_block: MAINNET_BERLIN_BLOCK,
            london_block: MAINNET_LONDON_BLOCK,
        }
    }

    /// Every typed envelope is accepted from genesis. Used for dev chains.
    pub const fn all_active() -> Self {
        Self {
            berlin_block: 0,
            london_block: 0,
        }
    }

    /// Whether `tx_type` may appear in block `block_number`.
    pub fn permits(&self, tx_type: TransactionType, block_number: u64) -> bool {
        match tx_type {
            TransactionType::Legacy => true,
            TransactionType::AccessList => block_number >= self.berlin_block,
            TransactionType::DynamicFee => block_number >= self.london_block,
        }
    }
}

impl Default for ForkSchedule {
    fn default() -> Self {
        Self::mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_boundaries() {
        let forks = ForkSchedule::mainnet();
        assert!(forks.permits(TransactionType::Legacy, 0));
        assert!(!forks.permits(TransactionType::AccessList, MAINNET_BERLIN_BLOCK - 1));
        assert!(forks.permits(TransactionType::AccessList, MAINNET_BERLIN_BLOCK));
        assert!(!forks.permits(TransactionType::DynamicFee, MAINNET_BERLIN_BLOCK));
        assert!(forks.permits(TransactionType::DynamicFee, MAINNET_LONDON_BLOCK));
    }

    #[test]
    fn test_all_active() {
        let forks = ForkSchedule::all_active();
        assert!(forks.permits(TransactionType::DynamicFee, 0));
    }
}
