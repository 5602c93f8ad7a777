//! Mint message digest construction.
//!
//! The Relics contract verifies signatures over
//! `keccak256(abi.encodePacked(wallet, uint256(rewardId), uint256(nonce),
//! uint256(deadline)))` — 20 address bytes followed by three big-endian
//! 32-byte words, tightly packed, 116 bytes total. This layout must match
//! the contract's `getMessageHash` byte for byte; it is not a design
//! freedom on this side.

use alloy::primitives::{keccak256, Address, B256, U256};

use kronos_types::RewardId;

/// Packed pre-image length: 20 + 32 + 32 + 32.
pub const PACKED_LEN: usize = 116;

/// Tightly packed pre-image of the mint message.
pub fn encode_packed(wallet: Address, reward_id: RewardId, nonce: u64, deadline: u64) -> [u8; PACKED_LEN] {
    let mut packed = [0u8; PACKED_LEN];
    packed[..20].copy_from_slice(wallet.as_slice());
    packed[20..52].copy_from_slice(&U256::from(reward_id).to_be_bytes::<32>());
    packed[52..84].copy_from_slice(&U256::from(nonce).to_be_bytes::<32>());
    packed[84..116].copy_from_slice(&U256::from(deadline).to_be_bytes::<32>());
    packed
}

/// Keccak256 of the packed mint message.
pub fn mint_digest(wallet: Address, reward_id: RewardId, nonce: u64, deadline: u64) -> B256 {
    keccak256(encode_packed(wallet, reward_id, nonce, deadline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn wallet() -> Address {
        Address::from_str("0x742d35Cc6634C0532925a3b844Bc454e4438f44e").expect("address")
    }

    #[test]
    fn test_packed_layout() {
        let packed = encode_packed(wallet(), 3, 7, 1_700_003_600);
        assert_eq!(&packed[..20], wallet().as_slice());
        // uint256 values are right-aligned big-endian words
        assert_eq!(packed[51], 3);
        assert_eq!(&packed[20..51], &[0u8; 31]);
        assert_eq!(packed[83], 7);
    }

    #[test]
    fn test_digest_deterministic() {
        let a = mint_digest(wallet(), 1, 0, 1_700_000_000);
        let b = mint_digest(wallet(), 1, 0, 1_700_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_digest_binds_every_field() {
        let base = mint_digest(wallet(), 1, 0, 1_700_000_000);
        assert_ne!(base, mint_digest(Address::ZERO, 1, 0, 1_700_000_000));
        assert_ne!(base, mint_digest(wallet(), 2, 0, 1_700_000_000));
        assert_ne!(base, mint_digest(wallet(), 1, 1, 1_700_000_000));
        assert_ne!(base, mint_digest(wallet(), 1, 0, 1_700_000_001));
    }
}
