//! External contract interfaces consumed by the wrapper.
//!
//! Argument names must match the entry points of the deployed contracts,
//! since Casper passes call arguments by name.

use odra::casper_types::U256;
use odra::prelude::*;

/// Staking service the wrapper keeps its principal in.
///
/// Stake is accounted per `(depositor, delegate)`; the wrapper is always the
/// depositor, and `None` is the bucket for undelegated stake.
#[odra::external_contract]
pub trait StakingService {
    /// Token the service accepts as stake
    fn get_token(&self) -> Address;

    /// Pull the caller's whole token allowance and stake it under `delegate`.
    fn stake(&mut self, delegate: Option<Address>);

    /// Unstake `amount` of the caller's stake held under `delegate` and send
    /// the tokens to `recipient`.
    fn withdraw_amount(&mut self, delegate: Option<Address>, recipient: Address, amount: U256);
}

/// The CEP-18 subset used to move the underlying token around.
///
/// CEP-18 entry points revert instead of returning `false`.
#[odra::external_contract]
pub trait FungibleToken {
    fn allowance(&self, owner: Address, spender: Address) -> U256;

    fn approve(&mut self, spender: Address, amount: U256);

    fn transfer(&mut self, recipient: Address, amount: U256);

    fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256);
}
