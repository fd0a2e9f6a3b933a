//! Stake movement between delegates of the external staking service.
//!
//! All principal lives in the staking service under the wrapper's own
//! account, split by delegate. This module is the only place that talks to
//! the service and the underlying token.

use odra::casper_types::U256;
use odra::prelude::*;
use odra::ContractRef;

use crate::collaborators::{FungibleTokenContractRef, StakingServiceContractRef};

#[odra::odra_error]
pub enum MovementError {
    NotConfigured = 11,
}

#[odra::module]
pub struct StakeMovement {
    staker: Var<Address>,
    token: Var<Address>,
}

#[odra::module]
impl StakeMovement {
    /// Store the staking service and resolve the token it stakes.
    pub fn init(&mut self, staker: Address) {
        let token = StakingServiceContractRef::new(self.env(), staker).get_token();
        self.staker.set(staker);
        self.token.set(token);
    }

    pub fn staker(&self) -> Address {
        self.staker
            .get()
            .unwrap_or_else(|| self.env().revert(MovementError::NotConfigured))
    }

    pub fn token(&self) -> Address {
        self.token
            .get()
            .unwrap_or_else(|| self.env().revert(MovementError::NotConfigured))
    }

    /// Take `amount` of the underlying token from `owner` and stake it under `delegate`.
    pub fn pull_and_stake(&mut self, owner: Address, delegate: Option<Address>, amount: U256) {
        let this = self.env().self_address();
        self.token_ref().transfer_from(owner, this, amount);
        self.stake(delegate, amount);
    }

    /// Unstake `amount` held under `delegate` straight to `recipient`.
    pub fn release(&mut self, delegate: Option<Address>, recipient: Address, amount: U256) {
        self.staker_ref().withdraw_amount(delegate, recipient, amount);
    }

    /// Re-point `amount` of stake from one delegate to another.
    pub fn move_delegates(&mut self, from: Option<Address>, to: Option<Address>, amount: U256) {
        if amount.is_zero() || from == to {
            return;
        }
        let this = self.env().self_address();
        self.staker_ref().withdraw_amount(from, this, amount);
        self.stake(to, amount);
    }

    fn stake(&mut self, delegate: Option<Address>, amount: U256) {
        let staker = self.staker();
        self.token_ref().approve(staker, amount);
        self.staker_ref().stake(delegate);
    }

    fn staker_ref(&self) -> StakingServiceContractRef {
        StakingServiceContractRef::new(self.env(), self.staker())
    }

    fn token_ref(&self) -> FungibleTokenContractRef {
        FungibleTokenContractRef::new(self.env(), self.token())
    }
}
