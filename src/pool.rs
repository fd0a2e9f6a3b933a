//! Delegation Pool: reference staking service
//!
//! Implements the staking service interface the wrapper consumes:
//! stake is held per `(depositor, delegate)` and totalled per delegate.
//! Used as the staking collaborator in tests and on testnet.
//!
//! The owner can halt the pool (every staking call then reverts) and arm a
//! re-entry target: `stake` then calls back into the target, moving one unit
//! of the pool's own wrapper balance to the owner.

use odra::casper_types::U256;
use odra::prelude::*;
use odra::ContractRef;

use crate::collaborators::FungibleTokenContractRef;
use crate::wrapper::StakeWrapperContractRef;

pub mod events {
    use odra::casper_types::U256;
    use odra::prelude::*;

    #[odra::event]
    pub struct Staked {
        pub depositor: Address,
        pub delegate: Option<Address>,
        pub amount: U256,
    }

    #[odra::event]
    pub struct Unstaked {
        pub depositor: Address,
        pub delegate: Option<Address>,
        pub recipient: Address,
        pub amount: U256,
    }

    #[odra::event]
    pub struct HaltChanged {
        pub by: Address,
        pub halted: bool,
    }
}

#[odra::odra_error]
pub enum PoolError {
    PoolHalted = 200,
    InsufficientStake = 201,
    Unauthorized = 202,
    NotInitialized = 203,
}

#[odra::module(
    events = [events::Staked, events::Unstaked, events::HaltChanged],
    errors = PoolError
)]
pub struct DelegationPool {
    token: Var<Address>,
    stakes: Mapping<(Address, Option<Address>), U256>,
    delegated: Mapping<Option<Address>, U256>,

    // Admin
    owner: Var<Address>,
    halted: Var<bool>,
    reentry_target: Var<Option<Address>>,
}

#[odra::module]
impl DelegationPool {
    pub fn init(&mut self, token: Address) {
        self.token.set(token);
        self.owner.set(self.env().caller());
        self.halted.set(false);
        self.reentry_target.set(None);
    }

    // ==========================================
    // Staking Service
    // ==========================================

    pub fn get_token(&self) -> Address {
        self.token_address()
    }

    /// Pull the caller's whole allowance and stake it under `delegate`.
    pub fn stake(&mut self, delegate: Option<Address>) {
        self.require_running();
        let depositor = self.env().caller();
        let this = self.env().self_address();

        if let Some(target) = self.reentry_target.get().flatten() {
            let owner = self.owner_address();
            StakeWrapperContractRef::new(self.env(), target).transfer(owner, U256::one());
        }

        let mut token = FungibleTokenContractRef::new(self.env(), self.token_address());
        let amount = token.allowance(depositor, this);
        token.transfer_from(depositor, this, amount);

        let key = (depositor, delegate);
        let staked = self.stakes.get(&key).unwrap_or_default();
        self.stakes.set(&key, staked + amount);
        let total = self.delegated.get(&delegate).unwrap_or_default();
        self.delegated.set(&delegate, total + amount);

        self.env().emit_event(events::Staked {
            depositor,
            delegate,
            amount,
        });
    }

    /// Unstake `amount` of the caller's stake under `delegate` to `recipient`.
    pub fn withdraw_amount(&mut self, delegate: Option<Address>, recipient: Address, amount: U256) {
        self.require_running();
        let depositor = self.env().caller();

        let key = (depositor, delegate);
        let staked = self.stakes.get(&key).unwrap_or_default();
        if staked < amount {
            self.env().revert(PoolError::InsufficientStake);
        }
        self.stakes.set(&key, staked - amount);
        let total = self.delegated.get(&delegate).unwrap_or_default();
        self.delegated.set(&delegate, total.saturating_sub(amount));

        FungibleTokenContractRef::new(self.env(), self.token_address()).transfer(recipient, amount);

        self.env().emit_event(events::Unstaked {
            depositor,
            delegate,
            recipient,
            amount,
        });
    }

    // ==========================================
    // View Functions
    // ==========================================

    pub fn stake_of(&self, depositor: Address, delegate: Option<Address>) -> U256 {
        self.stakes.get(&(depositor, delegate)).unwrap_or_default()
    }

    /// Stake held under `delegate` across all depositors
    pub fn delegated_to(&self, delegate: Option<Address>) -> U256 {
        self.delegated.get(&delegate).unwrap_or_default()
    }

    pub fn owner(&self) -> Option<Address> {
        self.owner.get()
    }

    pub fn is_halted(&self) -> bool {
        self.halted.get_or_default()
    }

    // ==========================================
    // Admin Functions
    // ==========================================

    pub fn set_halted(&mut self, halted: bool) {
        self.require_owner();
        self.halted.set(halted);
        self.env().emit_event(events::HaltChanged {
            by: self.env().caller(),
            halted,
        });
    }

    pub fn set_reentry_target(&mut self, target: Option<Address>) {
        self.require_owner();
        self.reentry_target.set(target);
    }

    // ==========================================
    // Internal Functions
    // ==========================================

    fn require_running(&self) {
        if self.halted.get_or_default() {
            self.env().revert(PoolError::PoolHalted);
        }
    }

    fn require_owner(&self) {
        if self.owner.get() != Some(self.env().caller()) {
            self.env().revert(PoolError::Unauthorized);
        }
    }

    fn owner_address(&self) -> Address {
        self.owner
            .get()
            .unwrap_or_else(|| self.env().revert(PoolError::NotInitialized))
    }

    fn token_address(&self) -> Address {
        self.token
            .get()
            .unwrap_or_else(|| self.env().revert(PoolError::NotInitialized))
    }
}
