//! Stake Wrapper Contract
//!
//! Tokenizes a position in an external staking service.
//! - Depositors hand over the underlying token and receive an equal balance here
//! - Each holder may delegate the stake behind their balance to any address
//! - A checkpoint log tracks seconds-per-total-staked for historical share queries
//!
//! ## Units
//! - Amounts: `U256` on the interface, stored as `U128`
//! - Time: seconds (Casper block time is milliseconds)
//!
//! ## Ordering
//! Deposit and withdraw write the ledger before calling out. Delegate writes
//! the registry, then moves stake. Transfers move stake, then write balances.
//! Every mutating entry point is also guarded against re-entry.

use odra::casper_types::{U128, U256};
use odra::prelude::*;
use odra::ContractRef;

use crate::checkpoint::{Checkpoint, CheckpointLog};
use crate::collaborators::FungibleTokenContractRef;
use crate::delegation::DelegationRegistry;
use crate::ledger::{narrow, widen, BalanceLedger, LedgerError};
use crate::movement::StakeMovement;

const MILLIS_PER_SECOND: u64 = 1_000;

// ==========================================
// Events
// ==========================================

pub mod events {
    use odra::casper_types::U256;
    use odra::prelude::*;

    #[odra::event]
    pub struct Deposit {
        pub from: Address,
        pub amount: U256,
    }

    #[odra::event]
    pub struct Withdrawal {
        pub from: Address,
        pub amount: U256,
    }

    #[odra::event]
    pub struct Delegation {
        pub from: Address,
        pub to: Option<Address>,
    }

    #[odra::event]
    pub struct Transfer {
        pub from: Address,
        pub to: Address,
        pub amount: U256,
    }

    #[odra::event]
    pub struct Approval {
        pub owner: Address,
        pub spender: Address,
        pub amount: U256,
    }
}

// ==========================================
// Errors
// ==========================================

#[odra::odra_error]
pub enum WrapperError {
    ZeroAmount = 10,
}

// ==========================================
// Contract
// ==========================================

#[odra::module(
    events = [
        events::Deposit,
        events::Withdrawal,
        events::Delegation,
        events::Transfer,
        events::Approval
    ],
    errors = WrapperError
)]
pub struct StakeWrapper {
    // Token metadata
    name: Var<String>,
    symbol: Var<String>,
    decimals: Var<u8>,

    snapshots: SubModule<CheckpointLog>,
    ledger: SubModule<BalanceLedger>,
    delegation: SubModule<DelegationRegistry>,
    movement: SubModule<StakeMovement>,
}

#[odra::module]
impl StakeWrapper {
    /// Initialize the wrapper over the staking service at `staker`.
    pub fn init(&mut self, staker: Address, name: String, symbol: String, decimals: u8) {
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(decimals);
        self.movement.init(staker);
    }

    // ==========================================
    // User Functions
    // ==========================================

    /// Deposit everything the caller has approved to this contract.
    #[odra(non_reentrant)]
    pub fn deposit(&mut self) {
        let caller = self.env().caller();
        let this = self.env().self_address();
        let approved = FungibleTokenContractRef::new(self.env(), self.movement.token())
            .allowance(caller, this);
        self.deposit_for(caller, approved);
    }

    /// Deposit `amount` of the underlying token.
    #[odra(non_reentrant)]
    pub fn deposit_amount(&mut self, amount: U256) {
        let caller = self.env().caller();
        self.deposit_for(caller, amount);
    }

    /// Withdraw the caller's whole balance.
    #[odra(non_reentrant)]
    pub fn withdraw(&mut self) {
        let caller = self.env().caller();
        let balance = widen(self.ledger.balance_of(&caller));
        self.withdraw_for(caller, balance);
    }

    /// Withdraw `amount` of the caller's balance back to the caller.
    #[odra(non_reentrant)]
    pub fn withdraw_amount(&mut self, amount: U256) {
        let caller = self.env().caller();
        self.withdraw_for(caller, amount);
    }

    /// Delegate the stake behind the caller's balance to `to`.
    /// `None` leaves it undelegated.
    #[odra(non_reentrant)]
    pub fn delegate(&mut self, to: Option<Address>) {
        let caller = self.env().caller();
        self.checkpoint();

        let previous = self.delegation.set_delegate(&caller, to);
        let balance = widen(self.ledger.balance_of(&caller));
        self.movement.move_delegates(previous, to, balance);

        self.env().emit_event(events::Delegation { from: caller, to });
    }

    #[odra(non_reentrant)]
    pub fn transfer(&mut self, recipient: Address, amount: U256) {
        let sender = self.env().caller();
        self.transfer_between(sender, recipient, amount);
    }

    #[odra(non_reentrant)]
    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) {
        let spender = self.env().caller();
        let stored = self.checked(amount);
        self.ledger.spend_allowance(&owner, &spender, stored);
        self.transfer_between(owner, recipient, amount);
    }

    pub fn approve(&mut self, spender: Address, amount: U256) {
        let owner = self.env().caller();
        let stored = self.checked(amount);
        self.ledger.set_allowance(&owner, &spender, stored);
        self.env().emit_event(events::Approval {
            owner,
            spender,
            amount,
        });
    }

    // ==========================================
    // View Functions
    // ==========================================

    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    pub fn symbol(&self) -> String {
        self.symbol.get_or_default()
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get_or_default()
    }

    /// Same as `get_total_staked`; every unit in circulation is staked.
    pub fn total_supply(&self) -> U256 {
        self.get_total_staked()
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        widen(self.ledger.balance_of(&owner))
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        widen(self.ledger.allowance(&owner, &spender))
    }

    pub fn get_staker(&self) -> Address {
        self.movement.staker()
    }

    pub fn get_token(&self) -> Address {
        self.movement.token()
    }

    pub fn get_delegated_to(&self, owner: Address) -> Option<Address> {
        self.delegation.delegate_of(&owner)
    }

    pub fn get_total_staked(&self) -> U256 {
        widen(self.ledger.total_staked())
    }

    /// Accumulated seconds per total staked (scaled by 2^64) at `timestamp`.
    /// Reverts for timestamps after the current block time.
    pub fn get_seconds_per_total_staked(&self, timestamp: u64) -> U256 {
        self.snapshots.lookup(timestamp, self.now(), self.get_total_staked())
    }

    pub fn get_num_checkpoints(&self) -> u32 {
        self.snapshots.num_snapshots()
    }

    /// Raw checkpoint at `index`; index 0 is the zero sentinel.
    pub fn get_checkpoint(&self, index: u32) -> Checkpoint {
        self.snapshots.get(index)
    }

    // ==========================================
    // Internal Functions
    // ==========================================

    fn deposit_for(&mut self, owner: Address, amount: U256) {
        let stored = self.checked(amount);
        if stored.is_zero() {
            self.env().revert(WrapperError::ZeroAmount);
        }

        self.checkpoint();
        self.ledger.mint(&owner, stored);

        let delegate = self.delegation.delegate_of(&owner);
        self.movement.pull_and_stake(owner, delegate, amount);

        self.env().emit_event(events::Deposit {
            from: owner,
            amount,
        });
    }

    fn withdraw_for(&mut self, owner: Address, amount: U256) {
        let stored = self.checked(amount);
        if stored.is_zero() {
            self.env().revert(WrapperError::ZeroAmount);
        }

        self.checkpoint();
        self.ledger.burn(&owner, stored);

        let delegate = self.delegation.delegate_of(&owner);
        self.movement.release(delegate, owner, amount);

        self.env().emit_event(events::Withdrawal {
            from: owner,
            amount,
        });
    }

    fn transfer_between(&mut self, sender: Address, recipient: Address, amount: U256) {
        let stored = self.checked(amount);
        if self.ledger.balance_of(&sender) < stored {
            self.env().revert(LedgerError::InsufficientBalance);
        }
        self.checkpoint();

        let from = self.delegation.delegate_of(&sender);
        let to = self.delegation.delegate_of(&recipient);
        self.movement.move_delegates(from, to, amount);
        self.ledger.transfer(&sender, &recipient, stored);

        self.env().emit_event(events::Transfer {
            from: sender,
            to: recipient,
            amount,
        });
    }

    /// Record the accumulator at the current total before it changes.
    fn checkpoint(&mut self) {
        let total = self.get_total_staked();
        let now = self.now();
        self.snapshots.record(total, now);
    }

    fn checked(&self, amount: U256) -> U128 {
        narrow(amount).unwrap_or_else(|err| self.env().revert(err))
    }

    fn now(&self) -> u64 {
        self.env().get_block_time() / MILLIS_PER_SECOND
    }
}
