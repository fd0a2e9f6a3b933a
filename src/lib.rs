//! Stake Wrapper x Casper: tokenized staking position (Odra)
//!
//! This crate wraps a position in an external staking service into a fungible
//! balance with per-holder delegation and a time-weighted stake accumulator.
//! - StakeWrapper: the wrapper contract
//! - DelegationPool: reference staking service (tests, testnet demos)
//! - FaucetToken: CEP-18 token with open mint (tests, testnet demos)

#![cfg_attr(target_arch = "wasm32", no_std)]

extern crate alloc;

pub mod checkpoint;
pub mod collaborators;
pub mod delegation;
pub mod ledger;
pub mod movement;
pub mod pool;
pub mod tokens;
pub mod wrapper;
