//! Build contract binary for Odra WASM generation
//!
//! Compiled to WASM only; pulls in the contract entry points.

#![cfg_attr(target_arch = "wasm32", no_std)]
#![cfg_attr(target_arch = "wasm32", no_main)]

#[cfg(target_arch = "wasm32")]
extern crate odra_casper_wasm_env;

#[cfg(target_arch = "wasm32")]
use stake_wrapper_casper::pool::DelegationPool;
#[cfg(target_arch = "wasm32")]
use stake_wrapper_casper::tokens::FaucetToken;
#[cfg(target_arch = "wasm32")]
use stake_wrapper_casper::wrapper::StakeWrapper;
#[cfg(target_arch = "wasm32")]
use odra_casper_wasm_env as _;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    panic!("stake_wrapper_build_contract is intended to be built for wasm32-unknown-unknown only");
}
