//! Livenet deploy and demo binary for the Stake Wrapper.
//!
//! Run with:
//! - Deploy only:       WRAPPER_LIVENET_MODE=deploy cargo run --bin stake_wrapper_livenet --features=livenet
//! - Deploy + demo:     WRAPPER_LIVENET_MODE=deploy_and_demo cargo run --bin stake_wrapper_livenet --features=livenet
//! - Demo on existing:  WRAPPER_LIVENET_MODE=demo WRAPPER_EXISTING_TOKEN=... WRAPPER_EXISTING_POOL=... WRAPPER_EXISTING_WRAPPER=... cargo run ...
//! - Query on existing: WRAPPER_LIVENET_MODE=query WRAPPER_EXISTING_TOKEN=... WRAPPER_EXISTING_POOL=... WRAPPER_EXISTING_WRAPPER=... cargo run ...
//!
//! Required environment variables (Odra livenet):
//! - ODRA_CASPER_LIVENET_SECRET_KEY_PATH
//! - ODRA_CASPER_LIVENET_NODE_ADDRESS
//! - ODRA_CASPER_LIVENET_EVENTS_URL
//! - ODRA_CASPER_LIVENET_CHAIN_NAME
//!
//! Optional:
//! - ODRA_CASPER_LIVENET_DEPLOY_GAS          (motes)
//! - ODRA_CASPER_LIVENET_CALL_GAS            (motes)
//! - WRAPPER_EXISTING_TOKEN                  (64-hex or formatted "hash-..."/"contract-package-...")
//! - WRAPPER_EXISTING_POOL                   (same formats)
//! - WRAPPER_EXISTING_WRAPPER                (same formats)
//! - WRAPPER_DEMO_DEPOSIT                    (whole tokens, default: 100)
//! - WRAPPER_DEMO_DELEGATE                   (address to delegate to after depositing; "account-hash-..." etc.)

use odra::casper_types::U256;
use odra::host::{Deployer, HostRef, HostRefLoader};
use odra::prelude::*;

use stake_wrapper_casper::pool::{DelegationPool, DelegationPoolHostRef, DelegationPoolInitArgs};
use stake_wrapper_casper::tokens::{FaucetToken, FaucetTokenInitArgs};
use stake_wrapper_casper::wrapper::{StakeWrapper, StakeWrapperHostRef, StakeWrapperInitArgs};

const TOKEN_DECIMALS: u8 = 9;
const UNITS_PER_TOKEN: u64 = 1_000_000_000;

const DEFAULT_DEPLOY_GAS_MOTES: u64 = 450_000_000_000; // 450 CSPR
const DEFAULT_CALL_GAS_MOTES: u64 = 50_000_000_000; // 50 CSPR

fn main() {
    println!("============================================");
    println!("  Stake Wrapper - Livenet");
    println!("============================================\n");

    let env = odra_casper_livenet_env::env();

    let mode = std::env::var("WRAPPER_LIVENET_MODE").unwrap_or_else(|_| "deploy".to_string());
    let should_deploy = mode == "deploy" || mode == "deploy_and_demo";
    let should_demo = mode == "demo" || mode == "deploy_and_demo";
    let should_query = mode == "query";

    let deploy_gas = read_u64_env("ODRA_CASPER_LIVENET_DEPLOY_GAS", DEFAULT_DEPLOY_GAS_MOTES);
    let call_gas = read_u64_env("ODRA_CASPER_LIVENET_CALL_GAS", DEFAULT_CALL_GAS_MOTES);
    let deposit_tokens = read_u64_env("WRAPPER_DEMO_DEPOSIT", 100);
    let delegate_to = std::env::var("WRAPPER_DEMO_DELEGATE")
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_address(&raw));

    println!("[INFO] Mode: {}", mode);
    println!("[INFO] Caller: {:?}", env.caller());
    println!("[INFO] Gas (motes): deploy={}, calls={}", deploy_gas, call_gas);
    println!(
        "[INFO] Demo params: deposit={} tokens, delegate_to={:?}",
        deposit_tokens, delegate_to
    );
    println!();

    // ==========================================
    // Step 1: Deploy (or reuse) the underlying token
    // ==========================================
    let token = if should_deploy {
        println!("[STEP 1] Deploying faucet token...");
        env.set_gas(deploy_gas);
        let token = FaucetToken::deploy(
            &env,
            FaucetTokenInitArgs {
                name: "Stake Token".to_string(),
                symbol: "STK".to_string(),
                decimals: TOKEN_DECIMALS,
            },
        );
        println!("[OK] Token deployed at: {:?}", token.address());
        println!();
        token
    } else {
        println!("[STEP 1] Reusing existing token...");
        FaucetToken::load(&env, existing_address("WRAPPER_EXISTING_TOKEN", &mode))
    };

    // ==========================================
    // Step 2: Deploy (or reuse) the staking pool
    // ==========================================
    let pool = if should_deploy {
        println!("[STEP 2] Deploying delegation pool...");
        env.set_gas(deploy_gas);
        let pool = DelegationPool::deploy(
            &env,
            DelegationPoolInitArgs {
                token: token.address(),
            },
        );
        println!("[OK] Pool deployed at: {:?}", pool.address());
        println!();
        pool
    } else {
        println!("[STEP 2] Reusing existing pool...");
        DelegationPool::load(&env, existing_address("WRAPPER_EXISTING_POOL", &mode))
    };

    // ==========================================
    // Step 3: Deploy (or reuse) the wrapper
    // ==========================================
    let wrapper = if should_deploy {
        println!("[STEP 3] Deploying stake wrapper...");
        env.set_gas(deploy_gas);
        let wrapper = StakeWrapper::deploy(
            &env,
            StakeWrapperInitArgs {
                staker: pool.address(),
                name: "Wrapped Stake Token".to_string(),
                symbol: "wSTK".to_string(),
                decimals: TOKEN_DECIMALS,
            },
        );
        println!("[OK] Wrapper deployed at: {:?}", wrapper.address());
        println!("     Staker: {:?}", wrapper.get_staker());
        println!("     Token:  {:?}", wrapper.get_token());
        println!();
        wrapper
    } else {
        println!("[STEP 3] Reusing existing wrapper...");
        StakeWrapper::load(&env, existing_address("WRAPPER_EXISTING_WRAPPER", &mode))
    };

    // ==========================================
    // Demo: mint -> approve -> deposit -> delegate
    // ==========================================
    if should_demo {
        let mut token = token;
        let mut wrapper = wrapper;
        let caller = env.caller();
        let amount = U256::from(deposit_tokens) * U256::from(UNITS_PER_TOKEN);

        println!("[DEMO 1] Minting {} tokens from the faucet...", deposit_tokens);
        env.set_gas(call_gas);
        token.faucet_mint(caller, amount);
        println!("[OK] Token balance: {}", token.balance_of(caller));

        println!("[DEMO 2] Approving the wrapper...");
        env.set_gas(call_gas);
        token.approve(wrapper.address(), amount);
        println!("[OK] Allowance: {}", token.allowance(caller, wrapper.address()));

        println!("[DEMO 3] Depositing...");
        env.set_gas(call_gas);
        wrapper.deposit();
        println!("[OK] Deposit complete.");
        print_position_info(&wrapper, &pool, caller);

        if let Some(delegate) = delegate_to {
            println!("[DEMO 4] Delegating to {:?}...", delegate);
            env.set_gas(call_gas);
            wrapper.delegate(Some(delegate));
            println!("[OK] Delegation complete.");
            print_position_info(&wrapper, &pool, caller);
        } else {
            println!("[WARN] WRAPPER_DEMO_DELEGATE not set, stake stays undelegated.");
        }
        return;
    }

    if should_query {
        print_query_json(&wrapper, env.caller());
        return;
    }

    output_deploy_json(token.address(), pool.address(), wrapper.address());
}

fn print_position_info(
    wrapper: &StakeWrapperHostRef,
    pool: &DelegationPoolHostRef,
    user: Address,
) {
    let delegate = wrapper.get_delegated_to(user);
    let at = last_checkpoint_time(wrapper);
    println!("     balance: {}", wrapper.balance_of(user));
    println!("     delegated_to: {:?}", delegate);
    println!("     total_staked: {}", wrapper.get_total_staked());
    println!("     checkpoints: {}", wrapper.get_num_checkpoints());
    println!(
        "     seconds_per_total_staked(t={}): {}",
        at,
        wrapper.get_seconds_per_total_staked(at)
    );
    println!("     pool stake under delegate: {}", pool.delegated_to(delegate));
    println!();
}

fn print_query_json(wrapper: &StakeWrapperHostRef, user: Address) {
    let at = last_checkpoint_time(wrapper);
    println!(
        "WRAPPER_QUERY_JSON={{\"user\":\"{:?}\",\"balance\":\"{}\",\"delegated_to\":\"{:?}\",\"total_staked\":\"{}\",\"checkpoints\":{},\"seconds_per_total_staked\":\"{}\",\"at\":{},\"queried_at\":\"{}\"}}",
        user,
        wrapper.balance_of(user),
        wrapper.get_delegated_to(user),
        wrapper.get_total_staked(),
        wrapper.get_num_checkpoints(),
        wrapper.get_seconds_per_total_staked(at),
        at,
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
}

/// Timestamp of the newest checkpoint; never ahead of the chain's block time.
fn last_checkpoint_time(wrapper: &StakeWrapperHostRef) -> u64 {
    wrapper.get_checkpoint(wrapper.get_num_checkpoints()).timestamp
}

fn read_u64_env(name: &str, default_value: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => {
            let cleaned = raw.trim().replace('_', "");
            cleaned.parse::<u64>().unwrap_or(default_value)
        }
        Err(_) => default_value,
    }
}

fn existing_address(var: &str, mode: &str) -> Address {
    let raw = std::env::var(var)
        .unwrap_or_else(|_| panic!("{} must be set for mode={}", var, mode));
    let addr = parse_address(&raw);
    println!("[OK] {}: {:?}", var, addr);
    println!();
    addr
}

fn output_deploy_json(token: Address, pool: Address, wrapper: Address) {
    let chain_name =
        std::env::var("ODRA_CASPER_LIVENET_CHAIN_NAME").unwrap_or_else(|_| "casper-test".to_string());

    println!(
        r#"WRAPPER_DEPLOY_JSON={{"chain_name":"{}","token":"{:?}","pool":"{:?}","wrapper":"{:?}","deployed_at":"{}"}}"#,
        chain_name,
        token,
        pool,
        wrapper,
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
}

fn parse_address(raw: &str) -> Address {
    use odra::casper_types::account::AccountHash;
    use odra::casper_types::contracts::ContractPackageHash;

    fn decode_hex_32(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        if s.len() != 64 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            panic!("Invalid address hash (expected 64 hex): {}", s);
        }
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .unwrap_or_else(|_| panic!("Invalid hex in address: {}", s));
        }
        out
    }

    let trimmed = raw.trim();
    if let Some(hex) = trimmed.strip_prefix("account-hash-") {
        return Address::Account(AccountHash::new(decode_hex_32(hex)));
    }
    let hex = trimmed
        .strip_prefix("contract-package-")
        .or_else(|| trimmed.strip_prefix("package-"))
        .or_else(|| trimmed.strip_prefix("hash-"))
        .unwrap_or(trimmed);
    Address::Contract(ContractPackageHash::new(decode_hex_32(hex)))
}
