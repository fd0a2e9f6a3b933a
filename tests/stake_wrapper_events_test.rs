//! Event emission and revert rollback for the Stake Wrapper.

use odra::casper_types::U256;
use odra::host::{Deployer, HostEnv};
use odra::prelude::*;

use stake_wrapper_casper::pool::{DelegationPool, DelegationPoolHostRef, DelegationPoolInitArgs};
use stake_wrapper_casper::tokens::{FaucetToken, FaucetTokenHostRef, FaucetTokenInitArgs};
use stake_wrapper_casper::wrapper::events::{Approval, Delegation, Deposit, Transfer, Withdrawal};
use stake_wrapper_casper::wrapper::{StakeWrapper, StakeWrapperHostRef, StakeWrapperInitArgs};

fn deploy_contracts(
    env: &HostEnv,
) -> (FaucetTokenHostRef, DelegationPoolHostRef, StakeWrapperHostRef) {
    env.set_caller(env.get_account(0));
    let token = FaucetToken::deploy(
        env,
        FaucetTokenInitArgs {
            name: "Stake Token".to_string(),
            symbol: "STK".to_string(),
            decimals: 9,
        },
    );
    let pool = DelegationPool::deploy(
        env,
        DelegationPoolInitArgs {
            token: token.address(),
        },
    );
    let wrapper = StakeWrapper::deploy(
        env,
        StakeWrapperInitArgs {
            staker: pool.address(),
            name: "Wrapped Stake Token".to_string(),
            symbol: "wSTK".to_string(),
            decimals: 9,
        },
    );
    (token, pool, wrapper)
}

fn fund(
    env: &HostEnv,
    token: &mut FaucetTokenHostRef,
    spender: Address,
    user: Address,
    value: u64,
) {
    env.set_caller(user);
    token.faucet_mint(user, U256::from(value));
    token.approve(spender, U256::from(value));
}

#[test]
fn test_deposit_and_withdraw_emit_events() {
    let env = odra_test::env();
    let (mut token, _, mut wrapper) = deploy_contracts(&env);
    let user = env.get_account(1);

    fund(&env, &mut token, wrapper.address(), user, 100);
    wrapper.deposit_amount(U256::from(100u64));
    assert!(env.emitted_event(
        &wrapper,
        Deposit {
            from: user,
            amount: U256::from(100u64),
        }
    ));

    wrapper.withdraw_amount(U256::from(30u64));
    assert!(env.emitted_event(
        &wrapper,
        Withdrawal {
            from: user,
            amount: U256::from(30u64),
        }
    ));
}

#[test]
fn test_delegate_emits_delegation() {
    let env = odra_test::env();
    let (mut token, _, mut wrapper) = deploy_contracts(&env);
    let user = env.get_account(1);
    let x = env.get_account(5);

    fund(&env, &mut token, wrapper.address(), user, 10);
    wrapper.deposit();
    wrapper.delegate(Some(x));
    wrapper.delegate(None);

    assert!(env.emitted_event(&wrapper, Delegation { from: user, to: Some(x) }));
    assert!(env.emitted_event(&wrapper, Delegation { from: user, to: None }));
}

#[test]
fn test_transfer_and_approve_emit_events() {
    let env = odra_test::env();
    let (mut token, _, mut wrapper) = deploy_contracts(&env);
    let alice = env.get_account(1);
    let bob = env.get_account(2);
    let spender = env.get_account(3);

    fund(&env, &mut token, wrapper.address(), alice, 50);
    wrapper.deposit();
    wrapper.transfer(bob, U256::from(20u64));
    wrapper.approve(spender, U256::from(5u64));

    assert!(env.emitted_event(
        &wrapper,
        Transfer {
            from: alice,
            to: bob,
            amount: U256::from(20u64),
        }
    ));
    assert!(env.emitted_event(
        &wrapper,
        Approval {
            owner: alice,
            spender,
            amount: U256::from(5u64),
        }
    ));
}

#[test]
fn test_failed_deposit_leaves_no_trace() {
    let env = odra_test::env();
    let (mut token, mut pool, mut wrapper) = deploy_contracts(&env);
    let user = env.get_account(1);

    env.set_caller(env.get_account(0));
    pool.set_halted(true);

    fund(&env, &mut token, wrapper.address(), user, 100);
    let result = wrapper.try_deposit_amount(U256::from(100u64));

    assert!(result.is_err());
    assert_eq!(wrapper.balance_of(user), U256::zero());
    assert_eq!(wrapper.get_total_staked(), U256::zero());
    assert_eq!(wrapper.get_num_checkpoints(), 0);
    assert_eq!(token.balance_of(user), U256::from(100u64));
    assert_eq!(env.events_count(&wrapper), 0);
}

#[test]
fn test_failed_delegate_keeps_previous_delegate() {
    let env = odra_test::env();
    let (mut token, mut pool, mut wrapper) = deploy_contracts(&env);
    let user = env.get_account(1);
    let x = env.get_account(5);

    fund(&env, &mut token, wrapper.address(), user, 100);
    wrapper.deposit();

    env.set_caller(env.get_account(0));
    pool.set_halted(true);

    env.set_caller(user);
    assert!(wrapper.try_delegate(Some(x)).is_err());
    assert_eq!(wrapper.get_delegated_to(user), None);
    assert_eq!(pool.delegated_to(None), U256::from(100u64));
}

#[test]
fn test_reentrant_deposit_rolls_back() {
    let env = odra_test::env();
    let (mut token, mut pool, mut wrapper) = deploy_contracts(&env);
    let owner = env.get_account(0);
    let alice = env.get_account(1);
    let bob = env.get_account(2);

    fund(&env, &mut token, wrapper.address(), alice, 100);
    wrapper.deposit();
    wrapper.transfer(pool.address(), U256::from(10u64));

    env.set_caller(owner);
    pool.set_reentry_target(Some(wrapper.address()));

    fund(&env, &mut token, wrapper.address(), bob, 50);
    assert!(wrapper.try_deposit_amount(U256::from(50u64)).is_err());

    assert_eq!(wrapper.balance_of(bob), U256::zero());
    assert_eq!(wrapper.balance_of(pool.address()), U256::from(10u64));
    assert_eq!(wrapper.balance_of(owner), U256::zero());
    assert_eq!(wrapper.get_total_staked(), U256::from(100u64));
    assert_eq!(token.balance_of(bob), U256::from(50u64));

    // disarmed, the same deposit goes through
    env.set_caller(owner);
    pool.set_reentry_target(None);
    env.set_caller(bob);
    wrapper.deposit_amount(U256::from(50u64));
    assert_eq!(wrapper.balance_of(bob), U256::from(50u64));
}
