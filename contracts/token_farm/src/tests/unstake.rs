use pretty_assertions::assert_eq;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    Address, Env,
};

use super::setup::{
    deploy_frozen_token, deploy_token_contract, deploy_token_farm, mint, ONE_PER_SECOND,
};
use crate::{error::ContractError, ledger::StakePosition};

#[test]
fn unstake_partially() {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let user = Address::generate(&env);
    let token = deploy_token_contract(&env, &owner);
    let farm = deploy_token_farm(&env, &owner, &Address::generate(&env));
    farm.register_token(&owner, &token.address, &ONE_PER_SECOND);
    mint(&env, &token.address, &user, 1_000);

    env.ledger().set_timestamp(500);
    farm.stake(&user, &token.address, &1_000);
    env.ledger().set_timestamp(510);
    farm.unstake(&user, &token.address, &400);

    assert_eq!(
        farm.query_position(&token.address, &user),
        StakePosition {
            staked_amount: 600,
            stake_started_at: 510,
            is_active: true,
            unclaimed_reward: 10_000,
            reward_remainder: 0,
        }
    );
    assert_eq!(farm.query_total_staked(&token.address), 600);
    assert_eq!(token.balance(&user), 400);
    assert_eq!(token.balance(&farm.address), 600);
    assert!(farm.is_staking(&user));
}

#[test]
fn unstake_everything_closes_position() {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let user = Address::generate(&env);
    let token = deploy_token_contract(&env, &owner);
    let farm = deploy_token_farm(&env, &owner, &Address::generate(&env));
    farm.register_token(&owner, &token.address, &ONE_PER_SECOND);
    mint(&env, &token.address, &user, 1_000);

    env.ledger().set_timestamp(500);
    farm.stake(&user, &token.address, &1_000);
    farm.unstake(&user, &token.address, &1_000);

    assert_eq!(farm.query_staking_balance(&token.address, &user), 0);
    assert_eq!(farm.query_staking_start_time(&token.address, &user), 0);
    assert_eq!(
        farm.query_position(&token.address, &user),
        StakePosition::default()
    );
    assert!(!farm.is_staking(&user));
    assert_eq!(farm.query_total_staked(&token.address), 0);
    assert_eq!(token.balance(&user), 1_000);
    assert_eq!(token.balance(&farm.address), 0);
}

#[test]
fn unstake_more_than_staked_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let user = Address::generate(&env);
    let token = deploy_token_contract(&env, &owner);
    let farm = deploy_token_farm(&env, &owner, &Address::generate(&env));
    farm.register_token(&owner, &token.address, &ONE_PER_SECOND);
    mint(&env, &token.address, &user, 1_000);

    farm.stake(&user, &token.address, &1_000);

    assert_eq!(
        farm.try_unstake(&user, &token.address, &1_001),
        Err(Ok(ContractError::InsufficientStake))
    );
    assert_eq!(farm.query_staking_balance(&token.address, &user), 1_000);
}

#[test]
fn unstake_without_position_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let user = Address::generate(&env);
    let token = deploy_token_contract(&env, &owner);
    let farm = deploy_token_farm(&env, &owner, &Address::generate(&env));
    farm.register_token(&owner, &token.address, &ONE_PER_SECOND);

    assert_eq!(
        farm.try_unstake(&user, &token.address, &1),
        Err(Ok(ContractError::InsufficientStake))
    );
}

#[test]
fn unstake_zero_amount_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let user = Address::generate(&env);
    let token = deploy_token_contract(&env, &owner);
    let farm = deploy_token_farm(&env, &owner, &Address::generate(&env));
    farm.register_token(&owner, &token.address, &ONE_PER_SECOND);

    assert_eq!(
        farm.try_unstake(&user, &token.address, &0),
        Err(Ok(ContractError::ZeroAmount))
    );
}

#[test]
fn unstake_with_rejecting_token_keeps_position() {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let user = Address::generate(&env);
    let token = deploy_frozen_token(&env);
    let farm = deploy_token_farm(&env, &owner, &Address::generate(&env));
    farm.register_token(&owner, &token.address, &ONE_PER_SECOND);
    token.mint(&user, &1_000);

    env.ledger().set_timestamp(100);
    farm.stake(&user, &token.address, &1_000);
    let before = farm.query_position(&token.address, &user);

    token.set_frozen(&true);
    env.ledger().set_timestamp(200);

    assert_eq!(
        farm.try_unstake(&user, &token.address, &1_000),
        Err(Ok(ContractError::TransferFailed))
    );
    assert_eq!(farm.query_position(&token.address, &user), before);
    assert_eq!(farm.query_total_staked(&token.address), 1_000);
    assert_eq!(token.balance(&farm.address), 1_000);
    assert_eq!(token.balance(&user), 0);
}

#[test]
fn unstake_after_disallow() {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let user = Address::generate(&env);
    let token = deploy_token_contract(&env, &owner);
    let farm = deploy_token_farm(&env, &owner, &Address::generate(&env));
    farm.register_token(&owner, &token.address, &ONE_PER_SECOND);
    mint(&env, &token.address, &user, 1_000);

    env.ledger().set_timestamp(100);
    farm.stake(&user, &token.address, &1_000);
    farm.disallow_token(&owner, &token.address);
    env.ledger().set_timestamp(150);

    farm.unstake(&user, &token.address, &1_000);

    assert_eq!(token.balance(&user), 1_000);
    assert!(!farm.is_staking(&user));
    // 1_000 staked for 50 seconds, still earned at the registered rate
    assert_eq!(
        farm.query_position(&token.address, &user).unclaimed_reward,
        50_000
    );
}

#[test]
fn unstake_keeps_other_stakers_untouched() {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let user1 = Address::generate(&env);
    let user2 = Address::generate(&env);
    let token = deploy_token_contract(&env, &owner);
    let farm = deploy_token_farm(&env, &owner, &Address::generate(&env));
    farm.register_token(&owner, &token.address, &ONE_PER_SECOND);
    mint(&env, &token.address, &user1, 1_000);
    mint(&env, &token.address, &user2, 2_000);

    farm.stake(&user1, &token.address, &1_000);
    farm.stake(&user2, &token.address, &2_000);
    assert_eq!(farm.query_total_staked(&token.address), 3_000);

    farm.unstake(&user1, &token.address, &1_000);

    assert_eq!(farm.query_staking_balance(&token.address, &user2), 2_000);
    assert_eq!(farm.query_total_staked(&token.address), 2_000);
    assert_eq!(token.balance(&farm.address), 2_000);
}

#[test]
fn unstake_with_overflowing_reward_returns_stake() {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let user = Address::generate(&env);
    let token = deploy_token_contract(&env, &owner);
    let farm = deploy_token_farm(&env, &owner, &Address::generate(&env));
    farm.register_token(&owner, &token.address, &u128::MAX);
    mint(&env, &token.address, &user, ONE_PER_SECOND as i128);

    env.ledger().set_timestamp(100);
    farm.stake(&user, &token.address, &ONE_PER_SECOND);
    env.ledger().set_timestamp(102);

    farm.unstake(&user, &token.address, &ONE_PER_SECOND);

    assert_eq!(token.balance(&user), ONE_PER_SECOND as i128);
    assert_eq!(token.balance(&farm.address), 0);
    assert_eq!(farm.query_total_staked(&token.address), 0);
    assert!(!farm.is_staking(&user));
    assert_eq!(
        farm.query_position(&token.address, &user),
        StakePosition {
            unclaimed_reward: u128::MAX,
            ..Default::default()
        }
    );
}
