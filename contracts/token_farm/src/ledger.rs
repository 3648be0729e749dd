use farm::ttl::{PERSISTENT_RENEWAL_THRESHOLD, PERSISTENT_TARGET_TTL};
use soroban_sdk::{contracttype, Address, Env};

use crate::{error::ContractError, registry, storage::DataKey};

/// Stake of a single staker in a single token.
///
/// A zero `staked_amount` always comes with `is_active == false` and
/// `stake_started_at == 0`. Closed positions stay in storage so that a reward
/// accrued before the close can still be claimed.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StakePosition {
    pub staked_amount: u128,
    /// Timestamp from which the current `staked_amount` accrues rewards
    pub stake_started_at: u64,
    pub is_active: bool,
    /// Reward checkpointed on earlier top-ups or withdrawals and not yet paid out
    pub unclaimed_reward: u128,
    /// Sub-unit reward carried between checkpoints, in `Decimal` atomics (below 10^18)
    pub reward_remainder: u128,
}

impl StakePosition {
    /// Callers checkpoint the position first, which moves `stake_started_at` to `now`.
    pub fn open_or_increase(&mut self, amount: u128, now: u64) -> Result<(), ContractError> {
        if amount == 0 {
            return Err(ContractError::ZeroAmount);
        }
        if self.is_active {
            self.staked_amount = self
                .staked_amount
                .checked_add(amount)
                .ok_or(ContractError::ContractMathError)?;
        } else {
            self.staked_amount = amount;
            self.stake_started_at = now;
            self.is_active = true;
        }

        Ok(())
    }

    pub fn decrease_or_close(&mut self, amount: u128) -> Result<(), ContractError> {
        self.staked_amount = self
            .staked_amount
            .checked_sub(amount)
            .ok_or(ContractError::InsufficientStake)?;
        if self.staked_amount == 0 {
            self.stake_started_at = 0;
            self.is_active = false;
        }

        Ok(())
    }
}

pub fn get_position(env: &Env, token: &Address, staker: &Address) -> StakePosition {
    let key = DataKey::Position(token.clone(), staker.clone());
    let position = env.storage().persistent().get(&key).unwrap_or_default();
    env.storage().persistent().has(&key).then(|| {
        env.storage().persistent().extend_ttl(
            &key,
            PERSISTENT_RENEWAL_THRESHOLD,
            PERSISTENT_TARGET_TTL,
        )
    });

    position
}

pub fn save_position(env: &Env, token: &Address, staker: &Address, position: &StakePosition) {
    let key = DataKey::Position(token.clone(), staker.clone());
    env.storage().persistent().set(&key, position);
    env.storage().persistent().extend_ttl(
        &key,
        PERSISTENT_RENEWAL_THRESHOLD,
        PERSISTENT_TARGET_TTL,
    );
}

pub fn get_balance(env: &Env, token: &Address, staker: &Address) -> u128 {
    get_position(env, token, staker).staked_amount
}

pub fn get_start_time(env: &Env, token: &Address, staker: &Address) -> u64 {
    get_position(env, token, staker).stake_started_at
}

/// Derived from the positions, never stored: true while any position of `staker` is open.
pub fn is_staking(env: &Env, staker: &Address) -> bool {
    registry::get_token_list(env)
        .iter()
        .any(|token| get_position(env, &token, staker).is_active)
}

/// Amount of `token` held by the contract on behalf of stakers.
pub fn get_total_staked(env: &Env, token: &Address) -> u128 {
    let key = DataKey::TotalStaked(token.clone());
    let total = env.storage().persistent().get(&key).unwrap_or(0u128);
    env.storage().persistent().has(&key).then(|| {
        env.storage().persistent().extend_ttl(
            &key,
            PERSISTENT_RENEWAL_THRESHOLD,
            PERSISTENT_TARGET_TTL,
        )
    });

    total
}

pub fn save_total_staked(env: &Env, token: &Address, total: u128) {
    let key = DataKey::TotalStaked(token.clone());
    env.storage().persistent().set(&key, &total);
    env.storage().persistent().extend_ttl(
        &key,
        PERSISTENT_RENEWAL_THRESHOLD,
        PERSISTENT_TARGET_TTL,
    );
}
