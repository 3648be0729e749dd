use soroban_decimal::Decimal;

use crate::{error::ContractError, ledger::StakePosition};

const ONE: u128 = Decimal::one().atomics();

/// Whole reward units accrued since the last checkpoint and the sub-unit
/// remainder left over, with the previously carried remainder folded in.
fn accrue(
    position: &StakePosition,
    reward_rate: u128,
    now: u64,
) -> Result<(u128, u128), ContractError> {
    if !position.is_active {
        return Ok((0, position.reward_remainder));
    }
    let elapsed = now.saturating_sub(position.stake_started_at) as u128;

    let staked_seconds = position
        .staked_amount
        .checked_mul(elapsed)
        .ok_or(ContractError::RewardOverflow)?;

    let (reward, remainder) = Decimal::raw(reward_rate)
        .checked_mul_int_with_remainder(staked_seconds)
        .ok_or(ContractError::RewardOverflow)?;
    // both parts are below 10^18
    let remainder = remainder + position.reward_remainder;

    let reward = reward
        .checked_add(remainder / ONE)
        .ok_or(ContractError::RewardOverflow)?;
    Ok((reward, remainder % ONE))
}

/// Reward accrued by the open part of `position` since `stake_started_at`:
/// `staked_amount * reward_rate * elapsed`, with the rate in `Decimal` atomics,
/// plus whatever the carried sub-unit remainder completes.
pub fn compute_reward(
    position: &StakePosition,
    reward_rate: u128,
    now: u64,
) -> Result<u128, ContractError> {
    accrue(position, reward_rate, now).map(|(reward, _)| reward)
}

/// Everything `position` would pay out if claimed at `now`.
pub fn pending_reward(
    position: &StakePosition,
    reward_rate: u128,
    now: u64,
) -> Result<u128, ContractError> {
    compute_reward(position, reward_rate, now)?
        .checked_add(position.unclaimed_reward)
        .ok_or(ContractError::RewardOverflow)
}

/// Folds the reward accrued so far into `unclaimed_reward` and restarts accrual at `now`.
///
/// Called before the staked amount changes, so a top-up never earns for the
/// time before it was deposited and a withdrawal keeps what was already earned.
/// The sub-unit remainder stays on the position for the next accrual.
pub fn checkpoint(
    position: &mut StakePosition,
    reward_rate: u128,
    now: u64,
) -> Result<(), ContractError> {
    if position.is_active {
        let (reward, remainder) = accrue(position, reward_rate, now)?;
        position.unclaimed_reward = position
            .unclaimed_reward
            .checked_add(reward)
            .ok_or(ContractError::RewardOverflow)?;
        position.reward_remainder = remainder;
        position.stake_started_at = now;
    }

    Ok(())
}

/// Like `checkpoint`, but an overflowing reward is capped at `u128::MAX` instead
/// of failing, so the staked amount can always be withdrawn.
///
/// Returns `true` when the reward had to be capped.
pub fn checkpoint_saturating(position: &mut StakePosition, reward_rate: u128, now: u64) -> bool {
    if checkpoint(position, reward_rate, now).is_ok() {
        return false;
    }
    position.unclaimed_reward = u128::MAX;
    position.reward_remainder = 0;
    position.stake_started_at = now;

    true
}
