use farm::utils::OwnerChange;
use soroban_sdk::{
    contract, contractimpl, contractmeta, log, panic_with_error, Address, Env, Vec,
};

use crate::{
    error::ContractError,
    ledger::{self, StakePosition},
    msg::{ConfigResponse, PendingReward, PendingRewardsResponse},
    registry::{self, TokenEntry},
    rewards,
    storage::{
        bump_instance, get_config, get_owner, get_pending_owner, remove_pending_owner,
        save_config, save_owner, save_pending_owner, Config,
    },
    token_contract,
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "Token farm: stake allowed tokens and earn rewards"
);

#[contract]
pub struct TokenFarm;

pub trait TokenFarmTrait {
    // Allows `token` to be staked, earning `reward_rate` (Decimal atomics) reward units
    // per staked unit per second. Returns the registry index of the token.
    fn register_token(
        env: Env,
        sender: Address,
        token: Address,
        reward_rate: u128,
    ) -> Result<u32, ContractError>;

    fn disallow_token(env: Env, sender: Address, token: Address) -> Result<(), ContractError>;

    fn stake(env: Env, sender: Address, token: Address, amount: u128) -> Result<(), ContractError>;

    fn unstake(env: Env, sender: Address, token: Address, amount: u128)
        -> Result<(), ContractError>;

    // Pays out every reward the sender has earned, over all tokens, in the reward token.
    fn claim_rewards(env: Env, sender: Address) -> Result<u128, ContractError>;

    fn propose_owner(
        env: Env,
        new_owner: Address,
        time_limit: Option<u64>,
    ) -> Result<Address, ContractError>;

    fn revoke_owner_change(env: Env) -> Result<(), ContractError>;

    fn accept_owner(env: Env) -> Result<Address, ContractError>;

    // QUERIES

    fn query_config(env: Env) -> Result<ConfigResponse, ContractError>;

    fn query_owner(env: Env) -> Result<Address, ContractError>;

    fn query_reward_token(env: Env) -> Result<Address, ContractError>;

    fn is_token_allowed(env: Env, token: Address) -> bool;

    fn query_token(env: Env, token: Address) -> Option<TokenEntry>;

    fn query_tokens(env: Env) -> Vec<TokenEntry>;

    fn query_staking_balance(env: Env, token: Address, staker: Address) -> u128;

    fn query_staking_start_time(env: Env, token: Address, staker: Address) -> u64;

    fn is_staking(env: Env, staker: Address) -> bool;

    fn query_position(env: Env, token: Address, staker: Address) -> StakePosition;

    fn query_total_staked(env: Env, token: Address) -> u128;

    fn query_pending_rewards(env: Env, staker: Address)
        -> Result<PendingRewardsResponse, ContractError>;
}

#[contractimpl]
impl TokenFarmTrait for TokenFarm {
    fn register_token(
        env: Env,
        sender: Address,
        token: Address,
        reward_rate: u128,
    ) -> Result<u32, ContractError> {
        sender.require_auth();
        require_owner(&env, &sender)?;
        bump_instance(&env);

        let config = get_config(&env)?;
        let index = registry::register(&env, &token, reward_rate, config.max_tokens)?;

        env.events().publish(("register_token", "token"), &token);
        env.events()
            .publish(("register_token", "reward_rate"), reward_rate);
        env.events().publish(("register_token", "index"), index);

        Ok(index)
    }

    fn disallow_token(env: Env, sender: Address, token: Address) -> Result<(), ContractError> {
        sender.require_auth();
        require_owner(&env, &sender)?;
        bump_instance(&env);

        registry::disallow(&env, &token)?;

        env.events().publish(("disallow_token", "token"), &token);

        Ok(())
    }

    fn stake(env: Env, sender: Address, token: Address, amount: u128) -> Result<(), ContractError> {
        sender.require_auth();
        bump_instance(&env);

        if amount == 0 {
            log!(&env, "TokenFarm: Stake: amount must be bigger than 0");
            return Err(ContractError::ZeroAmount);
        }
        let entry = match registry::get_token_entry(&env, &token) {
            Some(entry) if entry.is_allowed => entry,
            _ => {
                log!(&env, "TokenFarm: Stake: token {} is not allowed", token);
                return Err(ContractError::TokenNotAllowed);
            }
        };
        let token_amount = to_token_amount(&env, amount)?;

        let now = env.ledger().timestamp();
        let mut position = ledger::get_position(&env, &token, &sender);
        rewards::checkpoint(&mut position, entry.reward_rate, now)?;
        position.open_or_increase(amount, now)?;
        let total_staked = ledger::get_total_staked(&env, &token)
            .checked_add(amount)
            .ok_or(ContractError::ContractMathError)?;

        // Funds have to be in custody before the ledger records them.
        transfer_tokens(
            &env,
            &token,
            &sender,
            &env.current_contract_address(),
            token_amount,
        )?;

        ledger::save_position(&env, &token, &sender, &position);
        ledger::save_total_staked(&env, &token, total_staked);

        env.events().publish(("stake", "user"), &sender);
        env.events().publish(("stake", "token"), &token);
        env.events().publish(("stake", "amount"), amount);

        Ok(())
    }

    fn unstake(
        env: Env,
        sender: Address,
        token: Address,
        amount: u128,
    ) -> Result<(), ContractError> {
        sender.require_auth();
        bump_instance(&env);

        if amount == 0 {
            log!(&env, "TokenFarm: Unstake: amount must be bigger than 0");
            return Err(ContractError::ZeroAmount);
        }
        let mut position = ledger::get_position(&env, &token, &sender);
        if position.staked_amount < amount {
            log!(
                &env,
                "TokenFarm: Unstake: trying to unstake {} while only {} is staked",
                amount,
                position.staked_amount
            );
            return Err(ContractError::InsufficientStake);
        }
        let token_amount = to_token_amount(&env, amount)?;

        let now = env.ledger().timestamp();
        // Disallowed tokens keep their rate so their stakers can still unwind.
        // Withdrawing the stake never depends on the reward fitting.
        let reward_rate = registry::reward_rate(&env, &token);
        if rewards::checkpoint_saturating(&mut position, reward_rate, now) {
            log!(
                &env,
                "TokenFarm: Unstake: reward on {} overflows, capping it at the maximum",
                token
            );
        }
        position.decrease_or_close(amount)?;
        let total_staked = ledger::get_total_staked(&env, &token)
            .checked_sub(amount)
            .ok_or(ContractError::ContractMathError)?;

        transfer_tokens(
            &env,
            &token,
            &env.current_contract_address(),
            &sender,
            token_amount,
        )?;

        ledger::save_position(&env, &token, &sender, &position);
        ledger::save_total_staked(&env, &token, total_staked);

        env.events().publish(("unstake", "user"), &sender);
        env.events().publish(("unstake", "token"), &token);
        env.events().publish(("unstake", "amount"), amount);

        Ok(())
    }

    fn claim_rewards(env: Env, sender: Address) -> Result<u128, ContractError> {
        sender.require_auth();
        bump_instance(&env);

        let config = get_config(&env)?;
        let now = env.ledger().timestamp();
        let pending = collect_pending_rewards(&env, &sender, now)?;

        if pending.total == 0 {
            return Ok(0);
        }

        // Staked reward tokens belong to their stakers and cannot be paid out as rewards.
        let held = token_balance(&env, &config.reward_token)?;
        let available = held.saturating_sub(ledger::get_total_staked(&env, &config.reward_token));
        if available < pending.total {
            log!(
                &env,
                "TokenFarm: Claim rewards: reward reserve of {} can not cover {}",
                available,
                pending.total
            );
            return Err(ContractError::TransferFailed);
        }

        transfer_tokens(
            &env,
            &config.reward_token,
            &env.current_contract_address(),
            &sender,
            to_token_amount(&env, pending.total)?,
        )?;

        for reward in pending.rewards.iter() {
            let mut position = ledger::get_position(&env, &reward.token, &sender);
            // Keeps the sub-unit remainder on the position for the next claim.
            rewards::checkpoint(
                &mut position,
                registry::reward_rate(&env, &reward.token),
                now,
            )?;
            position.unclaimed_reward = 0;
            ledger::save_position(&env, &reward.token, &sender, &position);
        }

        env.events().publish(("claim_rewards", "user"), &sender);
        env.events()
            .publish(("claim_rewards", "token"), &config.reward_token);
        env.events()
            .publish(("claim_rewards", "amount"), pending.total);

        Ok(pending.total)
    }

    fn propose_owner(
        env: Env,
        new_owner: Address,
        time_limit: Option<u64>,
    ) -> Result<Address, ContractError> {
        let current_owner = get_owner(&env)?;
        current_owner.require_auth();
        bump_instance(&env);

        if current_owner == new_owner {
            log!(&env, "TokenFarm: Propose owner: new owner is the current owner");
            return Err(ContractError::SameOwner);
        }

        save_pending_owner(
            &env,
            &OwnerChange {
                new_owner: new_owner.clone(),
                time_limit,
            },
        );

        env.events().publish(("propose_owner", "new_owner"), &new_owner);

        Ok(new_owner)
    }

    fn revoke_owner_change(env: Env) -> Result<(), ContractError> {
        let current_owner = get_owner(&env)?;
        current_owner.require_auth();
        bump_instance(&env);

        if get_pending_owner(&env).is_none() {
            log!(&env, "TokenFarm: Revoke owner change: no owner change in place");
            return Err(ContractError::NoOwnerChangeInPlace);
        }
        remove_pending_owner(&env);

        env.events().publish(("revoke_owner_change", "owner"), &current_owner);

        Ok(())
    }

    fn accept_owner(env: Env) -> Result<Address, ContractError> {
        let change = get_pending_owner(&env).ok_or_else(|| {
            log!(&env, "TokenFarm: Accept owner: no owner change in place");
            ContractError::NoOwnerChangeInPlace
        })?;
        change.new_owner.require_auth();
        bump_instance(&env);

        if change.is_expired(env.ledger().timestamp()) {
            log!(&env, "TokenFarm: Accept owner: owner change expired");
            return Err(ContractError::OwnerChangeExpired);
        }

        remove_pending_owner(&env);
        save_owner(&env, &change.new_owner);

        env.events()
            .publish(("accept_owner", "new_owner"), &change.new_owner);

        Ok(change.new_owner)
    }

    // QUERIES

    fn query_config(env: Env) -> Result<ConfigResponse, ContractError> {
        Ok(ConfigResponse {
            config: get_config(&env)?,
        })
    }

    fn query_owner(env: Env) -> Result<Address, ContractError> {
        get_owner(&env)
    }

    fn query_reward_token(env: Env) -> Result<Address, ContractError> {
        Ok(get_config(&env)?.reward_token)
    }

    fn is_token_allowed(env: Env, token: Address) -> bool {
        registry::is_allowed(&env, &token)
    }

    fn query_token(env: Env, token: Address) -> Option<TokenEntry> {
        registry::get_token_entry(&env, &token)
    }

    fn query_tokens(env: Env) -> Vec<TokenEntry> {
        registry::entries(&env)
    }

    fn query_staking_balance(env: Env, token: Address, staker: Address) -> u128 {
        ledger::get_balance(&env, &token, &staker)
    }

    fn query_staking_start_time(env: Env, token: Address, staker: Address) -> u64 {
        ledger::get_start_time(&env, &token, &staker)
    }

    fn is_staking(env: Env, staker: Address) -> bool {
        ledger::is_staking(&env, &staker)
    }

    fn query_position(env: Env, token: Address, staker: Address) -> StakePosition {
        ledger::get_position(&env, &token, &staker)
    }

    fn query_total_staked(env: Env, token: Address) -> u128 {
        ledger::get_total_staked(&env, &token)
    }

    fn query_pending_rewards(
        env: Env,
        staker: Address,
    ) -> Result<PendingRewardsResponse, ContractError> {
        let now = env.ledger().timestamp();
        collect_pending_rewards(&env, &staker, now)
    }
}

#[contractimpl]
impl TokenFarm {
    pub fn __constructor(env: Env, owner: Address, reward_token: Address, max_tokens: u32) {
        if max_tokens == 0 {
            log!(
                &env,
                "TokenFarm: Initialize: at least one token has to be registrable"
            );
            panic_with_error!(&env, ContractError::InvalidMaxTokens);
        }

        save_owner(&env, &owner);
        save_config(
            &env,
            &Config {
                reward_token: reward_token.clone(),
                max_tokens,
            },
        );

        env.events()
            .publish(("initialize", "Token farm with owner"), &owner);
        env.events()
            .publish(("initialize", "reward token"), &reward_token);
    }
}

fn require_owner(env: &Env, sender: &Address) -> Result<(), ContractError> {
    if get_owner(env)? != *sender {
        log!(env, "TokenFarm: caller is not the owner");
        return Err(ContractError::NotOwner);
    }

    Ok(())
}

/// Pending reward of `staker` on every registered token, allowed or not.
fn collect_pending_rewards(
    env: &Env,
    staker: &Address,
    now: u64,
) -> Result<PendingRewardsResponse, ContractError> {
    let mut rewards = Vec::new(env);
    let mut total = 0u128;

    for entry in registry::entries(env).iter() {
        let position = ledger::get_position(env, &entry.token, staker);
        let amount = rewards::pending_reward(&position, entry.reward_rate, now)?;
        if amount == 0 {
            continue;
        }
        total = total
            .checked_add(amount)
            .ok_or(ContractError::RewardOverflow)?;
        rewards.push_back(PendingReward {
            token: entry.token,
            amount,
        });
    }

    Ok(PendingRewardsResponse { rewards, total })
}

// The token interface counts in i128.
fn to_token_amount(env: &Env, amount: u128) -> Result<i128, ContractError> {
    i128::try_from(amount).map_err(|_| {
        log!(env, "TokenFarm: amount {} does not fit a token transfer", amount);
        ContractError::AmountOutOfRange
    })
}

fn token_balance(env: &Env, token: &Address) -> Result<u128, ContractError> {
    let client = token_contract::Client::new(env, token);
    match client.try_balance(&env.current_contract_address()) {
        Ok(Ok(balance)) => Ok(u128::try_from(balance).unwrap_or(0)),
        _ => {
            log!(env, "TokenFarm: balance query of {} failed", token);
            Err(ContractError::TransferFailed)
        }
    }
}

fn transfer_tokens(
    env: &Env,
    token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    let client = token_contract::Client::new(env, token);
    match client.try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(
                env,
                "TokenFarm: transfer of {} {} from {} to {} failed",
                amount,
                token,
                from,
                to
            );
            Err(ContractError::TransferFailed)
        }
    }
}
