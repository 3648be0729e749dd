use farm::ttl::{PERSISTENT_RENEWAL_THRESHOLD, PERSISTENT_TARGET_TTL};
use soroban_sdk::{contracttype, log, Address, Env, Vec};

use crate::{error::ContractError, storage::DataKey};

/// A token the owner has approved for staking.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenEntry {
    pub token: Address,
    /// Reward-token units paid per staked unit per second, as `Decimal` atomics (10^18 = 1.0)
    pub reward_rate: u128,
    pub is_allowed: bool,
    /// Position in the registry, assigned on first registration and never changed
    pub index: u32,
}

pub fn get_token_list(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::TokenList)
        .unwrap_or_else(|| Vec::new(env))
}

fn save_token_list(env: &Env, tokens: &Vec<Address>) {
    env.storage().instance().set(&DataKey::TokenList, tokens);
}

pub fn get_token_entry(env: &Env, token: &Address) -> Option<TokenEntry> {
    let key = DataKey::Token(token.clone());
    let entry = env.storage().persistent().get(&key);
    env.storage().persistent().has(&key).then(|| {
        env.storage().persistent().extend_ttl(
            &key,
            PERSISTENT_RENEWAL_THRESHOLD,
            PERSISTENT_TARGET_TTL,
        )
    });

    entry
}

fn save_token_entry(env: &Env, entry: &TokenEntry) {
    let key = DataKey::Token(entry.token.clone());
    env.storage().persistent().set(&key, entry);
    env.storage().persistent().extend_ttl(
        &key,
        PERSISTENT_RENEWAL_THRESHOLD,
        PERSISTENT_TARGET_TTL,
    );
}

pub fn is_allowed(env: &Env, token: &Address) -> bool {
    get_token_entry(env, token).is_some_and(|entry| entry.is_allowed)
}

/// Reward rate of a registered token, zero for unknown tokens.
pub fn reward_rate(env: &Env, token: &Address) -> u128 {
    get_token_entry(env, token).map_or(0, |entry| entry.reward_rate)
}

/// Allows `token` for staking and returns its registry index.
///
/// A new token is appended at the end of the registry. A token that was
/// registered before and later disallowed gets re-enabled under its original
/// index with the new rate.
pub fn register(
    env: &Env,
    token: &Address,
    reward_rate: u128,
    max_tokens: u32,
) -> Result<u32, ContractError> {
    if let Some(mut entry) = get_token_entry(env, token) {
        if entry.is_allowed {
            log!(env, "TokenFarm: Register token: token already allowed");
            return Err(ContractError::AlreadyAllowed);
        }
        entry.is_allowed = true;
        entry.reward_rate = reward_rate;
        save_token_entry(env, &entry);
        return Ok(entry.index);
    }

    let mut tokens = get_token_list(env);
    let index = tokens.len();
    if index >= max_tokens {
        log!(
            env,
            "TokenFarm: Register token: registry is full with {} tokens",
            index
        );
        return Err(ContractError::TooManyTokens);
    }

    save_token_entry(
        env,
        &TokenEntry {
            token: token.clone(),
            reward_rate,
            is_allowed: true,
            index,
        },
    );
    tokens.push_back(token.clone());
    save_token_list(env, &tokens);

    Ok(index)
}

/// Stops new stakes of `token`. Existing positions keep earning and can be unstaked.
pub fn disallow(env: &Env, token: &Address) -> Result<TokenEntry, ContractError> {
    let mut entry = get_token_entry(env, token).ok_or_else(|| {
        log!(env, "TokenFarm: Disallow token: token was never registered");
        ContractError::TokenNotRegistered
    })?;
    if !entry.is_allowed {
        log!(env, "TokenFarm: Disallow token: token is already disallowed");
        return Err(ContractError::TokenNotAllowed);
    }

    entry.is_allowed = false;
    save_token_entry(env, &entry);

    Ok(entry)
}

/// Every registered entry, allowed or not, in index order.
pub fn entries(env: &Env) -> Vec<TokenEntry> {
    let mut entries = Vec::new(env);
    for token in get_token_list(env).iter() {
        if let Some(entry) = get_token_entry(env, &token) {
            entries.push_back(entry);
        }
    }

    entries
}
