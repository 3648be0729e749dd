use farm::{
    ttl::{INSTANCE_RENEWAL_THRESHOLD, INSTANCE_TARGET_TTL},
    utils::OwnerChange,
};
use soroban_sdk::{contracttype, log, Address, Env};

use crate::error::ContractError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    // Token in which every staking reward is paid out
    pub reward_token: Address,
    // Upper bound on registered tokens; claims and `is_staking` walk all of them
    pub max_tokens: u32,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    Owner,
    PendingOwner,
    /// Registered token addresses in insertion order
    TokenList,
    Token(Address),
    /// (token, staker)
    Position(Address, Address),
    TotalStaked(Address),
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_RENEWAL_THRESHOLD, INSTANCE_TARGET_TTL);
}

pub fn save_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_config(env: &Env) -> Result<Config, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or_else(|| {
            log!(env, "TokenFarm: Config not set");
            ContractError::ConfigNotSet
        })
}

pub fn save_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_owner(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or_else(|| {
            log!(env, "TokenFarm: Owner not set");
            ContractError::OwnerNotSet
        })
}

pub fn save_pending_owner(env: &Env, change: &OwnerChange) {
    env.storage().instance().set(&DataKey::PendingOwner, change);
}

pub fn get_pending_owner(env: &Env) -> Option<OwnerChange> {
    env.storage().instance().get(&DataKey::PendingOwner)
}

pub fn remove_pending_owner(env: &Env) {
    env.storage().instance().remove(&DataKey::PendingOwner);
}
