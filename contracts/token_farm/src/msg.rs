use soroban_sdk::{contracttype, Address, Vec};

use crate::storage::Config;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigResponse {
    pub config: Config,
}

#[contracttype]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PendingReward {
    /// Staked token the reward was earned on
    pub token: Address,
    /// Amount of reward token, in its smallest unit
    pub amount: u128,
}

#[contracttype]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PendingRewardsResponse {
    /// Per staked token, only tokens with a non-zero reward are listed.
    pub rewards: Vec<PendingReward>,
    /// What `claim_rewards` would pay out right now.
    pub total: u128,
}
