#![no_std]
mod contract;
mod error;
mod ledger;
mod msg;
mod registry;
mod rewards;
mod storage;

pub use contract::{TokenFarm, TokenFarmClient};
pub use error::ContractError;
pub use ledger::StakePosition;
pub use msg::{ConfigResponse, PendingReward, PendingRewardsResponse};
pub use registry::TokenEntry;
pub use storage::Config;

pub mod token_contract {
    pub use soroban_sdk::token::Client;
}

#[cfg(test)]
extern crate std;
