use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    NotOwner = 1,
    AlreadyAllowed = 2,
    TokenNotAllowed = 3,
    ZeroAmount = 4,
    InsufficientStake = 5,
    TransferFailed = 6,
    RewardOverflow = 7,
    AmountOutOfRange = 8,
    ContractMathError = 9,
    TokenNotRegistered = 10,
    TooManyTokens = 11,
    InvalidMaxTokens = 12,
    ConfigNotSet = 13,
    OwnerNotSet = 14,
    SameOwner = 15,
    NoOwnerChangeInPlace = 16,
    OwnerChangeExpired = 17,
}
