// Ledgers are closed roughly every 5 seconds.
pub const DAY_IN_LEDGERS: u32 = 17280;

// Instance storage (config, owner, token list) lives as long as the contract is used.
// Once the TTL drops under the renewal threshold it is bumped back to the target.
pub const INSTANCE_TARGET_TTL: u32 = 7 * DAY_IN_LEDGERS;
pub const INSTANCE_RENEWAL_THRESHOLD: u32 = INSTANCE_TARGET_TTL - DAY_IN_LEDGERS;

// Persistent entries (token entries, stake positions, totals) are bumped on every touch.
pub const PERSISTENT_TARGET_TTL: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_RENEWAL_THRESHOLD: u32 = PERSISTENT_TARGET_TTL - DAY_IN_LEDGERS;
