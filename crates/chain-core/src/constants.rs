pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const DEFAULT_DIFFICULTY_BYTES: usize = 2;
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;
