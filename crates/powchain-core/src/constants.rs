pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const DEFAULT_DIFFICULTY: u32 = 4;
/// Upper bound accepted at construction; ~16^10 expected trials per block.
pub const MAX_DIFFICULTY: u32 = 10;
pub const GENESIS_PAYLOAD: &str = "Genesis Block";
pub const GENESIS_PREVIOUS_DIGEST: &str = "0";
