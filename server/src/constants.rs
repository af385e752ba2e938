pub const THREAD_NAME: &str = "claim_admin";
pub const BIN_NAME: &str = "claim-admin";

/// Default location of the service credential file
pub const DEFAULT_CREDENTIALS_PATH: &str = "./serviceAccountKey.json";

// Database settings
pub const USER_TABLE_NAME: &str = "users";

/// Number of user records requested per page when scanning the whole directory
pub const LIST_USERS_PAGE_SIZE: u32 = 1000;

/// Default password length when random password is needed at the user creation.
pub const PASSWORD_LEN: usize = 32;

/// Lifetime of a session token issued by the local provider in minutes
pub const SESSION_TOKEN_DURATION_MINS: i64 = 60;

// Argon2 password hashing params
use argon2::{Config, Variant, Version};
pub const ARGON2_CONFIG: Config = Config {
  variant: Variant::Argon2id,
  version: Version::Version13,
  mem_cost: 4096,
  time_cost: 3,
  lanes: 4,
  secret: &[],
  ad: &[],
  hash_length: 32,
};
pub const ARGON2_SALT_LEN: usize = 32;
