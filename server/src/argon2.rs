use crate::{
  constants::{ARGON2_CONFIG, ARGON2_SALT_LEN},
  error::*,
};
use rand::{distributions::Alphanumeric, Rng, RngCore};

/// Hash a user password into an argon2id PHC string with a fresh random salt
pub fn generate_argon2(password: &str) -> Result<String> {
  let mut salt = [0u8; ARGON2_SALT_LEN];
  rand::thread_rng().fill_bytes(&mut salt);
  argon2::hash_encoded(password.as_bytes(), &salt, &ARGON2_CONFIG)
    .map_err(|e| anyhow!("Failed to hash password: {e}"))
}

/// Check a password against a stored hash. A malformed hash is an error, not a mismatch.
pub fn verify_argon2(password: &str, encoded_hash: &str) -> Result<bool> {
  argon2::verify_encoded(encoded_hash, password.as_bytes()).map_err(|e| anyhow!("Malformed password hash: {e}"))
}

/// Alphanumeric password for users provisioned without one
pub fn generate_random_string(length: usize) -> Result<String> {
  ensure!(length > 0, "Random string length must be positive");
  let generated = rand::thread_rng()
    .sample_iter(&Alphanumeric)
    .take(length)
    .map(char::from)
    .collect();
  Ok(generated)
}
