//! Six-digit session join codes.

use log::debug;
use rand::Rng;

use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};

pub const MIN_JOIN_CODE: u32 = 100_000;
pub const MAX_JOIN_CODE: u32 = 999_999;

/// Attempts before giving up on finding a free code.
pub const MAX_ATTEMPTS: usize = 1_000;

/// Draw codes until one is not used by any session, active or not.
pub async fn generate_join_code<R>(repo: &dyn FullRepository, rng: &mut R) -> RepositoryResult<String>
where
    R: Rng + Send,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let code = rng.gen_range(MIN_JOIN_CODE..=MAX_JOIN_CODE).to_string();
        if !repo.session_code_exists(&code).await? {
            return Ok(code);
        }
        debug!("Join code {} already taken (attempt {})", code, attempt);
    }

    Err(RepositoryError::internal(format!(
        "No free join code after {} attempts",
        MAX_ATTEMPTS
    )))
}
