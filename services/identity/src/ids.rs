//! Short random identifiers for users and permission sets

use rand::{Rng, distributions::Alphanumeric};

/// Length of generated user identifiers
pub const USER_ID_LEN: usize = 10;

/// Length of generated permission identifiers
pub const PERMISSION_ID_LEN: usize = 8;

/// Generate a random alphanumeric identifier of the given length.
pub fn nano_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
