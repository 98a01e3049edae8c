pub mod event;

pub use event::{ChangeEvent, DeletedRow, decode_change};

use serde::{Deserialize, Serialize};

/// One row of the remote `credentials` table. The backend stores the
/// password as an opaque string; no hashing or validation happens client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
}
