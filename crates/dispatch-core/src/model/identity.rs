use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a single user identity
///
/// Only meaningful next to the [`ProfileGroup`](super::ProfileGroup) it
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityRef(u32);

impl IdentityRef {
    /// Create an identity reference from its raw id
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw id
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for IdentityRef {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for IdentityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_id_round_trip() {
        let id = IdentityRef::from(10);
        assert_eq!(id.get(), 10);
        assert_eq!(id, IdentityRef::new(10));
        assert_eq!(serde_json::to_string(&id).unwrap(), "10");
    }
}
