use crate::model::{IdentityRef, ProfileGroup};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// What changed, and at which granularity
///
/// A notice is never stored: it is built by the caller, routed by
/// [`ChangeDispatcher::notify`](crate::ChangeDispatcher::notify), and dropped.
///
/// # Serialized Form
///
/// ```json
/// { "scope": "identity", "group": { "parent": 0, "managed": [10] }, "identity": 10 }
/// { "scope": "group", "group": { "parent": 0 } }
/// { "scope": "groups", "groups": [{ "parent": 0 }, { "parent": 11 }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ChangeNotice {
    /// A change affecting one identity inside a group
    Identity {
        /// Group the identity belongs to
        group: ProfileGroup,
        /// The affected identity
        identity: IdentityRef,
    },

    /// A change affecting a whole group
    Group {
        /// The affected group
        group: ProfileGroup,
    },

    /// A change affecting several groups, dispatched in order
    Groups {
        /// Affected groups; duplicates are kept
        groups: Vec<ProfileGroup>,
    },
}

impl ChangeNotice {
    /// Identity-scoped notice
    pub fn identity(group: ProfileGroup, identity: IdentityRef) -> Self {
        Self::Identity { group, identity }
    }

    /// Group-scoped notice
    pub fn group(group: ProfileGroup) -> Self {
        Self::Group { group }
    }

    /// Multi-group notice
    pub fn groups(groups: impl IntoIterator<Item = ProfileGroup>) -> Self {
        Self::Groups {
            groups: groups.into_iter().collect(),
        }
    }

    /// Whether an identity-scoped notice names an identity of its own group
    ///
    /// The dispatcher never checks this. Callers that build notices from
    /// untrusted input should.
    pub fn is_consistent(&self) -> bool {
        match self {
            Self::Identity { group, identity } => group.contains(*identity),
            Self::Group { .. } | Self::Groups { .. } => true,
        }
    }

    /// Like [`is_consistent`](Self::is_consistent), reporting the offending
    /// identity as `Error::InvalidInput`
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Identity { group, identity } if !group.contains(*identity) => Err(
                Error::invalid_input(format!("identity {identity} is not in {group}")),
            ),
            _ => Ok(()),
        }
    }

    /// Number of groups the notice touches
    pub fn group_count(&self) -> usize {
        match self {
            Self::Identity { .. } | Self::Group { .. } => 1,
            Self::Groups { groups } => groups.len(),
        }
    }
}
