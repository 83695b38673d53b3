// # Profile Group
//
// A parent identity together with the identities it manages. Two groups are
// the same group when they cover the same identities, whichever one was
// recorded as the parent.
//
// ## Serialized Form
//
// ```json
// { "parent": 0, "managed": [10, 11] }
// ```
//
// `managed` may be omitted for a group with a single identity.

use crate::model::IdentityRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A set of related identities used to scope change notifications
///
/// Immutable once constructed. Equality and hashing are by identity-set
/// membership, so a group can key a map of per-group subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ProfileGroupRepr", into = "ProfileGroupRepr")]
pub struct ProfileGroup {
    parent: IdentityRef,
    /// Never contains `parent`
    managed: BTreeSet<IdentityRef>,
}

impl ProfileGroup {
    /// Create a group from a parent identity and its managed identities
    ///
    /// Repeated managed identities, or a managed entry equal to the parent,
    /// are collapsed.
    pub fn new(parent: IdentityRef, managed: impl IntoIterator<Item = IdentityRef>) -> Self {
        let managed = managed.into_iter().filter(|id| *id != parent).collect();
        Self { parent, managed }
    }

    /// Create a group containing only `identity`
    pub fn single(identity: IdentityRef) -> Self {
        Self {
            parent: identity,
            managed: BTreeSet::new(),
        }
    }

    /// The parent identity of the group
    pub fn parent(&self) -> IdentityRef {
        self.parent
    }

    /// Managed identities, sorted, parent excluded
    pub fn managed(&self) -> impl Iterator<Item = IdentityRef> + '_ {
        self.managed.iter().copied()
    }

    /// Whether `identity` belongs to this group
    pub fn contains(&self, identity: IdentityRef) -> bool {
        self.parent == identity || self.managed.contains(&identity)
    }

    /// Every identity in the group, parent included, sorted
    pub fn identities(&self) -> BTreeSet<IdentityRef> {
        let mut all = self.managed.clone();
        all.insert(self.parent);
        all
    }

    /// Number of identities in the group
    pub fn len(&self) -> usize {
        self.managed.len() + 1
    }

    /// Always `false`: a group holds at least its parent
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl PartialEq for ProfileGroup {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && other.contains(self.parent)
            && self.managed.iter().all(|id| other.contains(*id))
    }
}

impl Eq for ProfileGroup {}

impl Hash for ProfileGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Walk the identities in sorted order, parent merged in, so groups
        // with a different parent but the same members hash alike
        state.write_usize(self.len());
        let mut parent = Some(self.parent);
        for id in &self.managed {
            if let Some(p) = parent.filter(|p| p < id) {
                p.hash(state);
                parent = None;
            }
            id.hash(state);
        }
        if let Some(p) = parent {
            p.hash(state);
        }
    }
}

impl fmt::Display for ProfileGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group({}", self.parent)?;
        let mut managed = self.managed.iter();
        if let Some(first) = managed.next() {
            write!(f, "; {first}")?;
            for id in managed {
                write!(f, ",{id}")?;
            }
        }
        write!(f, ")")
    }
}

#[derive(Serialize, Deserialize)]
struct ProfileGroupRepr {
    parent: IdentityRef,
    #[serde(default)]
    managed: Vec<IdentityRef>,
}

impl From<ProfileGroupRepr> for ProfileGroup {
    fn from(repr: ProfileGroupRepr) -> Self {
        ProfileGroup::new(repr.parent, repr.managed)
    }
}

impl From<ProfileGroup> for ProfileGroupRepr {
    fn from(group: ProfileGroup) -> Self {
        Self {
            parent: group.parent,
            managed: group.managed.into_iter().collect(),
        }
    }
}
