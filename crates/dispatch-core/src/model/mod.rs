// # Data Model
//
// Scoping types passed through the dispatcher. None of them has a lifecycle
// of its own: callers build them, hand them to the dispatcher, and drop them.
//
// - [`IdentityRef`]: a single user identity
// - [`ProfileGroup`]: a parent identity plus its managed identities
// - [`ChangeNotice`]: what changed, at identity, group or multi-group scope

pub mod group;
pub mod identity;
pub mod notice;

pub use group::ProfileGroup;
pub use identity::IdentityRef;
pub use notice::ChangeNotice;
