//! Keys to items stored in the databases.
//!
//! Each key is a [slotmap] key, and so contains an index together with a version to distinguish reuse of the same index.
//! In particular, the key of a clause removed from the clause store will not access some other clause stored in its place.

slotmap::new_key_type! {
    /// A key to access a signed clause stored in the clause store.
    pub struct ClauseKey;

    /// A key to access a propagator stored in the propagator database.
    pub struct PropagatorKey;

    /// A key to access a container of watchers stored in the clause store.
    pub struct ContainerKey;
}
