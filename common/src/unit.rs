//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing a document issuance.
#[derive(Clone, Copy, Debug)]
pub struct Issue;
