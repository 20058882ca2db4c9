//! Data models representing stored documents and write acknowledgements.

/// Coffee document, identifier and acknowledgement types
pub mod coffee;
