//! API client facades.
//!
//! One module per upstream service. Each client owns its caches and its
//! gateway exclusively; public methods collapse every failure into `None`,
//! matching what the presentation layer can act on ("item/price
//! unavailable").

pub mod universalis;
pub mod xivapi;
