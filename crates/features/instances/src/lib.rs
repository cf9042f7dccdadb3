//! # Item Instances
//!
//! An [`ItemInstance`](zitems_domain::instance::ItemInstance) references its template by key
//! and carries only per-instance overrides. The [`ItemFactory`] creates instances against the
//! active catalog, validates overrides, and turns instances back into renderable
//! [`ItemView`]s after looking their template up again.
//!
//! Hosts persist instances as opaque bytes produced by [`codec::serialize`].

pub mod codec;
mod error;
mod factory;

pub use error::{InstanceError, InstanceErrorExt};
pub use factory::{ItemFactory, ItemView};
