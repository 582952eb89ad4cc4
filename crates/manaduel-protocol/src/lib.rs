//! Wire protocol for Manaduel.
//!
//! This crate defines the "language" the session engine speaks:
//!
//! - **Identity** ([`PlayerId`], [`SessionId`], [`CardId`]) — newtype
//!   ids used across every layer.
//! - **Catalog** ([`CatalogCard`], [`CardCatalog`]) — immutable card
//!   reference data, read-only to the engine.
//! - **Commands and events** ([`ClientCommand`], [`ServerEvent`]) — the
//!   named messages players send and the engine emits.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages are
//!   converted to/from bytes at the transport boundary.
//!
//! The protocol layer knows nothing about connections, sessions, or
//! game rules — it only defines the shapes that travel on the wire.

mod catalog;
mod codec;
mod error;
mod message;
mod types;

pub use catalog::{CardCatalog, CardId, CatalogCard};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{
    ClientCommand, DraftPickView, PlayerBoard, ServerEvent, FIELD_SLOTS,
};
pub use types::{FieldCard, PlayerId, Recipient, SessionId};
