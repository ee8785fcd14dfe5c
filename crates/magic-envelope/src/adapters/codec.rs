//! XML payload codec.

use crate::ports::outbound::PayloadCodec;
use shared_types::{pack, unpack, Entity, EntityError};
use std::fmt;
use std::marker::PhantomData;

/// `PayloadCodec` for any `Entity`, using the flat XML payload format.
pub struct XmlEntityCodec<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E> XmlEntityCodec<E> {
    /// Create a codec for entity type `E`.
    pub fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E> Default for XmlEntityCodec<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for XmlEntityCodec<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: Entity> fmt::Debug for XmlEntityCodec<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlEntityCodec")
            .field("entity", &E::ENTITY_NAME)
            .finish()
    }
}

impl<E: Entity> PayloadCodec for XmlEntityCodec<E> {
    type Entity = E;

    fn serialize(&self, entity: &E) -> Result<Vec<u8>, EntityError> {
        pack(entity)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<E, EntityError> {
        unpack(bytes)
    }
}
