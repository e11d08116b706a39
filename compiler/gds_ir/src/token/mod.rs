//! Token types for the record stream.
//!
//! A token is immutable once the decoder produces it. Ownership moves
//! between rules through outcome queues; the engine never clones tokens.

use std::fmt;

/// Record-kind tag.
///
/// The domain is finite and totally ordered. GDSII record types fit in a
/// byte, but the tag is 16 bits wide so a decoder can fold the data-type
/// byte in when a grammar needs to distinguish them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct Kind(u16);

impl Kind {
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Kind(raw)
    }

    /// Raw tag value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for Kind {
    #[inline]
    fn from(raw: u16) -> Self {
        Kind(raw)
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({})", self.0)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One record from the input stream.
///
/// Equality compares payloads only. Two tokens with the same payload are
/// the same record as far as a grammar consumer is concerned, and the kind
/// is derived from the payload by the decoder anyway.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token<P> {
    kind: Kind,
    payload: P,
}

impl<P> Token<P> {
    #[inline]
    pub fn new(kind: Kind, payload: P) -> Self {
        Token { kind, payload }
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Consume the token, keeping only its payload.
    #[inline]
    pub fn into_payload(self) -> P {
        self.payload
    }
}

impl<P: PartialEq> PartialEq for Token<P> {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl<P: Eq> Eq for Token<P> {}

impl<P: fmt::Debug> fmt::Debug for Token<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.payload)
    }
}
