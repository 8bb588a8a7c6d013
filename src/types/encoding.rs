//! Body encoding options.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// How argument maps become a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// `application/x-www-form-urlencoded`
    #[default]
    FormUrlEncoded,
    /// `multipart/form-data`
    MultipartFormData,
}

impl Encoding {
    fn to_bits(self) -> u8 {
        match self {
            Encoding::FormUrlEncoded => 0,
            Encoding::MultipartFormData => 1,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits {
            1 => Encoding::MultipartFormData,
            _ => Encoding::FormUrlEncoded,
        }
    }
}

/// An [`Encoding`] that can be swapped while invocations are in flight.
///
/// Readers get one whole mode per load; a body is never encoded with a mix.
#[derive(Debug, Default)]
pub struct AtomicEncoding(AtomicU8);

impl AtomicEncoding {
    pub fn new(encoding: Encoding) -> Self {
        Self(AtomicU8::new(encoding.to_bits()))
    }

    pub fn load(&self) -> Encoding {
        Encoding::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, encoding: Encoding) {
        self.0.store(encoding.to_bits(), Ordering::Release);
    }
}
