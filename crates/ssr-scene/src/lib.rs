//! ssr-scene: scene, source and parameter model for the SoundScape
//! Renderer remote.
//!
//! The crate keeps a local mirror of the renderer's spatial scene: sources
//! with dual-representation parameters (physical units and normalized host
//! automation values), a selection cursor, and the reconciliation of inbound
//! renderer update messages into that state. It knows nothing about sockets;
//! transport lives in ssr-connector.

mod error;
mod parameter;
mod scene;
mod source;
mod translate;
mod updates;

pub use error::*;
pub use parameter::*;
pub use scene::*;
pub use source::*;
pub use translate::*;

/// Decibel value wrapper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decibels(pub f32);

impl Decibels {
    pub const ZERO: Self = Self(0.0);
    pub const NEG_INF: Self = Self(f32::NEG_INFINITY);

    /// Convert linear gain to decibels.
    #[inline]
    pub fn from_gain(gain: f32) -> Self {
        if gain <= 0.0 {
            Self::NEG_INF
        } else {
            Self(20.0 * gain.log10())
        }
    }

    /// Convert decibels to linear gain. Values at or below -144 dB are
    /// treated as silence.
    #[inline]
    pub fn to_gain(self) -> f32 {
        if self.0 <= -144.0 {
            0.0
        } else {
            10.0_f32.powf(self.0 / 20.0)
        }
    }
}

impl Default for Decibels {
    fn default() -> Self {
        Self::ZERO
    }
}
