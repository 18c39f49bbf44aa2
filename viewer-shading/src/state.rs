//! Product state decoding
//!
//! Every vertex carries a two-component state attribute: the product state in
//! component 0 and the restyle index in component 1. Both are integers that
//! travelled through a float attribute, so they are recovered with
//! round-half-up.

use shading_common::{STATE_HIGHLIGHTED, round_half_up};

/// Product visibility states understood by the viewer
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProductState {
    /// Visible, not highlighted
    Undefined = 255,
    Hidden = 254,
    Highlighted = 253,
    XRayVisible = 252,
    PickingOnly = 251,
}

impl ProductState {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            255 => Some(ProductState::Undefined),
            254 => Some(ProductState::Hidden),
            253 => Some(ProductState::Highlighted),
            252 => Some(ProductState::XRayVisible),
            251 => Some(ProductState::PickingOnly),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// State attribute after reconstruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodedState {
    pub state: i32,
    pub restyle: i32,
}

impl DecodedState {
    /// Whether the vertex survives the highlight filter
    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.state == STATE_HIGHLIGHTED as i32
    }

    /// The named product state, if the value is one
    pub fn product_state(&self) -> Option<ProductState> {
        u8::try_from(self.state).ok().and_then(ProductState::from_u8)
    }
}

/// Recover state and restyle index from a packed attribute
#[inline]
pub fn decode_state(attr: [f32; 2]) -> DecodedState {
    DecodedState {
        state: round_half_up(attr[0]),
        restyle: round_half_up(attr[1]),
    }
}
