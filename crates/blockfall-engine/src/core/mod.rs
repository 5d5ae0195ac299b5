pub use self::{board::*, piece::*, piece_kind::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod piece_kind;
