use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use super::piece::Coord;

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

/// Uniform draw over the seven kinds.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

/// Display color tag of a piece kind, as 8-bit RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PieceColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Static definition of a piece kind.
///
/// Cell coordinates are relative to the top-left of the shape's bounding box
/// (`x` is the column, `y` the row). `pivot` is the point the shape rotates
/// around, in the same coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    pub cells: [Coord; 4],
    pub pivot: Coord,
    pub color: PieceColor,
    pub rotatable: bool,
}

const fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

const SHAPES: [PieceShape; PieceKind::LEN] = [
    // I
    PieceShape {
        cells: [c(0, 0), c(1, 0), c(2, 0), c(3, 0)],
        pivot: c(1, 0),
        color: PieceColor::rgb(0, 240, 240),
        rotatable: true,
    },
    // J
    PieceShape {
        cells: [c(0, 0), c(0, 1), c(1, 1), c(2, 1)],
        pivot: c(1, 1),
        color: PieceColor::rgb(0, 0, 240),
        rotatable: true,
    },
    // L
    PieceShape {
        cells: [c(2, 0), c(0, 1), c(1, 1), c(2, 1)],
        pivot: c(1, 1),
        color: PieceColor::rgb(240, 160, 0),
        rotatable: true,
    },
    // O
    PieceShape {
        cells: [c(0, 0), c(1, 0), c(0, 1), c(1, 1)],
        pivot: c(1, 1),
        color: PieceColor::rgb(240, 240, 0),
        rotatable: false,
    },
    // S
    PieceShape {
        cells: [c(1, 0), c(2, 0), c(0, 1), c(1, 1)],
        pivot: c(1, 1),
        color: PieceColor::rgb(0, 240, 0),
        rotatable: true,
    },
    // T
    PieceShape {
        cells: [c(1, 0), c(0, 1), c(1, 1), c(2, 1)],
        pivot: c(1, 1),
        color: PieceColor::rgb(160, 0, 240),
        rotatable: true,
    },
    // Z
    PieceShape {
        cells: [c(0, 0), c(1, 0), c(1, 1), c(2, 1)],
        pivot: c(1, 1),
        color: PieceColor::rgb(240, 0, 0),
        rotatable: true,
    },
];

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    #[must_use]
    pub const fn shape(self) -> &'static PieceShape {
        &SHAPES[self as usize]
    }

    #[must_use]
    pub const fn color(self) -> PieceColor {
        self.shape().color
    }

    #[must_use]
    pub const fn is_rotatable(self) -> bool {
        self.shape().rotatable
    }

    /// Width and height of the spawn-orientation bounding box.
    #[must_use]
    pub fn size(self) -> (usize, usize) {
        let cells = &self.shape().cells;
        let w = cells.iter().map(|p| p.x).max().unwrap_or(0) + 1;
        let h = cells.iter().map(|p| p.y).max().unwrap_or(0) + 1;
        (w.unsigned_abs() as usize, h.unsigned_abs() as usize)
    }

    /// Returns whether `(x, y)` is covered in the spawn orientation.
    #[must_use]
    pub fn is_occupied(self, (x, y): (usize, usize)) -> bool {
        self.shape()
            .cells
            .iter()
            .any(|p| p.x.unsigned_abs() as usize == x && p.y.unsigned_abs() as usize == y)
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}
