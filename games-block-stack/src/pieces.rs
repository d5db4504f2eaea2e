//! Tetromino kinds and their spawn shapes

use rand::Rng;

/// Offsets of a piece's four blocks as `(row, col)` relative to its anchor
pub type Shape = [(i32, i32); 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Kind {
    pub const ALL: [Kind; 7] = [Kind::I, Kind::O, Kind::T, Kind::S, Kind::Z, Kind::J, Kind::L];

    /// Tag written into settled cells and snapshots
    pub fn letter(self) -> char {
        match self {
            Kind::I => 'I',
            Kind::O => 'O',
            Kind::T => 'T',
            Kind::S => 'S',
            Kind::Z => 'Z',
            Kind::J => 'J',
            Kind::L => 'L',
        }
    }

    /// Inverse of `letter()`
    pub fn from_letter(letter: char) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| kind.letter() == letter)
    }

    /// Spawn orientation
    pub fn shape(self) -> Shape {
        match self {
            Kind::I => [(0, 0), (0, 1), (0, 2), (0, 3)],
            Kind::O => [(0, 0), (0, 1), (1, 0), (1, 1)],
            Kind::T => [(0, 1), (1, 0), (1, 1), (1, 2)],
            Kind::S => [(0, 1), (0, 2), (1, 0), (1, 1)],
            Kind::Z => [(0, 0), (0, 1), (1, 1), (1, 2)],
            Kind::J => [(0, 0), (1, 0), (1, 1), (1, 2)],
            Kind::L => [(0, 2), (1, 0), (1, 1), (1, 2)],
        }
    }

    /// Uniformly random kind
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Kind {
        Kind::ALL[rng.gen_range(0..Kind::ALL.len())]
    }
}

/// Quarter turn about the shape's integer centroid
///
/// The centroid is floored, so the result is generally not anchored at the
/// origin and repeated turns can drift the piece.
pub fn rotate_shape(shape: &Shape) -> Shape {
    let n = shape.len() as i32;
    let cr = shape.iter().map(|&(r, _)| r).sum::<i32>().div_euclid(n);
    let cc = shape.iter().map(|&(_, c)| c).sum::<i32>().div_euclid(n);
    shape.map(|(r, c)| (cr - c, r - cc))
}
