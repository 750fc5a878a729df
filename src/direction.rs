//! pure direction algebra over the six cube faces
//!
//! Everything in here is exact integer math over closed enumerations: the
//! compiler rejects a missing case, and a malformed frame (an up that is not
//! tangential to its face) is a programming error, not a runtime condition.
use crate::types::Direction2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vector with which to do exact directional math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntVector3 {
    /// x component
    pub x: i32,
    /// y component
    pub y: i32,
    /// z component
    pub z: i32,
}

impl IntVector3 {
    /// right-handed cross product
    pub fn cross(self, other: IntVector3) -> IntVector3 {
        IntVector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// dot product
    pub fn dot(self, other: IntVector3) -> i32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

/// Identifies a cube face by its outward normal, and doubles as a 3D axis
/// direction. South is the front face in a right-handed coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction3 {
    /// +Z
    North,
    /// -Z
    South,
    /// -X
    West,
    /// +X
    East,
    /// +Y
    Up,
    /// -Y
    Down,
}

impl fmt::Display for Direction3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction3::North => write!(f, "north"),
            Direction3::South => write!(f, "south"),
            Direction3::West => write!(f, "west"),
            Direction3::East => write!(f, "east"),
            Direction3::Up => write!(f, "up"),
            Direction3::Down => write!(f, "down"),
        }
    }
}

impl Direction3 {
    /// All six directions in order. Indices are the same order as `as_index`
    pub const ALL: [Direction3; 6] = [
        Direction3::North,
        Direction3::South,
        Direction3::West,
        Direction3::East,
        Direction3::Up,
        Direction3::Down,
    ];

    /// the direction pointing the other way; involutive
    pub fn opposite(self) -> Direction3 {
        match self {
            Direction3::North => Direction3::South,
            Direction3::South => Direction3::North,
            Direction3::West => Direction3::East,
            Direction3::East => Direction3::West,
            Direction3::Up => Direction3::Down,
            Direction3::Down => Direction3::Up,
        }
    }

    /// convert this direction to a unit vector
    pub fn to_vector(self) -> IntVector3 {
        match self {
            Direction3::North => IntVector3 { x: 0, y: 0, z: 1 },
            Direction3::South => IntVector3 { x: 0, y: 0, z: -1 },
            Direction3::West => IntVector3 { x: -1, y: 0, z: 0 },
            Direction3::East => IntVector3 { x: 1, y: 0, z: 0 },
            Direction3::Up => IntVector3 { x: 0, y: 1, z: 0 },
            Direction3::Down => IntVector3 { x: 0, y: -1, z: 0 },
        }
    }

    /// create a Direction3 from the given vector
    pub fn from_vector(vector: IntVector3) -> Direction3 {
        match (vector.x, vector.y, vector.z) {
            (0, 0, 1) => Direction3::North,
            (0, 0, -1) => Direction3::South,
            (-1, 0, 0) => Direction3::West,
            (1, 0, 0) => Direction3::East,
            (0, 1, 0) => Direction3::Up,
            (0, -1, 0) => Direction3::Down,
            _ => panic!("not an axis-aligned unit vector"),
        }
    }

    /// converts this direction to a usize index, usable as a face index.
    /// indices are the same order as `Direction3::ALL`
    pub fn as_index(&self) -> usize {
        match self {
            Direction3::North => 0,
            Direction3::South => 1,
            Direction3::West => 2,
            Direction3::East => 3,
            Direction3::Up => 4,
            Direction3::Down => 5,
        }
    }

    /// converts a usize index back to a direction
    pub fn from_index(index: usize) -> Direction3 {
        match index {
            0 => Direction3::North,
            1 => Direction3::South,
            2 => Direction3::West,
            3 => Direction3::East,
            4 => Direction3::Up,
            5 => Direction3::Down,
            _ => panic!("invalid index"),
        }
    }

    /// The canonical reference "up" for this face, used whenever no explicit
    /// orientation has been established. The two faces on the vertical axis
    /// lean on the north-south axis; the four equatorial faces use Up.
    pub fn default_up(self) -> Direction3 {
        match self {
            Direction3::Up => Direction3::North,
            Direction3::Down => Direction3::South,
            _ => Direction3::Up,
        }
    }

    /// The direction to your right when standing on this face with the given
    /// up. `up` must be tangential to the face.
    pub fn right(self, up: Direction3) -> Direction3 {
        debug_assert!(
            up != self && up != self.opposite(),
            "up must be tangential to the face"
        );
        Direction3::from_vector(up.to_vector().cross(self.to_vector()))
    }

    /// The direction to your left when standing on this face with the given
    /// up. `up` must be tangential to the face.
    pub fn left(self, up: Direction3) -> Direction3 {
        debug_assert!(
            up != self && up != self.opposite(),
            "up must be tangential to the face"
        );
        Direction3::from_vector(self.to_vector().cross(up.to_vector()))
    }

    /// Converts a face-local 2D direction into the 3D direction it currently
    /// corresponds to, given the face's up convention.
    pub fn map(self, up: Direction3, dir: Direction2) -> Direction3 {
        match dir {
            Direction2::Up => up,
            Direction2::Down => up.opposite(),
            Direction2::Left => self.left(up),
            Direction2::Right => self.right(up),
        }
    }

    /// The inverse of `map`. `dir` must be tangential to the face; which 2D
    /// direction the two face normals correspond to is context dependent and
    /// is the caller's problem (see [Heading::classify]).
    pub fn unmap(self, up: Direction3, dir: Direction3) -> Direction2 {
        if dir == up {
            Direction2::Up
        } else if dir == up.opposite() {
            Direction2::Down
        } else if dir == self.left(up) {
            Direction2::Left
        } else if dir == self.right(up) {
            Direction2::Right
        } else {
            panic!("direction is normal to the face, not tangential")
        }
    }
}

/// Re-expresses a 3D direction defined relative to one face and up pair in
/// terms of another face and up pair, as an integer change of basis: the
/// coordinates of `dir` in the source frame are rebuilt against the target
/// frame's axes. The result is exact.
pub fn remap(
    from_side: Direction3,
    from_up: Direction3,
    to_side: Direction3,
    to_up: Direction3,
    dir: Direction3,
) -> Direction3 {
    let v = dir.to_vector();
    let from = [
        from_side.right(from_up).to_vector(),
        from_up.to_vector(),
        from_side.to_vector(),
    ];
    let to = [
        to_side.right(to_up).to_vector(),
        to_up.to_vector(),
        to_side.to_vector(),
    ];
    let coords = [from[0].dot(v), from[1].dot(v), from[2].dot(v)];
    Direction3::from_vector(IntVector3 {
        x: to[0].x * coords[0] + to[1].x * coords[1] + to[2].x * coords[2],
        y: to[0].y * coords[0] + to[1].y * coords[1] + to[2].y * coords[2],
        z: to[0].z * coords[0] + to[1].z * coords[1] + to[2].z * coords[2],
    })
}

/// the common case of `remap` where both frames use their face's default up
pub fn remap_default_up(from_side: Direction3, to_side: Direction3, dir: Direction3) -> Direction3 {
    remap(
        from_side,
        from_side.default_up(),
        to_side,
        to_side.default_up(),
        dir,
    )
}

/// The direction a snake segment runs through a cell, relative to that
/// cell's face: within the face plane, burrowing into the cube, or surfacing
/// out of it. Tiles record their `from`/`to` as headings so the dive and
/// ascend cases are first-class instead of being guessed from partial
/// predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Heading {
    /// within the face plane, in the face's default-up frame
    Tangential(Direction2),
    /// into the cube through the face
    Inward,
    /// out of the cube through the face
    Outward,
}

impl Heading {
    /// Classifies a 3D direction relative to a face. Total over all six
    /// directions; tangential ones are expressed in the face's default frame.
    pub fn classify(side: Direction3, dir: Direction3) -> Heading {
        if dir == side {
            Heading::Outward
        } else if dir == side.opposite() {
            Heading::Inward
        } else {
            Heading::Tangential(side.unmap(side.default_up(), dir))
        }
    }

    /// the heading pointing the other way; involutive
    pub fn opposite(self) -> Heading {
        match self {
            Heading::Tangential(dir) => Heading::Tangential(dir.opposite()),
            Heading::Inward => Heading::Outward,
            Heading::Outward => Heading::Inward,
        }
    }

    /// a segment whose exit heading burrows into the cube is diving
    pub fn is_dive(self) -> bool {
        matches!(self, Heading::Inward)
    }

    /// a segment whose entry heading surfaced out of the cube is ascending
    pub fn is_ascend(self) -> bool {
        matches!(self, Heading::Outward)
    }
}
