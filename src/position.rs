//! face-plus-grid coordinates on the cube surface and the step operation
use crate::direction::{remap, Direction3, Heading};
use crate::types::Direction2;
use serde::{Deserialize, Serialize};

/// the two in-plane axes of a face's local grid, named abstractly because
/// which 3D axis they correspond to depends on the face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Coord {
    #[allow(missing_docs)]
    E1,
    #[allow(missing_docs)]
    E2,
}

impl Coord {
    /// the other in-plane axis
    pub fn other(self) -> Coord {
        match self {
            Coord::E1 => Coord::E2,
            Coord::E2 => Coord::E1,
        }
    }

    /// the 3D direction of increasing grid index along this axis
    pub fn axis(self, side: Direction3) -> Direction3 {
        match self {
            Coord::E1 => side.right(side.default_up()),
            Coord::E2 => side.default_up(),
        }
    }

    /// which in-plane axis a tangential 3D direction lies along; the inverse
    /// lookup of `axis`. Face-normal directions are the caller's problem.
    pub fn from_axis(side: Direction3, dir: Direction3) -> Coord {
        let e1 = Coord::E1.axis(side);
        let e2 = Coord::E2.axis(side);
        if dir == e1 || dir == e1.opposite() {
            Coord::E1
        } else if dir == e2 || dir == e2.opposite() {
            Coord::E2
        } else {
            panic!("direction is normal to the face, it lies along no in-plane axis")
        }
    }

    /// whether increasing the grid index along this axis moves in the
    /// positive or negative direction of the corresponding 3D axis
    pub fn sign(self, side: Direction3) -> i16 {
        let v = self.axis(side).to_vector();
        (v.x + v.y + v.z) as i16
    }
}

/// One cell of the cube surface: a face plus local grid coordinates.
/// Two positions are equal iff all three fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// the face this cell lives on
    pub side: Direction3,
    /// grid index along the face's first in-plane axis
    pub e1: i16,
    /// grid index along the face's second in-plane axis
    pub e2: i16,
}

/// How a step reached its destination cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// stayed on the same face
    InFace,
    /// rolled over a cube edge onto an adjacent face
    Edge,
    /// burrowed straight through the cube to the opposite face
    Through,
}

/// Result of advancing one cell from a position.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    /// the destination cell
    pub position: Position,
    /// entry direction to record on the destination tile, in its face's frame
    pub from: Heading,
    /// whether the step stayed in-face, crossed an edge, or went through
    pub crossing: Crossing,
}

impl Position {
    /// makes a new position
    pub fn new(side: Direction3, e1: i16, e2: i16) -> Self {
        Position { side, e1, e2 }
    }

    /// the grid index along the given axis
    pub fn coord(self, coord: Coord) -> i16 {
        match coord {
            Coord::E1 => self.e1,
            Coord::E2 => self.e2,
        }
    }

    /// this position with the index along the given axis replaced
    pub fn with_coord(self, coord: Coord, value: i16) -> Self {
        match coord {
            Coord::E1 => Position { e1: value, ..self },
            Coord::E2 => Position { e2: value, ..self },
        }
    }

    /// The cell one step away along `to`, together with the entry direction
    /// to record there. `width` is the grid width of every face. A
    /// tangential step either stays in-face or rolls over the nearest cube
    /// edge; an inward step burrows straight through the cube. `Outward` is
    /// not a valid exit for a tile and panics.
    pub fn adjacent(self, to: Heading, width: i16) -> Step {
        match to {
            Heading::Tangential(dir) => self.tangential_step(dir, width),
            Heading::Inward => self.through_step(width),
            Heading::Outward => panic!("no tile exits outward through its own face"),
        }
    }

    fn tangential_step(self, dir: Direction2, width: i16) -> Step {
        let side = self.side;
        let heading = side.map(side.default_up(), dir);
        let coord = Coord::from_axis(side, heading);
        let delta = if heading == coord.axis(side) { 1 } else { -1 };
        let moved = self.coord(coord) + delta;
        if (0..width).contains(&moved) {
            return Step {
                position: self.with_coord(coord, moved),
                from: Heading::Tangential(dir.opposite()),
                crossing: Crossing::InFace,
            };
        }

        // Rolled over the edge. The new face is the one the heading points
        // at; re-expressing directions in its frame is a change of basis
        // that sends the heading behind the crossing and fixes the axis of
        // the shared edge.
        let new_side = heading;
        let roll = |d: Direction3| remap(side, heading, new_side, side.opposite(), d);
        let new_heading = roll(heading);
        let motion = Coord::from_axis(new_side, new_heading);
        let entry = if new_heading == motion.axis(new_side) {
            0
        } else {
            width - 1
        };
        let rail = roll(coord.other().axis(side));
        let cross = Coord::from_axis(new_side, rail);
        let kept = self.coord(coord.other());
        let value = if rail == cross.axis(new_side) {
            kept
        } else {
            width - 1 - kept
        };
        let from = new_side.unmap(new_side.default_up(), side);
        let position = Position::new(new_side, 0, 0)
            .with_coord(motion, entry)
            .with_coord(cross, value);
        Step {
            position,
            from: Heading::Tangential(from),
            crossing: Crossing::Edge,
        }
    }

    fn through_step(self, width: i16) -> Step {
        let new_side = self.side.opposite();
        let mut position = Position::new(new_side, 0, 0);
        for coord in [Coord::E1, Coord::E2].iter().copied() {
            let axis = coord.axis(self.side);
            let mapped = Coord::from_axis(new_side, axis);
            let kept = self.coord(coord);
            let value = if axis == mapped.axis(new_side) {
                kept
            } else {
                width - 1 - kept
            };
            position = position.with_coord(mapped, value);
        }
        Step {
            position,
            from: Heading::Outward,
            crossing: Crossing::Through,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    const W: i16 = 6;

    fn vec_of(dir: Direction3) -> [i32; 3] {
        let v = dir.to_vector();
        [v.x, v.y, v.z]
    }

    // Ground-truth embedding: the cube spans [0, W]^3 and each cell is the
    // axis-aligned unit square of its face. Everything below is derived from
    // the face normals and increasing axes alone, independently of the step
    // logic under test.
    fn face_origin(side: Direction3) -> [i32; 3] {
        let n = vec_of(side);
        let a = vec_of(Coord::E1.axis(side));
        let b = vec_of(Coord::E2.axis(side));
        let mut origin = [0i32; 3];
        for i in 0..3 {
            origin[i] = (W as i32 / 2) * (1 + n[i] - a[i] - b[i]);
        }
        origin
    }

    fn corners(pos: Position) -> Vec<[i32; 3]> {
        let origin = face_origin(pos.side);
        let a = vec_of(Coord::E1.axis(pos.side));
        let b = vec_of(Coord::E2.axis(pos.side));
        let mut out = Vec::new();
        for (da, db) in [(0, 0), (1, 0), (0, 1), (1, 1)].iter().copied() {
            let mut corner = [0i32; 3];
            for i in 0..3 {
                corner[i] = origin[i]
                    + (pos.e1 as i32 + da) * a[i]
                    + (pos.e2 as i32 + db) * b[i];
            }
            out.push(corner);
        }
        out
    }

    fn corner_sum(pos: Position) -> [i32; 3] {
        let mut sum = [0i32; 3];
        for corner in corners(pos) {
            for i in 0..3 {
                sum[i] += corner[i];
            }
        }
        sum
    }

    fn shared_corners(a: Position, b: Position) -> usize {
        let bs = corners(b);
        corners(a).iter().filter(|c| bs.contains(c)).count()
    }

    fn all_positions() -> impl Iterator<Item = Position> {
        iproduct!(Direction3::ALL.iter().copied(), 0..W, 0..W)
            .map(|(side, e2, e1)| Position::new(side, e1, e2))
    }

    fn in_bounds(pos: Position) -> bool {
        (0..W).contains(&pos.e1) && (0..W).contains(&pos.e2)
    }

    #[test]
    fn test_sign_matches_axis_vector() {
        for side in Direction3::ALL.iter().copied() {
            for coord in [Coord::E1, Coord::E2].iter().copied() {
                let sign = coord.sign(side);
                assert!(sign == 1 || sign == -1);
                let v = coord.axis(side).to_vector();
                assert_eq!(sign as i32, v.x + v.y + v.z);
            }
        }
    }

    #[test]
    fn test_axis_round_trip() {
        for side in Direction3::ALL.iter().copied() {
            for coord in [Coord::E1, Coord::E2].iter().copied() {
                assert_eq!(Coord::from_axis(side, coord.axis(side)), coord);
                assert_eq!(Coord::from_axis(side, coord.axis(side).opposite()), coord);
            }
        }
    }

    #[test]
    fn test_every_tangential_step_lands_on_the_geometric_neighbor() {
        for pos in all_positions() {
            for dir in Direction2::all() {
                let heading = pos.side.map(pos.side.default_up(), dir);
                let step = pos.adjacent(Heading::Tangential(dir), W);
                assert!(in_bounds(step.position), "{:?} {:?}", pos, dir);
                assert_eq!(shared_corners(pos, step.position), 2, "{:?} {:?}", pos, dir);

                // the center displacement pins the landing cell exactly:
                // a whole cell along the heading in-face, half a cell over
                // the edge and half onto the new face otherwise
                let h = vec_of(heading);
                let away = vec_of(pos.side.opposite());
                let mut expected = [0i32; 3];
                for i in 0..3 {
                    expected[i] = match step.crossing {
                        Crossing::InFace => 4 * h[i],
                        Crossing::Edge => 2 * h[i] + 2 * away[i],
                        Crossing::Through => panic!("tangential step went through"),
                    };
                }
                let before = corner_sum(pos);
                let after = corner_sum(step.position);
                for i in 0..3 {
                    assert_eq!(after[i] - before[i], expected[i], "{:?} {:?}", pos, dir);
                }

                // a step leaves the face exactly when the raw index leaves the grid
                let coord = Coord::from_axis(pos.side, heading);
                let delta = if heading == coord.axis(pos.side) { 1 } else { -1 };
                let stays = (0..W).contains(&(pos.coord(coord) + delta));
                assert_eq!(step.crossing == Crossing::InFace, stays);
                assert_eq!(step.crossing == Crossing::Edge, !stays);
            }
        }
    }

    #[test]
    fn test_stepping_back_returns_home() {
        for pos in all_positions() {
            for dir in Direction2::all() {
                let step = pos.adjacent(Heading::Tangential(dir), W);
                match step.from {
                    Heading::Tangential(back) => {
                        let home = step.position.adjacent(Heading::Tangential(back), W);
                        assert_eq!(home.position, pos, "{:?} {:?}", pos, dir);
                    }
                    other => panic!("tangential step recorded entry {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_through_keeps_the_footprint_and_round_trips() {
        for pos in all_positions() {
            let step = pos.adjacent(Heading::Inward, W);
            assert_eq!(step.position.side, pos.side.opposite());
            assert_eq!(step.from, Heading::Outward);
            assert_eq!(step.crossing, Crossing::Through);
            assert!(in_bounds(step.position));

            // the landing cell is straight through the cube: dropping the
            // normal axis, the two footprints coincide
            let drop = vec_of(pos.side)
                .iter()
                .position(|component| *component != 0)
                .unwrap();
            let flatten = |p: Position| {
                let mut flat: Vec<[i32; 2]> = corners(p)
                    .into_iter()
                    .map(|c| {
                        let mut kept = [0i32; 2];
                        let mut at = 0;
                        for (i, component) in c.iter().enumerate() {
                            if i != drop {
                                kept[at] = *component;
                                at += 1;
                            }
                        }
                        kept
                    })
                    .collect();
                flat.sort_unstable();
                flat
            };
            assert_eq!(flatten(pos), flatten(step.position), "{:?}", pos);

            let back = step.position.adjacent(Heading::Inward, W);
            assert_eq!(back.position, pos);
        }
    }

    #[test]
    fn test_worked_crossing_example() {
        // climbing the east face crosses the top-right edge onto the up
        // face, entering along its west edge with the rail index mirrored
        let pos = Position::new(Direction3::East, 1, W - 1);
        let step = pos.adjacent(Heading::Tangential(Direction2::Up), W);
        assert_eq!(step.position, Position::new(Direction3::Up, 0, W - 2));
        assert_eq!(step.crossing, Crossing::Edge);
    }

    #[test]
    #[should_panic(expected = "no tile exits outward")]
    fn test_outward_exit_is_a_contract_violation() {
        let pos = Position::new(Direction3::South, 0, 0);
        pos.adjacent(Heading::Outward, W);
    }
}
