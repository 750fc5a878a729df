//! storage for the six-face tile grid
//!
//! The grid is storage and addressed access only; it holds no game rules and
//! trusts its callers to hand it in-range positions, matching its role as a
//! leaf component.
use crate::direction::{Direction3, Heading};
use crate::position::Position;
use crate::types::Direction2;
use itertools::iproduct;
use serde::Serialize;
use std::fmt;

/// What currently occupies a cell. The digesting variants mean the segment
/// currently has a recently-eaten object passing through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TileType {
    /// nothing here
    Empty,
    /// a plain consumable object
    Object,
    /// a timed bonus object
    BonusObject,
    #[allow(missing_docs)]
    Head,
    #[allow(missing_docs)]
    PreHead,
    #[allow(missing_docs)]
    Body,
    #[allow(missing_docs)]
    Tail,
    #[allow(missing_docs)]
    HeadDigesting,
    #[allow(missing_docs)]
    PreHeadDigesting,
    #[allow(missing_docs)]
    BodyDigesting,
    #[allow(missing_docs)]
    TailDigesting,
}

impl TileType {
    /// is this a live snake segment of any flavor
    pub fn is_snake(self) -> bool {
        !matches!(self, TileType::Empty | TileType::Object | TileType::BonusObject)
    }

    /// is this a consumable object of either kind
    pub fn is_object(self) -> bool {
        matches!(self, TileType::Object | TileType::BonusObject)
    }

    /// does this segment have an object passing through it
    pub fn is_digesting(self) -> bool {
        matches!(
            self,
            TileType::HeadDigesting
                | TileType::PreHeadDigesting
                | TileType::BodyDigesting
                | TileType::TailDigesting
        )
    }

    /// demotes a head to the pre-head role, keeping the digesting flavor
    pub fn as_pre_head(self) -> TileType {
        match self {
            TileType::Head => TileType::PreHead,
            TileType::HeadDigesting => TileType::PreHeadDigesting,
            other => panic!("{:?} is not a head tile", other),
        }
    }

    /// demotes a pre-head to the body role, keeping the digesting flavor
    pub fn as_body(self) -> TileType {
        match self {
            TileType::PreHead => TileType::Body,
            TileType::PreHeadDigesting => TileType::BodyDigesting,
            other => panic!("{:?} is not a pre-head tile", other),
        }
    }

    /// promotes a body segment to the tail role, keeping the digesting flavor
    pub fn as_tail(self) -> TileType {
        match self {
            TileType::Body => TileType::Tail,
            TileType::BodyDigesting => TileType::TailDigesting,
            other => panic!("{:?} is not a body tile", other),
        }
    }

    fn glyph(self) -> char {
        match self {
            TileType::Empty => '.',
            TileType::Object => 'o',
            TileType::BonusObject => '*',
            TileType::Head => 'H',
            TileType::PreHead => 'P',
            TileType::Body => 'B',
            TileType::Tail => 'T',
            TileType::HeadDigesting => 'h',
            TileType::PreHeadDigesting => 'p',
            TileType::BodyDigesting => 'b',
            TileType::TailDigesting => 't',
        }
    }
}

/// Per-cell state: what occupies the cell and, for snake segments, the
/// directions the segment entered from and will exit toward, in the cell's
/// face frame. `from`/`to` both detect turns and select the oriented sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnakeTile {
    /// what occupies this cell
    pub kind: TileType,
    /// the direction the segment entered from
    pub from: Heading,
    /// the direction the segment will exit toward
    pub to: Heading,
}

impl SnakeTile {
    /// an empty tile; `from`/`to` are don't-care placeholders
    pub fn empty() -> Self {
        SnakeTile {
            kind: TileType::Empty,
            from: Heading::Tangential(Direction2::Up),
            to: Heading::Tangential(Direction2::Up),
        }
    }

    /// an object tile; `from`/`to` are don't-care placeholders
    pub fn object(kind: TileType) -> Self {
        debug_assert!(kind.is_object());
        SnakeTile {
            kind,
            ..SnakeTile::empty()
        }
    }

    /// a snake segment tile
    pub fn segment(kind: TileType, from: Heading, to: Heading) -> Self {
        debug_assert!(kind.is_snake());
        SnakeTile { kind, from, to }
    }
}

/// Owns one `SnakeTile` per cell of all six faces, indexed by [Position].
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: i16,
    cells: Vec<SnakeTile>,
}

impl TileGrid {
    /// makes a grid of `6 * width * width` empty tiles
    pub fn new(width: i16) -> Self {
        assert!(width > 0, "grid width must be positive");
        TileGrid {
            width,
            cells: vec![SnakeTile::empty(); 6 * width as usize * width as usize],
        }
    }

    /// the grid width of every face
    pub fn width(&self) -> i16 {
        self.width
    }

    fn index(&self, position: Position) -> usize {
        debug_assert!(
            (0..self.width).contains(&position.e1) && (0..self.width).contains(&position.e2),
            "position out of range: {:?}",
            position
        );
        let width = self.width as usize;
        position.side.as_index() * width * width
            + position.e2 as usize * width
            + position.e1 as usize
    }

    /// the tile at a position
    pub fn get(&self, position: Position) -> SnakeTile {
        self.cells[self.index(position)]
    }

    /// replaces the tile at a position
    pub fn set(&mut self, position: Position, tile: SnakeTile) {
        let index = self.index(position);
        self.cells[index] = tile;
    }

    /// enumerates every cell of every face with its resolved position
    pub fn iter(&self) -> impl Iterator<Item = (Position, SnakeTile)> + '_ {
        let width = self.width;
        iproduct!(Direction3::ALL.iter().copied(), 0..width, 0..width).map(
            move |(side, e2, e1)| {
                let position = Position::new(side, e1, e2);
                (position, self.get(position))
            },
        )
    }

    /// the positions of all empty cells
    pub fn empty_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.iter()
            .filter(|(_, tile)| tile.kind == TileType::Empty)
            .map(|(position, _)| position)
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for side in Direction3::ALL.iter().copied() {
            writeln!(f, "{}:", side)?;
            for row in (0..self.width).rev() {
                for column in 0..self.width {
                    let tile = self.get(Position::new(side, column, row));
                    write!(f, "{} ", tile.kind.glyph())?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashSet;

    #[test]
    fn test_every_position_maps_to_a_distinct_cell() {
        let grid = TileGrid::new(5);
        let mut seen = FxHashSet::default();
        for (position, _) in grid.iter() {
            assert!(seen.insert(grid.index(position)));
        }
        assert_eq!(seen.len(), 6 * 5 * 5);
        assert!(seen.into_iter().all(|index| index < 6 * 5 * 5));
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut grid = TileGrid::new(4);
        let position = Position::new(Direction3::Down, 3, 1);
        let tile = SnakeTile::segment(
            TileType::BodyDigesting,
            Heading::Tangential(Direction2::Left),
            Heading::Inward,
        );
        grid.set(position, tile);
        assert_eq!(grid.get(position), tile);
    }

    #[test]
    fn test_empty_cells_shrink_as_tiles_fill() {
        let mut grid = TileGrid::new(3);
        assert_eq!(grid.empty_cells().count(), 6 * 3 * 3);
        grid.set(
            Position::new(Direction3::North, 0, 0),
            SnakeTile::object(TileType::Object),
        );
        assert_eq!(grid.empty_cells().count(), 6 * 3 * 3 - 1);
    }

    #[test]
    fn test_promotions_keep_the_digesting_flavor() {
        assert_eq!(TileType::Head.as_pre_head(), TileType::PreHead);
        assert_eq!(TileType::HeadDigesting.as_pre_head(), TileType::PreHeadDigesting);
        assert_eq!(TileType::PreHeadDigesting.as_body(), TileType::BodyDigesting);
        assert_eq!(TileType::BodyDigesting.as_tail(), TileType::TailDigesting);
        assert!(!TileType::Tail.is_digesting());
        assert!(TileType::TailDigesting.is_digesting());
    }

    #[test]
    fn test_display_renders_all_six_faces() {
        let grid = TileGrid::new(3);
        let rendered = format!("{}", grid);
        for side in Direction3::ALL.iter() {
            assert!(rendered.contains(&format!("{}:", side)));
        }
        assert_eq!(rendered.matches('.').count(), 6 * 3 * 3);
    }
}
