//! the snake state machine that owns the tile grid
//!
//! The grid is the single source of truth for the snake: `head`, `pre_head`
//! and `tail` are plain [Position] values, and every lookup goes back
//! through the grid. Tile state mutates only inside the tick pipeline and
//! the object spawner.
use crate::direction::{Direction3, Heading};
use crate::position::{Crossing, Position};
use crate::tile_grid::{SnakeTile, TileGrid, TileType};
use crate::types::{Direction2, TickInstruments};
use fxhash::FxHashSet;
use rand::rngs::SmallRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, trace};

/// Configuration for a cube snake game. Deserializes with per-field
/// defaults so sparse config files stay valid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// cells along each edge of a face
    pub grid_width: i16,
    /// ticks per second before any speed increase
    pub base_speed: f32,
    /// whether eating makes the snake faster
    pub has_speed_increase: bool,
    /// ticks per second added per object eaten
    pub speed_increase: f32,
    /// points for a plain object
    pub object_points: u32,
    /// points for a bonus object
    pub bonus_points: u32,
    /// extra points for eating an object inside its early window
    pub early_points: u32,
    /// extra points for eating an object inside the shift window
    pub shift_points: u32,
    /// seconds a plain object lives, negative for no expiry
    pub object_life: f32,
    /// seconds after spawning during which eating scores the early bonus,
    /// negative for no early window
    pub early_life: f32,
    /// seconds between bonus object spawns
    pub bonus_frequency: f32,
    /// seconds a bonus object lives before it expires
    pub bonus_duration: f32,
    /// seconds after a dive during which eating scores the shift bonus
    pub shift_window: f32,
    /// seed for object placement, None for entropy
    pub seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            grid_width: 6,
            base_speed: 2.0,
            has_speed_increase: true,
            speed_increase: 0.05,
            object_points: 10,
            bonus_points: 50,
            early_points: 5,
            shift_points: 20,
            object_life: -1.0,
            early_life: 5.0,
            bonus_frequency: 20.0,
            bonus_duration: 10.0,
            shift_window: 3.0,
            seed: None,
        }
    }
}

/// A consumable object sitting on the board.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Object {
    /// where it sits
    pub position: Position,
    /// `Object` or `BonusObject`
    pub kind: TileType,
    /// seconds before expiry, negative for never
    pub life: f32,
    /// seconds of the early-bonus window, negative for none
    pub early_life: f32,
    /// seconds since it was spawned
    pub time_since_creation: f32,
}

impl Object {
    fn expired(&self) -> bool {
        self.life >= 0.0 && self.time_since_creation > self.life
    }

    fn early(&self) -> bool {
        self.early_life >= 0.0 && self.time_since_creation <= self.early_life
    }
}

/// Scoring counters exposed to the UI layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// plain objects eaten
    pub objects_eaten: u32,
    /// bonus objects eaten
    pub bonus_objects_eaten: u32,
    /// early-window bonuses scored
    pub early_bonuses: u32,
    /// shift-window bonuses scored
    pub shift_bonuses: u32,
    /// total points
    pub points: u32,
    /// ticks advanced since construction
    pub ticks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingMove {
    Turn(Direction2),
    Dive,
}

/// The cube snake state machine: owns the tile grid, the head/pre-head/tail
/// chain, pending input, objects, the animation clock and the score.
///
/// `update` accumulates continuous progress and performs whole discrete
/// ticks; there is no partially applied tick observable from outside. Once
/// the snake collides the model is terminal and read-only: further commands
/// and updates are no-ops.
#[derive(Debug, Clone)]
pub struct Model {
    config: ModelConfig,
    grid: TileGrid,
    head: Position,
    pre_head: Position,
    tail: Position,
    objects: Vec<Object>,
    pending: Option<PendingMove>,
    ascend_heading: Direction2,
    progress: f32,
    current_speed: f32,
    is_game_over: bool,
    dead_head: Option<(Position, SnakeTile)>,
    bonus_timer: f32,
    time_since_shift: f32,
    stats: Stats,
    rng: SmallRng,
}

impl Model {
    /// Builds a model with a three-segment snake seeded on the south face,
    /// headed up. Will return an error if the config cannot host it.
    pub fn new(config: ModelConfig) -> Result<Model, Box<dyn Error>> {
        if config.grid_width < 3 {
            return Err("grid width must be at least 3".into());
        }
        if config.base_speed <= 0.0 {
            return Err("base speed must be positive".into());
        }

        let mut grid = TileGrid::new(config.grid_width);
        let column = config.grid_width / 2;
        let tail = Position::new(Direction3::South, column, 0);
        let pre_head = Position::new(Direction3::South, column, 1);
        let head = Position::new(Direction3::South, column, 2);
        let up = Heading::Tangential(Direction2::Up);
        let down = Heading::Tangential(Direction2::Down);
        grid.set(tail, SnakeTile::segment(TileType::Tail, down, up));
        grid.set(pre_head, SnakeTile::segment(TileType::PreHead, down, up));
        grid.set(head, SnakeTile::segment(TileType::Head, down, up));

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Ok(Model {
            current_speed: config.base_speed,
            bonus_timer: config.bonus_frequency,
            config,
            grid,
            head,
            pre_head,
            tail,
            objects: Vec::new(),
            pending: None,
            ascend_heading: Direction2::Up,
            progress: 0.0,
            is_game_over: false,
            dead_head: None,
            time_since_shift: f32::INFINITY,
            stats: Stats::default(),
            rng,
        })
    }

    /// Buffers a turn request. `up` is the caller's up convention for the
    /// head's face (the camera frame); the input is re-expressed in the
    /// face's default frame before it is stored. A reversal into the snake's
    /// own neck is ignored; a second request before the next tick overwrites
    /// the first.
    pub fn change_direction(&mut self, up: Direction3, input: Direction2) {
        if self.is_game_over {
            return;
        }
        let side = self.head.side;
        let local = side.unmap(side.default_up(), side.map(up, input));
        if self.grid.get(self.head).from == Heading::Tangential(local) {
            return;
        }
        self.pending = Some(PendingMove::Turn(local));
    }

    /// Buffers a dive through the cube to the opposite face, taking the
    /// place of any pending turn.
    pub fn dive(&mut self) {
        if self.is_game_over {
            return;
        }
        self.pending = Some(PendingMove::Dive);
    }

    /// Advances the animation clock by `delta` seconds and performs one
    /// whole tick every time it crosses 1.0. Object lifetimes and the
    /// bonus and shift windows age by `delta` as well. A no-op once the
    /// game is over.
    #[instrument(level = "trace", skip(self, instruments))]
    pub fn update<I: TickInstruments>(&mut self, delta: f32, instruments: &I) {
        if self.is_game_over {
            return;
        }
        self.advance_timers(delta);
        self.progress += delta * self.current_speed;
        while self.progress >= 1.0 {
            self.progress -= 1.0;
            let start = Instant::now();
            self.tick();
            instruments.observe_tick(start.elapsed());
            if self.is_game_over {
                self.progress = 0.0;
                break;
            }
        }
    }

    fn advance_timers(&mut self, delta: f32) {
        self.time_since_shift += delta;
        self.bonus_timer -= delta;
        for object in self.objects.iter_mut() {
            object.time_since_creation += delta;
        }
        let grid = &mut self.grid;
        self.objects.retain(|object| {
            if object.expired() {
                debug!(position = ?object.position, "object expired");
                grid.set(object.position, SnakeTile::empty());
                false
            } else {
                true
            }
        });
    }

    /// one discrete advance of the whole snake
    fn tick(&mut self) {
        self.stats.ticks += 1;

        let head_tile = self.grid.get(self.head);
        let to = self.resolve_exit(head_tile);
        self.grid.set(self.head, SnakeTile { to, ..head_tile });

        let step = self.head.adjacent(to, self.grid.width());
        let target = self.grid.get(step.position);

        if target.kind.is_snake() {
            self.is_game_over = true;
            let provisional = self.provisional_exit(step.from);
            self.dead_head = Some((
                step.position,
                SnakeTile::segment(TileType::Head, step.from, provisional),
            ));
            debug!(position = ?step.position, "snake collided with itself");
            return;
        }

        if step.crossing == Crossing::Through {
            // carry the 3D travel direction across so the ascend can resume it
            let travel = match head_tile.from {
                Heading::Tangential(from) => from.opposite(),
                _ => self.ascend_heading,
            };
            let side = self.head.side;
            let heading = side.map(side.default_up(), travel);
            let landing = step.position.side;
            self.ascend_heading = landing.unmap(landing.default_up(), heading);
            self.time_since_shift = 0.0;
            debug!(from = ?self.head, to = ?step.position, "dive");
        }

        let ate = target.kind.is_object();
        if ate {
            self.consume(step.position);
        }

        let pre_head_tile = self.grid.get(self.pre_head);
        self.grid.set(
            self.pre_head,
            SnakeTile {
                kind: pre_head_tile.kind.as_body(),
                ..pre_head_tile
            },
        );
        let old_head_tile = self.grid.get(self.head);
        self.grid.set(
            self.head,
            SnakeTile {
                kind: old_head_tile.kind.as_pre_head(),
                ..old_head_tile
            },
        );
        let kind = if ate {
            TileType::HeadDigesting
        } else {
            TileType::Head
        };
        let provisional = self.provisional_exit(step.from);
        self.grid.set(
            step.position,
            SnakeTile::segment(kind, step.from, provisional),
        );
        self.pre_head = self.head;
        self.head = step.position;

        if !ate {
            self.advance_tail();
        }

        if self.config.has_speed_increase {
            let eaten = self.stats.objects_eaten + self.stats.bonus_objects_eaten;
            self.current_speed =
                self.config.base_speed + self.config.speed_increase * eaten as f32;
        }
        self.maybe_spawn();
        debug_assert!(self.assert_consistency(), "tick left the grid inconsistent");
    }

    /// the head's exit for this tick: a valid pending input wins, otherwise
    /// straight continuation
    fn resolve_exit(&mut self, head_tile: SnakeTile) -> Heading {
        match self.pending.take() {
            Some(PendingMove::Dive) => Heading::Inward,
            Some(PendingMove::Turn(dir)) if head_tile.from != Heading::Tangential(dir) => {
                Heading::Tangential(dir)
            }
            _ => match head_tile.from {
                Heading::Tangential(from) => Heading::Tangential(from.opposite()),
                Heading::Outward => Heading::Tangential(self.ascend_heading),
                Heading::Inward => unreachable!("head tiles never enter inward"),
            },
        }
    }

    /// the exit recorded on a fresh head tile until the next tick resolves
    /// it: straight continuation, never another dive
    fn provisional_exit(&self, from: Heading) -> Heading {
        match from {
            Heading::Outward => Heading::Tangential(self.ascend_heading),
            other => other.opposite(),
        }
    }

    fn consume(&mut self, position: Position) {
        let index = self.objects.iter().position(|o| o.position == position);
        debug_assert!(index.is_some(), "object tile without an object record");
        if let Some(index) = index {
            let object = self.objects.swap_remove(index);
            let mut gained = match object.kind {
                TileType::BonusObject => {
                    self.stats.bonus_objects_eaten += 1;
                    self.config.bonus_points
                }
                _ => {
                    self.stats.objects_eaten += 1;
                    self.config.object_points
                }
            };
            if object.early() {
                self.stats.early_bonuses += 1;
                gained += self.config.early_points;
            }
            if self.has_time_shift_bonus() {
                self.stats.shift_bonuses += 1;
                gained += self.config.shift_points;
            }
            self.stats.points += gained;
            debug!(kind = ?object.kind, gained, "object eaten");
        }
    }

    /// moves the tail one step along its stored exit and promotes the next
    /// segment into the tail role
    fn advance_tail(&mut self) {
        let tail_tile = self.grid.get(self.tail);
        let step = self.tail.adjacent(tail_tile.to, self.grid.width());
        self.grid.set(self.tail, SnakeTile::empty());
        let next = self.grid.get(step.position);
        self.grid.set(
            step.position,
            SnakeTile {
                kind: next.kind.as_tail(),
                ..next
            },
        );
        self.tail = step.position;
    }

    fn maybe_spawn(&mut self) {
        if !self.objects.iter().any(|o| o.kind == TileType::Object) {
            self.place_object(TileType::Object, self.config.object_life);
        }
        if self.bonus_timer <= 0.0 {
            self.bonus_timer = self.config.bonus_frequency;
            if !self.objects.iter().any(|o| o.kind == TileType::BonusObject) {
                self.place_object(TileType::BonusObject, self.config.bonus_duration);
            }
        }
    }

    fn place_object(&mut self, kind: TileType, life: f32) {
        let position = self.grid.empty_cells().choose(&mut self.rng);
        if let Some(position) = position {
            self.grid.set(position, SnakeTile::object(kind));
            self.objects.push(Object {
                position,
                kind,
                life,
                early_life: self.config.early_life,
                time_since_creation: 0.0,
            });
            trace!(?position, ?kind, "object placed");
        }
    }

    /// Walks the body from tail to head along the stored exits and checks it
    /// is a single simple path of live segments. Returns false when the grid
    /// is inconsistent; trivially true once the game is over.
    pub fn assert_consistency(&self) -> bool {
        if self.is_game_over {
            return true;
        }
        let width = self.grid.width();
        let mut visited = FxHashSet::default();
        let mut current = self.tail;
        let tail_kind = self.grid.get(current).kind;
        if !matches!(tail_kind, TileType::Tail | TileType::TailDigesting) {
            return false;
        }
        loop {
            if !visited.insert(current) {
                return false;
            }
            let tile = self.grid.get(current);
            if !tile.kind.is_snake() {
                return false;
            }
            if current == self.head {
                return matches!(tile.kind, TileType::Head | TileType::HeadDigesting);
            }
            current = current.adjacent(tile.to, width).position;
        }
    }

    /// the tile at a position
    pub fn tile(&self, position: Position) -> SnakeTile {
        self.grid.get(position)
    }

    /// enumerates every cell of every face with its resolved position
    pub fn tiles(&self) -> impl Iterator<Item = (Position, SnakeTile)> + '_ {
        self.grid.iter()
    }

    /// the grid width of every face
    pub fn width(&self) -> i16 {
        self.grid.width()
    }

    /// the animation fraction between the last completed tick and the next
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// whether the snake has collided; terminal once set
    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    /// ticks per second at the moment
    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// the scoring counters
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// the objects currently on the board
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// whether a recent dive still has its bonus window open
    pub fn has_time_shift_bonus(&self) -> bool {
        self.time_since_shift <= self.config.shift_window
    }

    /// the head tile the snake died reaching for; Some only when game over
    pub fn dead_head(&self) -> Option<SnakeTile> {
        self.dead_head.map(|(_, tile)| tile)
    }

    /// where the snake died reaching; Some only when game over
    pub fn dead_head_position(&self) -> Option<Position> {
        self.dead_head.map(|(position, _)| position)
    }

    /// where the head currently is
    pub fn head_position(&self) -> Position {
        self.head
    }

    /// where the segment behind the head currently is
    pub fn pre_head_position(&self) -> Position {
        self.pre_head
    }

    /// where the tail currently is
    pub fn tail_position(&self) -> Position {
        self.tail
    }

    /// the configuration this model was built with
    pub fn config(&self) -> ModelConfig {
        self.config
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.grid, f)
    }
}
