#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Alien Invasion game.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable views, and respond exclusively with new command batches.

use std::time::Duration;

use serde::Deserialize;

/// Title shown by adapters that open a window.
pub const WINDOW_TITLE: &str = "Alien invasion remaster";

/// Describes whether the game still accepts gameplay input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayMode {
    /// The player has ships left and the simulation advances every frame.
    Active,
    /// The last ship was lost; only quitting or restarting remain possible.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resizes the playable arena and resets the ship, bullets and fleet.
    ConfigureArena {
        /// Width of the arena in world units (pixels at scale 1).
        width: f32,
        /// Height of the arena in world units (pixels at scale 1).
        height: f32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Engages or releases one of the ship's horizontal thrusters.
    SetShipThrust {
        /// Side whose thruster changes state.
        direction: HorizontalDirection,
        /// Whether the thruster is held after this command.
        engaged: bool,
    },
    /// Moves the ship one frame according to its engaged thrusters.
    AdvanceShip,
    /// Requests a new bullet from the ship's nose.
    FireBullet,
    /// Moves every bullet one frame towards the top of the arena.
    AdvanceBullets,
    /// Removes a bullet together with the alien it struck.
    DestroyAlien {
        /// Bullet that hit the alien. It may already be gone.
        bullet: BulletId,
        /// Alien struck by the bullet.
        alien: AlienId,
    },
    /// Removes bullets that left the top of the arena.
    PruneBullets,
    /// Replaces the fleet with aliens anchored at the provided top-left origins.
    SpawnFleet {
        /// Top-left corner of every alien in the new fleet.
        origins: Vec<Point>,
    },
    /// Drops the whole fleet one step and reverses its horizontal direction.
    ChangeFleetDirection,
    /// Moves every alien one frame in the current fleet direction.
    AdvanceFleet,
    /// Reports that the ship was reached by the fleet.
    HitShip {
        /// How the fleet reached the ship.
        cause: HitCause,
    },
    /// Starts a fresh game after the previous one ended.
    RestartGame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the arena was resized and its inhabitants reset.
    ArenaConfigured {
        /// Arena that became active.
        arena: Arena,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the ship changed its horizontal position.
    ShipMoved {
        /// Left edge of the ship before moving.
        from: f32,
        /// Left edge of the ship after moving.
        to: f32,
    },
    /// Confirms that a bullet left the ship.
    BulletFired {
        /// Identifier assigned to the bullet.
        bullet: BulletId,
        /// Bounds of the bullet at launch.
        rect: Rect,
    },
    /// Reports that a fire request was refused.
    BulletRejected {
        /// Specific reason the request failed.
        reason: FireError,
    },
    /// Confirms that a bullet left the arena and was discarded.
    BulletExpired {
        /// Identifier of the discarded bullet.
        bullet: BulletId,
    },
    /// Confirms that a bullet destroyed an alien.
    AlienDestroyed {
        /// Identifier of the destroyed alien.
        alien: AlienId,
        /// Identifier of the bullet credited with the hit.
        bullet: BulletId,
    },
    /// Announces that the last alien of the fleet was destroyed.
    FleetDestroyed,
    /// Confirms that a new fleet entered the arena.
    FleetSpawned {
        /// Number of aliens composing the fleet.
        count: usize,
    },
    /// Confirms that the fleet dropped and reversed direction.
    FleetDirectionChanged {
        /// Direction the fleet travels in after the change.
        direction: FleetDirection,
    },
    /// Confirms that the ship was lost and the round reset.
    ShipHit {
        /// How the fleet reached the ship.
        cause: HitCause,
        /// Ships left after the hit.
        lives_remaining: u32,
    },
    /// Announces that the pause following a ship hit has elapsed.
    RecoveryElapsed,
    /// Announces that the fleet reached the ship with no ships left.
    GameOver,
    /// Confirms that a fresh game started.
    GameRestarted {
        /// Ships available to the player in the new game.
        lives: u32,
    },
}

/// Side of the ship affected by a thrust command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalDirection {
    /// Towards decreasing x.
    Left,
    /// Towards increasing x.
    Right,
}

/// Horizontal travel direction shared by every alien in the fleet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FleetDirection {
    /// The fleet marches towards increasing x.
    #[default]
    Right,
    /// The fleet marches towards decreasing x.
    Left,
}

impl FleetDirection {
    /// Multiplier applied to the alien speed along the x axis.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }
}

/// Reasons a fire request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FireError {
    /// The game has ended.
    GameOver,
    /// The ship is recovering from a hit.
    Recovering,
    /// The maximum number of bullets is already in flight.
    LimitReached,
}

/// Ways in which the fleet can cost the player a ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitCause {
    /// An alien overlapped the ship.
    Collision,
    /// An alien reached the bottom of the arena.
    Landed,
}

/// Unique identifier assigned to a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an alien.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlienId(u32);

impl AlienId {
    /// Creates a new alien identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location in arena space. The y axis grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a rectangle measured in world units.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// Creates a new size descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    origin: Point,
    size: Size,
}

impl Rect {
    /// Constructs a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Constructs a rectangle of the provided size whose top edge is centred on `anchor`.
    #[must_use]
    pub fn with_mid_top(anchor: Point, size: Size) -> Self {
        Self::from_origin_and_size(Point::new(anchor.x - size.width / 2.0, anchor.y), size)
    }

    /// Constructs a rectangle of the provided size whose bottom edge is centred on `anchor`.
    #[must_use]
    pub fn with_mid_bottom(anchor: Point, size: Size) -> Self {
        Self::from_origin_and_size(
            Point::new(anchor.x - size.width / 2.0, anchor.y - size.height),
            size,
        )
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// X coordinate of the left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.origin.x
    }

    /// X coordinate of the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Y coordinate of the top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.origin.y
    }

    /// Y coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// X coordinate of the vertical centre line.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.origin.x + self.size.width / 2.0
    }

    /// Midpoint of the top edge.
    #[must_use]
    pub fn mid_top(&self) -> Point {
        Point::new(self.center_x(), self.top())
    }

    /// Midpoint of the bottom edge.
    #[must_use]
    pub fn mid_bottom(&self) -> Point {
        Point::new(self.center_x(), self.bottom())
    }

    /// Returns a copy moved by the provided offsets.
    #[must_use]
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self::from_origin_and_size(
            Point::new(self.origin.x + dx, self.origin.y + dy),
            self.size,
        )
    }

    /// Returns a copy whose left edge sits at `x`.
    #[must_use]
    pub fn with_left(self, x: f32) -> Self {
        Self::from_origin_and_size(Point::new(x, self.origin.y), self.size)
    }

    /// Reports whether the rectangles overlap. Rectangles that only share an
    /// edge do not overlap.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Playable screen area. The origin is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    width: f32,
    height: f32,
}

impl Arena {
    /// Creates a new arena descriptor. Negative dimensions collapse to zero.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Width of the arena.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the arena.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Midpoint of the bottom edge, where the ship is parked.
    #[must_use]
    pub fn mid_bottom(&self) -> Point {
        Point::new(self.width / 2.0, self.height)
    }
}

/// Opaque colour expressed as byte RGB components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Tunable constants for a game session.
///
/// Speeds are expressed in world units per simulated frame; the simulation
/// runs `frame_rate` frames per second.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Colour used to clear the arena.
    pub bg_color: Rgb,
    /// Horizontal distance the ship covers per frame.
    pub ship_speed: f32,
    /// Ships available at the start of a game.
    pub ship_limit: u32,
    /// Bounds of the ship sprite.
    pub ship_size: Size,
    /// Vertical distance a bullet covers per frame.
    pub bullet_speed: f32,
    /// Width of a bullet.
    pub bullet_width: f32,
    /// Height of a bullet.
    pub bullet_height: f32,
    /// Colour used to draw bullets.
    pub bullet_color: Rgb,
    /// Maximum number of bullets in flight at once.
    pub bullets_allowed: usize,
    /// Horizontal distance each alien covers per frame.
    pub alien_speed: f32,
    /// Bounds of the alien sprite.
    pub alien_size: Size,
    /// Distance the fleet drops whenever it reverses direction.
    pub fleet_drop_speed: f32,
    /// Pause after losing a ship, in seconds.
    pub ship_hit_pause_secs: f32,
    /// Simulated frames per second.
    pub frame_rate: u32,
}

impl Settings {
    /// Bounds of a freshly fired bullet.
    #[must_use]
    pub const fn bullet_size(&self) -> Size {
        Size::new(self.bullet_width, self.bullet_height)
    }

    /// Pause after losing a ship.
    #[must_use]
    pub fn ship_hit_pause(&self) -> Duration {
        Duration::try_from_secs_f32(self.ship_hit_pause_secs).unwrap_or(Duration::ZERO)
    }

    /// Duration of one simulated frame. Zero when the frame rate is zero.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        if self.frame_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs(1) / self.frame_rate
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bg_color: Rgb::from_rgb(230, 230, 230),
            ship_speed: 1.5,
            ship_limit: 3,
            ship_size: Size::new(60.0, 48.0),
            bullet_speed: 20.0,
            bullet_width: 3.0,
            bullet_height: 15.0,
            bullet_color: Rgb::from_rgb(60, 60, 60),
            bullets_allowed: 3,
            alien_speed: 1.0,
            alien_size: Size::new(60.0, 58.0),
            fleet_drop_speed: 10.0,
            ship_hit_pause_secs: 0.5,
            frame_rate: 60,
        }
    }
}

/// Immutable representation of the ship used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipSnapshot {
    /// Current bounds of the ship.
    pub rect: Rect,
    /// Whether the left thruster is engaged.
    pub moving_left: bool,
    /// Whether the right thruster is engaged.
    pub moving_right: bool,
}

/// Immutable representation of a single bullet used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Identifier assigned to the bullet.
    pub id: BulletId,
    /// Current bounds of the bullet.
    pub rect: Rect,
}

/// Read-only snapshot describing all bullets in flight.
#[derive(Clone, Debug, Default)]
pub struct BulletView {
    snapshots: Vec<BulletSnapshot>,
}

impl BulletView {
    /// Creates a new bullet view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BulletSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured bullet snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BulletSnapshot> {
        self.snapshots.iter()
    }

    /// Number of bullets captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no bullets are in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BulletSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single alien used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlienSnapshot {
    /// Identifier assigned to the alien.
    pub id: AlienId,
    /// Current bounds of the alien.
    pub rect: Rect,
}

/// Read-only snapshot describing the fleet.
#[derive(Clone, Debug, Default)]
pub struct AlienView {
    snapshots: Vec<AlienSnapshot>,
}

impl AlienView {
    /// Creates a new alien view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AlienSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured alien snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AlienSnapshot> {
        self.snapshots.iter()
    }

    /// Number of aliens captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the fleet is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AlienSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AlienId, AlienSnapshot, AlienView, FleetDirection, Point, Rect, Settings, Size,
    };
    use std::time::Duration;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect::from_origin_and_size(Point::new(x, y), Size::new(width, height))
    }

    #[test]
    fn overlapping_rects_intersect() {
        let first = rect(0.0, 0.0, 10.0, 10.0);
        let second = rect(5.0, 5.0, 10.0, 10.0);
        assert!(first.intersects(&second));
        assert!(second.intersects(&first));
    }

    #[test]
    fn rects_sharing_an_edge_do_not_intersect() {
        let first = rect(0.0, 0.0, 10.0, 10.0);
        let right_neighbour = rect(10.0, 0.0, 10.0, 10.0);
        let lower_neighbour = rect(0.0, 10.0, 10.0, 10.0);
        assert!(!first.intersects(&right_neighbour));
        assert!(!first.intersects(&lower_neighbour));
    }

    #[test]
    fn contained_rect_intersects() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let inner = rect(40.0, 40.0, 3.0, 15.0);
        assert!(outer.intersects(&inner));
    }

    #[test]
    fn mid_anchors_centre_the_rect() {
        let size = Size::new(60.0, 48.0);
        let parked = Rect::with_mid_bottom(Point::new(600.0, 800.0), size);
        assert_eq!(parked.left(), 570.0);
        assert_eq!(parked.top(), 752.0);
        assert_eq!(parked.mid_bottom(), Point::new(600.0, 800.0));

        let bullet = Rect::with_mid_top(parked.mid_top(), Size::new(3.0, 15.0));
        assert_eq!(bullet.top(), parked.top());
        assert_eq!(bullet.center_x(), parked.center_x());
    }

    #[test]
    fn fleet_direction_flips_sign() {
        assert_eq!(FleetDirection::default(), FleetDirection::Right);
        assert_eq!(FleetDirection::Right.sign(), 1.0);
        assert_eq!(FleetDirection::Right.reversed(), FleetDirection::Left);
        assert_eq!(FleetDirection::Left.sign(), -1.0);
        assert_eq!(FleetDirection::Left.reversed(), FleetDirection::Right);
    }

    #[test]
    fn default_settings_match_classic_tuning() {
        let settings = Settings::default();
        assert_eq!(settings.ship_limit, 3);
        assert_eq!(settings.bullets_allowed, 3);
        assert_eq!(settings.fleet_drop_speed, 10.0);
        assert_eq!(settings.ship_hit_pause(), Duration::from_millis(500));
        assert_eq!(settings.frame_duration(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn partial_settings_fall_back_to_defaults() {
        let settings: Settings = toml::from_str(
            "ship_speed = 3.0\nbullets_allowed = 5\nalien_size = { width = 40.0, height = 30.0 }\n",
        )
        .expect("partial settings parse");

        assert_eq!(settings.ship_speed, 3.0);
        assert_eq!(settings.bullets_allowed, 5);
        assert_eq!(settings.alien_size, Size::new(40.0, 30.0));
        assert_eq!(settings.ship_limit, Settings::default().ship_limit);
        assert_eq!(settings.bg_color, Settings::default().bg_color);
    }

    #[test]
    fn unknown_settings_are_rejected() {
        assert!(toml::from_str::<Settings>("warp_speed = 9.0\n").is_err());
    }

    #[test]
    fn zero_frame_rate_yields_zero_frame_duration() {
        let settings = Settings {
            frame_rate: 0,
            ..Settings::default()
        };
        assert_eq!(settings.frame_duration(), Duration::ZERO);
    }

    #[test]
    fn alien_view_iterates_in_id_order() {
        let view = AlienView::from_snapshots(vec![
            AlienSnapshot {
                id: AlienId::new(7),
                rect: rect(0.0, 0.0, 1.0, 1.0),
            },
            AlienSnapshot {
                id: AlienId::new(2),
                rect: rect(5.0, 0.0, 1.0, 1.0),
            },
        ]);
        let ids: Vec<u32> = view.iter().map(|alien| alien.id.get()).collect();
        assert_eq!(ids, vec![2, 7]);
    }
}
