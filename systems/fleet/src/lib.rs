#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that lays out the alien fleet and steers its march.

use alien_invasion_core::{AlienView, Arena, Command, Event, Point, Size};

/// Computes the top-left origins of a freshly formed fleet.
///
/// Aliens are spaced one alien width apart horizontally and one alien height
/// apart vertically. Rows stop three alien heights above the bottom edge so
/// the ship has room to manoeuvre, and columns stop two alien widths before
/// the right edge. Degenerate alien sizes yield an empty fleet.
#[must_use]
pub fn formation(arena: Arena, alien: Size) -> Vec<Point> {
    if alien.width <= 0.0 || alien.height <= 0.0 {
        return Vec::new();
    }

    let mut origins = Vec::new();
    let mut y = alien.height;
    while y < arena.height() - 3.0 * alien.height {
        let mut x = alien.width;
        while x < arena.width() - 2.0 * alien.width {
            origins.push(Point::new(x, y));
            x += 2.0 * alien.width;
        }
        y += 2.0 * alien.height;
    }
    origins
}

/// Fleet system that replaces beaten fleets and steers the living one.
#[derive(Debug)]
pub struct Fleet {
    alien_size: Size,
}

impl Fleet {
    /// Creates a fleet system that forms aliens of the provided size.
    #[must_use]
    pub const fn new(alien_size: Size) -> Self {
        Self { alien_size }
    }

    /// Emits a single `Command::SpawnFleet` when the events call for a fresh fleet.
    ///
    /// A new fleet is needed once the arena is configured, after the previous
    /// fleet was destroyed, after the ship was hit, and when a game restarts.
    pub fn reform(&self, events: &[Event], arena: Arena, out: &mut Vec<Command>) {
        let needs_fleet = events.iter().any(|event| {
            matches!(
                event,
                Event::ArenaConfigured { .. }
                    | Event::FleetDestroyed
                    | Event::ShipHit { .. }
                    | Event::GameRestarted { .. }
            )
        });
        if !needs_fleet {
            return;
        }

        let origins = formation(arena, self.alien_size);
        log::debug!("forming fleet of {} aliens", origins.len());
        out.push(Command::SpawnFleet { origins });
    }

    /// Emits the commands that move the fleet by one frame.
    ///
    /// When any alien touches either side of the arena the whole fleet first
    /// drops and reverses via `Command::ChangeFleetDirection`, then every
    /// alien advances with `Command::AdvanceFleet`.
    pub fn march(&self, aliens: &AlienView, arena: Arena, out: &mut Vec<Command>) {
        if aliens.is_empty() {
            return;
        }

        let at_edge = aliens
            .iter()
            .any(|alien| alien.rect.right() >= arena.width() || alien.rect.left() <= 0.0);
        if at_edge {
            out.push(Command::ChangeFleetDirection);
        }
        out.push(Command::AdvanceFleet);
    }
}
