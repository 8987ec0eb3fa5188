#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that detects bullet, ship and fleet overlaps.
//!
//! All tests are axis-aligned rectangle overlaps. The system never mutates
//! the world; it answers with `DestroyAlien` and `HitShip` commands that the
//! world applies afterwards.

use alien_invasion_core::{
    AlienId, AlienView, Arena, BulletView, Command, HitCause, ShipSnapshot,
};

/// Collision system with reusable scratch storage.
#[derive(Debug, Default)]
pub struct Collision {
    destroyed: Vec<AlienId>,
}

impl Collision {
    /// Creates a new collision system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sweeps every bullet against the fleet, removing both sides of each hit.
    ///
    /// Bullets are visited in id order. A bullet destroys every alien it
    /// overlaps, and an alien destroyed by an earlier bullet cannot be struck
    /// again within the same sweep.
    pub fn bullet_hits(&mut self, bullets: &BulletView, aliens: &AlienView, out: &mut Vec<Command>) {
        if bullets.is_empty() || aliens.is_empty() {
            return;
        }

        self.destroyed.clear();
        for bullet in bullets.iter() {
            for alien in aliens.iter() {
                if self.destroyed.contains(&alien.id) || !bullet.rect.intersects(&alien.rect) {
                    continue;
                }
                self.destroyed.push(alien.id);
                out.push(Command::DestroyAlien {
                    bullet: bullet.id,
                    alien: alien.id,
                });
            }
        }
    }

    /// Emits at most one `Command::HitShip` when the fleet reached the ship.
    ///
    /// An alien overlapping the ship takes precedence over an alien touching
    /// the bottom of the arena.
    pub fn ship_hits(
        &self,
        ship: &ShipSnapshot,
        aliens: &AlienView,
        arena: Arena,
        out: &mut Vec<Command>,
    ) {
        if let Some(cause) = ship_hit_cause(ship, aliens, arena) {
            out.push(Command::HitShip { cause });
        }
    }
}

fn ship_hit_cause(ship: &ShipSnapshot, aliens: &AlienView, arena: Arena) -> Option<HitCause> {
    if aliens.iter().any(|alien| alien.rect.intersects(&ship.rect)) {
        return Some(HitCause::Collision);
    }

    if aliens
        .iter()
        .any(|alien| alien.rect.bottom() >= arena.height())
    {
        return Some(HitCause::Landed);
    }

    None
}
