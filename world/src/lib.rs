#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Alien Invasion.

use std::time::Duration;

use alien_invasion_core::{
    AlienId, Arena, BulletId, Command, Event, FireError, FleetDirection, HitCause,
    HorizontalDirection, PlayMode, Point, Rect, Settings,
};

const DEFAULT_ARENA_WIDTH: f32 = 1200.0;
const DEFAULT_ARENA_HEIGHT: f32 = 800.0;

/// Represents the authoritative Alien Invasion world state.
#[derive(Debug)]
pub struct World {
    settings: Settings,
    arena: Arena,
    ship: Ship,
    bullets: Vec<Bullet>,
    aliens: Vec<Alien>,
    fleet_direction: FleetDirection,
    stats: GameStats,
    play_mode: PlayMode,
    recovery: Duration,
    next_bullet_id: u32,
    next_alien_id: u32,
}

impl World {
    /// Creates a new world using the provided settings and the classic 1200x800 arena.
    ///
    /// The fleet starts empty; systems populate it once the arena is configured.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let arena = Arena::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT);
        let ship = Ship::parked(&arena, &settings);
        let stats = GameStats::new(&settings);
        Self {
            settings,
            arena,
            ship,
            bullets: Vec::new(),
            aliens: Vec::new(),
            fleet_direction: FleetDirection::default(),
            stats,
            play_mode: PlayMode::Active,
            recovery: Duration::ZERO,
            next_bullet_id: 0,
            next_alien_id: 0,
        }
    }

    fn is_running(&self) -> bool {
        self.play_mode == PlayMode::Active && self.recovery.is_zero()
    }

    fn allocate_bullet_id(&mut self) -> BulletId {
        let id = BulletId::new(self.next_bullet_id);
        self.next_bullet_id = self.next_bullet_id.wrapping_add(1);
        id
    }

    fn allocate_alien_id(&mut self) -> AlienId {
        let id = AlienId::new(self.next_alien_id);
        self.next_alien_id = self.next_alien_id.wrapping_add(1);
        id
    }

    fn reset_round(&mut self) {
        self.bullets.clear();
        self.aliens.clear();
        self.ship.center(&self.arena, &self.settings);
    }

    fn fire_bullet(&mut self, out_events: &mut Vec<Event>) {
        let rejection = if self.play_mode == PlayMode::GameOver {
            Some(FireError::GameOver)
        } else if !self.recovery.is_zero() {
            Some(FireError::Recovering)
        } else if self.bullets.len() >= self.settings.bullets_allowed {
            Some(FireError::LimitReached)
        } else {
            None
        };

        if let Some(reason) = rejection {
            out_events.push(Event::BulletRejected { reason });
            return;
        }

        let id = self.allocate_bullet_id();
        let rect = Rect::with_mid_top(self.ship.rect.mid_top(), self.settings.bullet_size());
        self.bullets.push(Bullet { id, rect });
        out_events.push(Event::BulletFired { bullet: id, rect });
    }

    fn destroy_alien(&mut self, bullet: BulletId, alien: AlienId, out_events: &mut Vec<Event>) {
        self.bullets.retain(|candidate| candidate.id != bullet);

        let Some(index) = self.aliens.iter().position(|candidate| candidate.id == alien) else {
            return;
        };
        let _ = self.aliens.remove(index);
        out_events.push(Event::AlienDestroyed { alien, bullet });

        if self.aliens.is_empty() {
            out_events.push(Event::FleetDestroyed);
        }
    }

    fn prune_bullets(&mut self, out_events: &mut Vec<Event>) {
        self.bullets.retain(|bullet| {
            if bullet.rect.bottom() <= 0.0 {
                out_events.push(Event::BulletExpired { bullet: bullet.id });
                false
            } else {
                true
            }
        });
    }

    fn spawn_fleet(&mut self, origins: Vec<Point>, out_events: &mut Vec<Event>) {
        self.bullets.clear();
        self.aliens.clear();
        let size = self.settings.alien_size;
        for origin in origins {
            let id = self.allocate_alien_id();
            self.aliens.push(Alien {
                id,
                rect: Rect::from_origin_and_size(origin, size),
            });
        }
        out_events.push(Event::FleetSpawned {
            count: self.aliens.len(),
        });
    }

    fn hit_ship(&mut self, cause: HitCause, out_events: &mut Vec<Event>) {
        if self.stats.lives > 0 {
            self.stats.lives -= 1;
            self.reset_round();
            self.recovery = self.settings.ship_hit_pause();
            out_events.push(Event::ShipHit {
                cause,
                lives_remaining: self.stats.lives,
            });
        } else {
            self.play_mode = PlayMode::GameOver;
            out_events.push(Event::GameOver);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena { width, height } => {
            world.arena = Arena::new(width, height);
            world.reset_round();
            out_events.push(Event::ArenaConfigured { arena: world.arena });
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });

            if !world.recovery.is_zero() {
                world.recovery = world.recovery.saturating_sub(dt);
                if world.recovery.is_zero() {
                    out_events.push(Event::RecoveryElapsed);
                }
            }
        }
        Command::SetShipThrust { direction, engaged } => match direction {
            HorizontalDirection::Left => world.ship.moving_left = engaged,
            HorizontalDirection::Right => world.ship.moving_right = engaged,
        },
        Command::AdvanceShip => {
            if !world.is_running() {
                return;
            }
            let from = world.ship.x;
            world.ship.update(&world.arena, world.settings.ship_speed);
            if world.ship.x != from {
                out_events.push(Event::ShipMoved {
                    from,
                    to: world.ship.x,
                });
            }
        }
        Command::FireBullet => world.fire_bullet(out_events),
        Command::AdvanceBullets => {
            if !world.is_running() {
                return;
            }
            let speed = world.settings.bullet_speed;
            for bullet in &mut world.bullets {
                bullet.rect = bullet.rect.translate(0.0, -speed);
            }
        }
        Command::DestroyAlien { bullet, alien } => {
            if world.is_running() {
                world.destroy_alien(bullet, alien, out_events);
            }
        }
        Command::PruneBullets => world.prune_bullets(out_events),
        Command::SpawnFleet { origins } => {
            if world.play_mode == PlayMode::Active {
                world.spawn_fleet(origins, out_events);
            }
        }
        Command::ChangeFleetDirection => {
            if !world.is_running() {
                return;
            }
            let drop = world.settings.fleet_drop_speed;
            for alien in &mut world.aliens {
                alien.rect = alien.rect.translate(0.0, drop);
            }
            world.fleet_direction = world.fleet_direction.reversed();
            out_events.push(Event::FleetDirectionChanged {
                direction: world.fleet_direction,
            });
        }
        Command::AdvanceFleet => {
            if !world.is_running() {
                return;
            }
            let dx = world.settings.alien_speed * world.fleet_direction.sign();
            for alien in &mut world.aliens {
                alien.rect = alien.rect.translate(dx, 0.0);
            }
        }
        Command::HitShip { cause } => {
            if world.is_running() {
                world.hit_ship(cause, out_events);
            }
        }
        Command::RestartGame => {
            if world.play_mode != PlayMode::GameOver {
                return;
            }
            world.stats.reset(&world.settings);
            world.play_mode = PlayMode::Active;
            world.recovery = Duration::ZERO;
            world.reset_round();
            out_events.push(Event::GameRestarted {
                lives: world.stats.lives,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use alien_invasion_core::{
        AlienSnapshot, AlienView, Arena, BulletSnapshot, BulletView, FleetDirection, PlayMode,
        Settings, ShipSnapshot,
    };

    /// Provides read-only access to the settings the world was created with.
    #[must_use]
    pub fn settings(world: &World) -> &Settings {
        &world.settings
    }

    /// Provides the active arena bounds.
    #[must_use]
    pub fn arena(world: &World) -> Arena {
        world.arena
    }

    /// Captures the ship's current state.
    #[must_use]
    pub fn ship(world: &World) -> ShipSnapshot {
        ShipSnapshot {
            rect: world.ship.rect,
            moving_left: world.ship.moving_left,
            moving_right: world.ship.moving_right,
        }
    }

    /// Captures a read-only view of the bullets in flight.
    #[must_use]
    pub fn bullet_view(world: &World) -> BulletView {
        BulletView::from_snapshots(
            world
                .bullets
                .iter()
                .map(|bullet| BulletSnapshot {
                    id: bullet.id,
                    rect: bullet.rect,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the fleet.
    #[must_use]
    pub fn alien_view(world: &World) -> AlienView {
        AlienView::from_snapshots(
            world
                .aliens
                .iter()
                .map(|alien| AlienSnapshot {
                    id: alien.id,
                    rect: alien.rect,
                })
                .collect(),
        )
    }

    /// Ships left to the player.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.stats.lives
    }

    /// Reports the current play mode.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Reports whether the world is paused after a ship hit.
    #[must_use]
    pub fn is_recovering(world: &World) -> bool {
        !world.recovery.is_zero()
    }

    /// Reports whether gameplay commands currently take effect.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.is_running()
    }

    /// Direction the fleet currently marches in.
    #[must_use]
    pub fn fleet_direction(world: &World) -> FleetDirection {
        world.fleet_direction
    }
}

#[derive(Clone, Debug)]
struct Ship {
    rect: Rect,
    x: f32,
    moving_left: bool,
    moving_right: bool,
}

impl Ship {
    fn parked(arena: &Arena, settings: &Settings) -> Self {
        let rect = Rect::with_mid_bottom(arena.mid_bottom(), settings.ship_size);
        Self {
            rect,
            x: rect.left(),
            moving_left: false,
            moving_right: false,
        }
    }

    fn center(&mut self, arena: &Arena, settings: &Settings) {
        self.rect = Rect::with_mid_bottom(arena.mid_bottom(), settings.ship_size);
        self.x = self.rect.left();
    }

    fn update(&mut self, arena: &Arena, speed: f32) {
        if self.moving_right && self.rect.right() < arena.width() {
            self.x += speed;
        }
        if self.moving_left && self.rect.left() > 0.0 {
            self.x -= speed;
        }
        self.rect = self.rect.with_left(self.x);
    }
}

#[derive(Clone, Copy, Debug)]
struct Bullet {
    id: BulletId,
    rect: Rect,
}

#[derive(Clone, Copy, Debug)]
struct Alien {
    id: AlienId,
    rect: Rect,
}

#[derive(Clone, Copy, Debug)]
struct GameStats {
    lives: u32,
}

impl GameStats {
    fn new(settings: &Settings) -> Self {
        Self {
            lives: settings.ship_limit,
        }
    }

    fn reset(&mut self, settings: &Settings) {
        self.lives = settings.ship_limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alien_invasion_core::Size;

    fn world() -> World {
        World::new(Settings::default())
    }

    fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            apply(world, command, &mut events);
        }
        events
    }

    #[test]
    fn new_world_parks_ship_at_bottom_centre() {
        let world = world();
        let ship = query::ship(&world);

        assert_eq!(ship.rect.mid_bottom(), Point::new(600.0, 800.0));
        assert_eq!(ship.rect.size(), Size::new(60.0, 48.0));
        assert_eq!(query::lives(&world), 3);
        assert_eq!(query::play_mode(&world), PlayMode::Active);
        assert!(query::alien_view(&world).is_empty());
    }

    #[test]
    fn configure_arena_recentres_ship_and_reports_arena() {
        let mut world = world();
        let events = apply_all(
            &mut world,
            vec![Command::ConfigureArena {
                width: 400.0,
                height: 300.0,
            }],
        );

        assert_eq!(
            events,
            vec![Event::ArenaConfigured {
                arena: Arena::new(400.0, 300.0)
            }]
        );
        assert_eq!(
            query::ship(&world).rect.mid_bottom(),
            Point::new(200.0, 300.0)
        );
    }

    #[test]
    fn ship_moves_only_while_thruster_engaged() {
        let mut world = world();
        let start = query::ship(&world).rect.left();

        let events = apply_all(
            &mut world,
            vec![
                Command::SetShipThrust {
                    direction: HorizontalDirection::Right,
                    engaged: true,
                },
                Command::AdvanceShip,
                Command::AdvanceShip,
                Command::SetShipThrust {
                    direction: HorizontalDirection::Right,
                    engaged: false,
                },
                Command::AdvanceShip,
            ],
        );

        assert_eq!(query::ship(&world).rect.left(), start + 3.0);
        let moves = events
            .iter()
            .filter(|event| matches!(event, Event::ShipMoved { .. }))
            .count();
        assert_eq!(moves, 2);
    }

    #[test]
    fn opposing_thrusters_cancel_out() {
        let mut world = world();
        let start = query::ship(&world).rect.left();

        let events = apply_all(
            &mut world,
            vec![
                Command::SetShipThrust {
                    direction: HorizontalDirection::Right,
                    engaged: true,
                },
                Command::SetShipThrust {
                    direction: HorizontalDirection::Left,
                    engaged: true,
                },
                Command::AdvanceShip,
            ],
        );

        assert_eq!(query::ship(&world).rect.left(), start);
        assert!(events.is_empty());
    }

    #[test]
    fn ship_stops_at_left_edge() {
        let mut world = World::new(Settings {
            ship_speed: 100.0,
            ..Settings::default()
        });
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetShipThrust {
                direction: HorizontalDirection::Left,
                engaged: true,
            },
            &mut events,
        );
        for _ in 0..20 {
            apply(&mut world, Command::AdvanceShip, &mut events);
        }

        // 570 -> 470 -> ... -> -30, then the left edge is no longer positive.
        assert_eq!(query::ship(&world).rect.left(), -30.0);
    }

    #[test]
    fn bullets_spawn_from_ship_nose_up_to_limit() {
        let mut world = world();
        let events = apply_all(&mut world, vec![Command::FireBullet; 4]);

        assert_eq!(query::bullet_view(&world).len(), 3);
        assert_eq!(
            events.last(),
            Some(&Event::BulletRejected {
                reason: FireError::LimitReached
            })
        );

        let ship = query::ship(&world);
        for bullet in query::bullet_view(&world).iter() {
            assert_eq!(bullet.rect.mid_top(), ship.rect.mid_top());
            assert_eq!(bullet.rect.size(), Size::new(3.0, 15.0));
        }
    }

    #[test]
    fn bullets_expire_once_past_the_top_edge() {
        let mut world = world();
        let mut events = Vec::new();
        apply(&mut world, Command::FireBullet, &mut events);
        events.clear();

        // The bullet's top starts at 752 and its bottom at 767; 39 frames of 20
        // leave the bottom at -13.
        for _ in 0..38 {
            apply(&mut world, Command::AdvanceBullets, &mut events);
            apply(&mut world, Command::PruneBullets, &mut events);
        }
        assert!(events.is_empty());
        assert_eq!(query::bullet_view(&world).len(), 1);

        apply(&mut world, Command::AdvanceBullets, &mut events);
        apply(&mut world, Command::PruneBullets, &mut events);
        assert_eq!(
            events,
            vec![Event::BulletExpired {
                bullet: BulletId::new(0)
            }]
        );
        assert!(query::bullet_view(&world).is_empty());
    }

    #[test]
    fn spawn_fleet_replaces_aliens_and_clears_bullets() {
        let mut world = world();
        let events = apply_all(
            &mut world,
            vec![
                Command::FireBullet,
                Command::SpawnFleet {
                    origins: vec![Point::new(60.0, 58.0), Point::new(180.0, 58.0)],
                },
            ],
        );

        assert_eq!(events.last(), Some(&Event::FleetSpawned { count: 2 }));
        assert!(query::bullet_view(&world).is_empty());
        let aliens = query::alien_view(&world).into_vec();
        assert_eq!(aliens.len(), 2);
        assert_eq!(aliens[1].rect.origin(), Point::new(180.0, 58.0));
        assert_eq!(aliens[1].rect.size(), Size::new(60.0, 58.0));
    }

    #[test]
    fn destroying_last_alien_reports_fleet_destroyed() {
        let mut world = world();
        let mut events = apply_all(
            &mut world,
            vec![
                Command::SpawnFleet {
                    origins: vec![Point::new(60.0, 58.0), Point::new(180.0, 58.0)],
                },
                Command::FireBullet,
                Command::FireBullet,
            ],
        );
        events.clear();

        apply(
            &mut world,
            Command::DestroyAlien {
                bullet: BulletId::new(0),
                alien: AlienId::new(0),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::AlienDestroyed {
                alien: AlienId::new(0),
                bullet: BulletId::new(0),
            }]
        );
        assert_eq!(query::bullet_view(&world).len(), 1);

        events.clear();
        apply(
            &mut world,
            Command::DestroyAlien {
                bullet: BulletId::new(1),
                alien: AlienId::new(1),
            },
            &mut events,
        );
        assert_eq!(events.last(), Some(&Event::FleetDestroyed));
        assert!(query::alien_view(&world).is_empty());
    }

    #[test]
    fn destroying_missing_alien_still_consumes_bullet() {
        let mut world = world();
        let mut events = apply_all(&mut world, vec![Command::FireBullet]);
        events.clear();

        apply(
            &mut world,
            Command::DestroyAlien {
                bullet: BulletId::new(0),
                alien: AlienId::new(99),
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert!(query::bullet_view(&world).is_empty());
    }

    #[test]
    fn fleet_marches_and_reverses() {
        let mut world = world();
        let _ = apply_all(
            &mut world,
            vec![
                Command::SpawnFleet {
                    origins: vec![Point::new(100.0, 100.0)],
                },
                Command::AdvanceFleet,
                Command::AdvanceFleet,
            ],
        );
        assert_eq!(
            query::alien_view(&world).into_vec()[0].rect.origin(),
            Point::new(102.0, 100.0)
        );

        let events = apply_all(
            &mut world,
            vec![Command::ChangeFleetDirection, Command::AdvanceFleet],
        );
        assert_eq!(
            events,
            vec![Event::FleetDirectionChanged {
                direction: FleetDirection::Left
            }]
        );
        assert_eq!(
            query::alien_view(&world).into_vec()[0].rect.origin(),
            Point::new(101.0, 110.0)
        );
    }

    #[test]
    fn ship_hit_costs_a_life_and_resets_round() {
        let mut world = world();
        let mut events = apply_all(
            &mut world,
            vec![
                Command::SpawnFleet {
                    origins: vec![Point::new(100.0, 100.0)],
                },
                Command::FireBullet,
                Command::SetShipThrust {
                    direction: HorizontalDirection::Left,
                    engaged: true,
                },
                Command::AdvanceShip,
            ],
        );
        events.clear();

        apply(
            &mut world,
            Command::HitShip {
                cause: HitCause::Collision,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::ShipHit {
                cause: HitCause::Collision,
                lives_remaining: 2,
            }]
        );
        assert_eq!(query::lives(&world), 2);
        assert!(query::alien_view(&world).is_empty());
        assert!(query::bullet_view(&world).is_empty());
        assert_eq!(
            query::ship(&world).rect.mid_bottom(),
            Point::new(600.0, 800.0)
        );
        assert!(query::is_recovering(&world));
        assert!(!query::is_running(&world));
    }

    #[test]
    fn tick_outside_recovery_only_reports_elapsed_time() {
        let mut world = world();
        let dt = Duration::from_millis(16);
        let events = apply_all(&mut world, vec![Command::Tick { dt }, Command::Tick { dt }]);

        assert_eq!(
            events,
            vec![Event::TimeAdvanced { dt }, Event::TimeAdvanced { dt }]
        );
        assert!(query::is_running(&world));
        assert_eq!(query::play_mode(&world), PlayMode::Active);
    }

    #[test]
    fn recovery_blocks_gameplay_until_pause_elapses() {
        let mut world = world();
        let mut events = apply_all(
            &mut world,
            vec![Command::HitShip {
                cause: HitCause::Landed,
            }],
        );
        events.clear();

        apply(&mut world, Command::FireBullet, &mut events);
        assert_eq!(
            events,
            vec![Event::BulletRejected {
                reason: FireError::Recovering
            }]
        );

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(300),
            },
            &mut events,
        );
        assert!(query::is_recovering(&world));

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(300),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced {
                    dt: Duration::from_millis(300)
                },
                Event::RecoveryElapsed,
            ]
        );
        assert!(query::is_running(&world));
    }

    #[test]
    fn hit_with_no_lives_left_ends_the_game() {
        let mut world = World::new(Settings {
            ship_limit: 1,
            ship_hit_pause_secs: 0.0,
            ..Settings::default()
        });
        let events = apply_all(
            &mut world,
            vec![
                Command::HitShip {
                    cause: HitCause::Collision,
                },
                Command::HitShip {
                    cause: HitCause::Collision,
                },
            ],
        );

        assert_eq!(
            events,
            vec![
                Event::ShipHit {
                    cause: HitCause::Collision,
                    lives_remaining: 0,
                },
                Event::GameOver,
            ]
        );
        assert_eq!(query::lives(&world), 0);
        assert_eq!(query::play_mode(&world), PlayMode::GameOver);

        let mut rejected = Vec::new();
        apply(&mut world, Command::FireBullet, &mut rejected);
        assert_eq!(
            rejected,
            vec![Event::BulletRejected {
                reason: FireError::GameOver
            }]
        );
    }

    #[test]
    fn restart_only_applies_after_game_over() {
        let mut world = World::new(Settings {
            ship_limit: 0,
            ..Settings::default()
        });
        let ignored = apply_all(&mut world, vec![Command::RestartGame]);
        assert!(ignored.is_empty());

        let events = apply_all(
            &mut world,
            vec![
                Command::HitShip {
                    cause: HitCause::Collision,
                },
                Command::RestartGame,
            ],
        );
        assert_eq!(
            events,
            vec![Event::GameOver, Event::GameRestarted { lives: 0 }]
        );
        assert_eq!(query::play_mode(&world), PlayMode::Active);
    }
}
