use alien_invasion_core::{AlienId, BulletId, Command, Event, HitCause, Point, Settings};
use alien_invasion_system_collision::Collision;
use alien_invasion_world::{self as world, query, World};

fn world_with_aliens(origins: Vec<Point>) -> World {
    let mut world = World::new(Settings::default());
    let mut events = Vec::new();
    world::apply(&mut world, Command::SpawnFleet { origins }, &mut events);
    world
}

fn sweep(world: &mut World, collision: &mut Collision) -> Vec<Event> {
    let mut commands = Vec::new();
    collision.bullet_hits(
        &query::bullet_view(world),
        &query::alien_view(world),
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn bullet_fired_under_alien_destroys_it_and_the_fleet() {
    let mut world = world_with_aliens(vec![Point::new(570.0, 300.0)]);
    let mut collision = Collision::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::FireBullet, &mut events);

    for _ in 0..19 {
        world::apply(&mut world, Command::AdvanceBullets, &mut events);
        assert!(sweep(&mut world, &mut collision).is_empty());
    }

    world::apply(&mut world, Command::AdvanceBullets, &mut events);
    assert_eq!(
        sweep(&mut world, &mut collision),
        vec![
            Event::AlienDestroyed {
                alien: AlienId::new(0),
                bullet: BulletId::new(0),
            },
            Event::FleetDestroyed,
        ]
    );
    assert!(query::bullet_view(&world).is_empty());
    assert!(query::alien_view(&world).is_empty());
}

#[test]
fn descending_alien_hits_the_ship() {
    let mut world = world_with_aliens(vec![Point::new(570.0, 700.0)]);
    let collision = Collision::new();
    let mut commands = Vec::new();

    collision.ship_hits(
        &query::ship(&world),
        &query::alien_view(&world),
        query::arena(&world),
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![Command::HitShip {
            cause: HitCause::Collision
        }]
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    assert_eq!(
        events,
        vec![Event::ShipHit {
            cause: HitCause::Collision,
            lives_remaining: 2,
        }]
    );
}
