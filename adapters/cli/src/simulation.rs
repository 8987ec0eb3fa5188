//! Fixed-timestep game loop that drives the world through its systems and
//! describes the result as a rendering scene.

use std::time::Duration;

use alien_invasion_core::{Command, Event, PlayMode, Rect, Rgb, Settings};
use alien_invasion_rendering::{
    ArenaPresentation, BodyPresentation, ButtonEdge, Color, FrameInput, HudPresentation,
    HudStatus, RenderingError, Scene,
};
use alien_invasion_system_collision::Collision;
use alien_invasion_system_controls::{ControlInput, Controls, KeyTransition};
use alien_invasion_system_fleet::Fleet;
use alien_invasion_world::{self as world, query, World};
use glam::Vec2;

/// Upper bound on simulated frames per rendered frame; any backlog beyond it is dropped.
const MAX_SUBSTEPS: u32 = 8;

const SHIP_COLOR: Color = Color::from_rgb_u8(40, 70, 160);
const ALIEN_COLOR: Color = Color::from_rgb_u8(70, 150, 70);

/// Converts variable render intervals into a whole number of fixed steps.
#[derive(Debug)]
struct FrameClock {
    step: Duration,
    accumulator: Duration,
}

impl FrameClock {
    fn new(step: Duration) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
        }
    }

    /// Banks the elapsed time and returns how many fixed steps are due.
    fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.step.is_zero() {
            return 0;
        }

        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            steps += 1;
        }

        if steps == MAX_SUBSTEPS && self.accumulator >= self.step {
            log::debug!(
                "dropping {:.1}ms of simulation backlog",
                self.accumulator.as_secs_f64() * 1_000.0
            );
            self.accumulator = Duration::ZERO;
        }

        steps
    }
}

/// Owns the world and every system that acts on it.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    controls: Controls,
    fleet: Fleet,
    collision: Collision,
    clock: FrameClock,
}

impl Simulation {
    /// Creates a simulation and forms the opening fleet.
    pub(crate) fn new(settings: Settings) -> Self {
        let clock = FrameClock::new(settings.frame_duration());
        let fleet = Fleet::new(settings.alien_size);
        let world = World::new(settings);
        let mut simulation = Self {
            world,
            controls: Controls,
            fleet,
            collision: Collision::new(),
            clock,
        };

        let arena = query::arena(&simulation.world);
        let events = simulation.execute(vec![Command::ConfigureArena {
            width: arena.width(),
            height: arena.height(),
        }]);
        simulation.reform(&events);
        simulation
    }

    /// Applies the frame's input once, then runs every fixed step that is due.
    ///
    /// Returns the number of fixed steps executed.
    pub(crate) fn advance(&mut self, elapsed: Duration, input: FrameInput) -> u32 {
        let mut commands = Vec::new();
        self.controls.handle(control_input(input), &mut commands);
        let events = self.execute(commands);
        self.reform(&events);

        let steps = self.clock.advance(elapsed);
        let dt = self.clock.step;
        for _ in 0..steps {
            self.step(dt);
        }
        steps
    }

    fn step(&mut self, dt: Duration) {
        let _ = self.execute(vec![Command::Tick { dt }]);
        if !query::is_running(&self.world) {
            return;
        }

        let _ = self.execute(vec![Command::AdvanceShip, Command::AdvanceBullets]);

        let mut commands = Vec::new();
        self.collision.bullet_hits(
            &query::bullet_view(&self.world),
            &query::alien_view(&self.world),
            &mut commands,
        );
        commands.push(Command::PruneBullets);
        let events = self.execute(commands);
        self.reform(&events);

        let mut commands = Vec::new();
        self.fleet.march(
            &query::alien_view(&self.world),
            query::arena(&self.world),
            &mut commands,
        );
        let _ = self.execute(commands);

        let mut commands = Vec::new();
        self.collision.ship_hits(
            &query::ship(&self.world),
            &query::alien_view(&self.world),
            query::arena(&self.world),
            &mut commands,
        );
        let events = self.execute(commands);
        self.reform(&events);
    }

    fn reform(&mut self, events: &[Event]) {
        let mut commands = Vec::new();
        self.fleet
            .reform(events, query::arena(&self.world), &mut commands);
        let _ = self.execute(commands);
    }

    fn execute(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        for event in &events {
            log_event(event);
        }
        events
    }

    /// Builds the opening scene for the rendering backend.
    pub(crate) fn scene(&self) -> Result<Scene, RenderingError> {
        let arena = query::arena(&self.world);
        let settings = query::settings(&self.world);
        let ship = body(&query::ship(&self.world).rect, SHIP_COLOR);
        let mut scene = Scene::new(
            ArenaPresentation::new(arena.width(), arena.height())?,
            to_color(settings.bg_color),
            ship,
            Vec::new(),
            Vec::new(),
            HudPresentation::default(),
        );
        self.populate_scene(&mut scene);
        Ok(scene)
    }

    /// Refreshes the scene with the current world state.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let settings = query::settings(&self.world);
        let bullet_color = to_color(settings.bullet_color);

        scene.background = to_color(settings.bg_color);
        scene.ship = body(&query::ship(&self.world).rect, SHIP_COLOR);

        scene.aliens.clear();
        scene.aliens.extend(
            query::alien_view(&self.world)
                .iter()
                .map(|alien| body(&alien.rect, ALIEN_COLOR)),
        );

        scene.bullets.clear();
        scene.bullets.extend(
            query::bullet_view(&self.world)
                .iter()
                .map(|bullet| body(&bullet.rect, bullet_color)),
        );

        let status = if query::play_mode(&self.world) == PlayMode::GameOver {
            HudStatus::GameOver
        } else if query::is_recovering(&self.world) {
            HudStatus::Recovering
        } else {
            HudStatus::Playing
        };
        scene.hud = HudPresentation {
            lives: query::lives(&self.world),
            status,
        };
    }

    #[cfg(test)]
    fn world(&self) -> &World {
        &self.world
    }
}

fn log_event(event: &Event) {
    match event {
        Event::ShipHit {
            cause,
            lives_remaining,
        } => log::info!("ship hit ({cause:?}), {lives_remaining} ships left"),
        Event::GameOver => log::info!("game over"),
        Event::GameRestarted { lives } => log::info!("new game started with {lives} ships"),
        Event::FleetSpawned { count } => log::debug!("fleet of {count} aliens spawned"),
        Event::FleetDirectionChanged { direction } => {
            log::debug!("fleet now heading {direction:?}")
        }
        Event::RecoveryElapsed => log::debug!("recovery elapsed"),
        _ => {}
    }
}

fn control_input(input: FrameInput) -> ControlInput {
    ControlInput {
        move_left: key_transition(input.move_left),
        move_right: key_transition(input.move_right),
        fire: input.fire,
        restart: input.restart,
    }
}

fn key_transition(edge: ButtonEdge) -> KeyTransition {
    match edge {
        ButtonEdge::Unchanged => KeyTransition::Unchanged,
        ButtonEdge::Pressed => KeyTransition::Pressed,
        ButtonEdge::Released => KeyTransition::Released,
    }
}

fn body(rect: &Rect, color: Color) -> BodyPresentation {
    let size = rect.size();
    BodyPresentation::new(
        Vec2::new(rect.left(), rect.top()),
        Vec2::new(size.width, size.height),
        color,
    )
}

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
}
