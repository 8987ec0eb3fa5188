#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns player input into world commands.

use alien_invasion_core::{Command, HorizontalDirection};

/// Edge observed for a held key during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyTransition {
    /// The key neither went down nor came up.
    #[default]
    Unchanged,
    /// The key went down.
    Pressed,
    /// The key came up.
    Released,
}

/// Player input gathered by adapters for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// Edge observed for the key steering the ship left.
    pub move_left: KeyTransition,
    /// Edge observed for the key steering the ship right.
    pub move_right: KeyTransition,
    /// Whether the fire key went down.
    pub fire: bool,
    /// Whether the restart key went down.
    pub restart: bool,
}

/// Controls system translating input edges into commands.
#[derive(Debug, Default)]
pub struct Controls;

impl Controls {
    /// Emits thrust, fire and restart commands for the provided input.
    ///
    /// Thrust commands precede `Command::FireBullet` so a bullet fired on the
    /// same frame launches from the ship's current position.
    pub fn handle(&mut self, input: ControlInput, out: &mut Vec<Command>) {
        push_thrust(HorizontalDirection::Right, input.move_right, out);
        push_thrust(HorizontalDirection::Left, input.move_left, out);

        if input.fire {
            out.push(Command::FireBullet);
        }

        if input.restart {
            out.push(Command::RestartGame);
        }
    }
}

fn push_thrust(direction: HorizontalDirection, transition: KeyTransition, out: &mut Vec<Command>) {
    let engaged = match transition {
        KeyTransition::Unchanged => return,
        KeyTransition::Pressed => true,
        KeyTransition::Released => false,
    };
    out.push(Command::SetShipThrust { direction, engaged });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_input_is_silent() {
        let mut controls = Controls;
        let mut out = Vec::new();
        controls.handle(ControlInput::default(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn key_edges_map_to_thrust_commands() {
        let mut controls = Controls;
        let mut out = Vec::new();
        controls.handle(
            ControlInput {
                move_left: KeyTransition::Released,
                move_right: KeyTransition::Pressed,
                ..ControlInput::default()
            },
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Command::SetShipThrust {
                    direction: HorizontalDirection::Right,
                    engaged: true,
                },
                Command::SetShipThrust {
                    direction: HorizontalDirection::Left,
                    engaged: false,
                },
            ]
        );
    }

    #[test]
    fn fire_and_restart_follow_thrust() {
        let mut controls = Controls;
        let mut out = Vec::new();
        controls.handle(
            ControlInput {
                move_left: KeyTransition::Pressed,
                fire: true,
                restart: true,
                ..ControlInput::default()
            },
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Command::SetShipThrust {
                    direction: HorizontalDirection::Left,
                    engaged: true,
                },
                Command::FireBullet,
                Command::RestartGame,
            ]
        );
    }
}
