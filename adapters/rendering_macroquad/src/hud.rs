//! Heads-up display helpers for the Macroquad rendering backend.
//!
//! All text drawing lives here so the rest of the adapter only deals with
//! shapes.

use alien_invasion_rendering::{HudPresentation, HudStatus};
use macroquad::{
    color::Color,
    text::{draw_text, measure_text},
};

const LIVES_FONT_SIZE: f32 = 28.0;
const BANNER_FONT_SIZE: f32 = 64.0;
const HINT_FONT_SIZE: f32 = 24.0;

/// Screen-space frame of the arena the HUD is anchored to.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HudFrame {
    /// Left edge of the arena on screen.
    pub(crate) left: f32,
    /// Top edge of the arena on screen.
    pub(crate) top: f32,
    /// Width of the arena on screen.
    pub(crate) width: f32,
    /// Height of the arena on screen.
    pub(crate) height: f32,
    /// Colour used for all HUD text.
    pub(crate) text_color: Color,
}

/// Label listing the ships left to the player.
pub(crate) fn lives_label(lives: u32) -> String {
    format!("Ships: {lives}")
}

/// Large centred message for the provided status, if any.
pub(crate) fn banner_text(status: HudStatus) -> Option<(&'static str, Option<&'static str>)> {
    match status {
        HudStatus::Playing => None,
        HudStatus::Recovering => Some(("Ship lost", None)),
        HudStatus::GameOver => Some(("Game over", Some("Press P to play again or Q to quit"))),
    }
}

/// Draws the lives counter and, when relevant, the status banner.
pub(crate) fn draw_hud(hud: HudPresentation, frame: HudFrame) {
    let margin = 12.0;
    let lives = lives_label(hud.lives);
    let _ = draw_text(
        &lives,
        frame.left + margin,
        frame.top + margin + LIVES_FONT_SIZE * 0.75,
        LIVES_FONT_SIZE,
        frame.text_color,
    );

    let Some((headline, hint)) = banner_text(hud.status) else {
        return;
    };

    let centre_x = frame.left + frame.width * 0.5;
    let centre_y = frame.top + frame.height * 0.5;
    draw_centred(headline, centre_x, centre_y, BANNER_FONT_SIZE, frame.text_color);
    if let Some(hint) = hint {
        draw_centred(
            hint,
            centre_x,
            centre_y + BANNER_FONT_SIZE,
            HINT_FONT_SIZE,
            frame.text_color,
        );
    }
}

fn draw_centred(text: &str, centre_x: f32, baseline: f32, font_size: f32, color: Color) {
    let dimensions = measure_text(text, None, font_size as u16, 1.0);
    let _ = draw_text(
        text,
        centre_x - dimensions.width * 0.5,
        baseline,
        font_size,
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lives_label_counts_ships() {
        assert_eq!(lives_label(3), "Ships: 3");
        assert_eq!(lives_label(0), "Ships: 0");
    }

    #[test]
    fn banner_only_appears_outside_regular_play() {
        assert!(banner_text(HudStatus::Playing).is_none());
        assert_eq!(banner_text(HudStatus::Recovering), Some(("Ship lost", None)));
        let (headline, hint) = banner_text(HudStatus::GameOver).expect("game over banner");
        assert_eq!(headline, "Game over");
        assert!(hint.is_some());
    }
}
