//! HUD indicator state
//!
//! A plain snapshot of what the page indicators should show. The browser
//! host diffs it against the previous frame and only touches the DOM on
//! change.

use crate::Color;
use crate::config::MAX_LIVES;
use crate::settings::Settings;
use crate::sim::{GamePhase, Session};

/// Which overlay is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    None,
    LevelUp,
    GameOver,
}

/// Everything the indicators display
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub score: u32,
    pub lives: u8,
    /// One entry per life cell, `true` while the life is still held
    pub life_cells: [bool; MAX_LIVES as usize],
    /// Light/bulb color while a hit flash is active
    pub flash: Option<Color>,
    pub modal: Modal,
}

impl HudSnapshot {
    pub fn from_session(session: &Session, settings: &Settings) -> Self {
        let mut life_cells = [false; MAX_LIVES as usize];
        for (i, cell) in life_cells.iter_mut().enumerate() {
            *cell = i < session.lives as usize;
        }
        let flash = if settings.effective_flash() {
            session.flash.map(|f| f.color)
        } else {
            None
        };
        let modal = match session.phase {
            GamePhase::Playing => Modal::None,
            GamePhase::LevelUp => Modal::LevelUp,
            GamePhase::GameOver => Modal::GameOver,
        };
        Self {
            score: session.score,
            lives: session.lives,
            life_cells,
            flash,
            modal,
        }
    }

    /// Text for the level-up notice
    pub fn level_up_message(&self) -> &'static str {
        "yay you win lets try to be faster"
    }

    /// Text for the game-over notice
    pub fn game_over_message(&self) -> String {
        format!("Game Over! Your score: {}", self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::Flash;

    #[test]
    fn test_life_cells_follow_lives() {
        let mut session = Session::new(GameConfig::default(), 1);
        session.lives = 4;
        let hud = HudSnapshot::from_session(&session, &Settings::default());
        assert_eq!(hud.life_cells, [true, true, true, true, false, false]);
        assert_eq!(hud.modal, Modal::None);
    }

    #[test]
    fn test_flash_respects_settings() {
        let mut session = Session::new(GameConfig::default(), 1);
        let color = crate::color::PALETTE[1];
        session.flash = Some(Flash {
            color,
            ticks_remaining: 5,
        });
        let hud = HudSnapshot::from_session(&session, &Settings::default());
        assert_eq!(hud.flash, Some(color));

        let calm = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert_eq!(HudSnapshot::from_session(&session, &calm).flash, None);
    }

    #[test]
    fn test_game_over_modal() {
        let mut session = Session::new(GameConfig::default(), 1);
        session.score = 12;
        session.lives = 0;
        session.check_game_over();
        let hud = HudSnapshot::from_session(&session, &Settings::default());
        assert_eq!(hud.modal, Modal::GameOver);
        assert_eq!(hud.life_cells, [false; 6]);
        assert_eq!(hud.game_over_message(), "Game Over! Your score: 12");
    }
}
