use serde::{Deserialize, Serialize};

use beanjump_core::timer::{Scheduler, TimerHandle};

use crate::config::ScoreConfig;
use crate::reactions::TimerAction;

/// Render style of the score readout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub scale: f32,
    pub color: [u8; 3],
}

pub fn score_text(score: u32) -> String {
    format!("Mom-o-meter: {score}")
}

/// The Mom-o-meter: points plus the emphasis that flashes on each pickup.
#[derive(Debug)]
pub struct ScoreBoard {
    score: u32,
    style: TextStyle,
    /// Pending emphasis reset. Replacing it cancels the previous one.
    decay: Option<TimerHandle>,
    cfg: ScoreConfig,
}

impl ScoreBoard {
    pub fn new(cfg: &ScoreConfig) -> Self {
        Self {
            score: 0,
            style: TextStyle {
                scale: 1.0,
                color: cfg.base_color,
            },
            decay: None,
            cfg: cfg.clone(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn text(&self) -> String {
        score_text(self.score)
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// Base text size before the style scale.
    pub fn text_size(&self) -> f32 {
        self.cfg.text_size
    }

    pub fn is_emphasized(&self) -> bool {
        self.decay.is_some()
    }

    /// Add one pickup's worth of points and restart the emphasis window.
    pub fn award(&mut self, timers: &mut Scheduler<TimerAction>) -> u32 {
        self.score = self.score.saturating_add(self.cfg.increment);
        self.style = TextStyle {
            scale: self.cfg.emphasis_scale,
            color: self.cfg.emphasis_color,
        };
        self.decay = Some(timers.schedule(self.cfg.decay, TimerAction::ResetScoreStyle));
        self.score
    }

    /// Back to the resting style.
    pub fn settle(&mut self) {
        self.decay = None;
        self.style = TextStyle {
            scale: 1.0,
            color: self.cfg.base_color,
        };
    }
}
