use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    resources::GateId,
    systems::SpawnerConfig,
    utils::{FULL_SPAWN_INTERVAL, SIMPLE_SPAWN_INTERVAL},
};

/// Curriculum stage controlling reward terms and gate spawning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingStage {
    #[default]
    Survival,
    SimplePipes,
    FullGame,
}

impl TrainingStage {
    pub const ALL: [TrainingStage; 3] = [
        TrainingStage::Survival,
        TrainingStage::SimplePipes,
        TrainingStage::FullGame,
    ];

    /// The following stage. `FullGame` is terminal.
    pub fn next(self) -> Self {
        match self {
            TrainingStage::Survival => TrainingStage::SimplePipes,
            TrainingStage::SimplePipes | TrainingStage::FullGame => TrainingStage::FullGame,
        }
    }

    /// Whether gate observations and gate shaping are active.
    pub fn uses_gates(self) -> bool {
        !matches!(self, TrainingStage::Survival)
    }

    pub fn description(self) -> &'static str {
        match self {
            TrainingStage::Survival => "Survival: learn to fly without hitting the ceiling",
            TrainingStage::SimplePipes => "Simple Pipes: learn basic gate navigation",
            TrainingStage::FullGame => "Full Game: complete complexity",
        }
    }
}

impl fmt::Display for TrainingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrainingStage::Survival => "Survival",
            TrainingStage::SimplePipes => "SimplePipes",
            TrainingStage::FullGame => "FullGame",
        };
        write!(f, "{}", name)
    }
}

/// Per-stage spawner presets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurriculumConfig {
    /// When false the spawner config is used as-is for every stage.
    pub enabled: bool,
    pub start_stage: TrainingStage,
    pub simple_pipes_interval: f32,
    pub full_game_interval: f32,
}

impl Default for CurriculumConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_stage: TrainingStage::Survival,
            simple_pipes_interval: SIMPLE_SPAWN_INTERVAL,
            full_game_interval: FULL_SPAWN_INTERVAL,
        }
    }
}

impl CurriculumConfig {
    /// Spawner enablement and interval for `stage`.
    pub fn spawner_setting(&self, stage: TrainingStage, spawner: &SpawnerConfig) -> (bool, f32) {
        if !self.enabled {
            return (spawner.enabled, spawner.interval);
        }
        match stage {
            TrainingStage::Survival => (false, spawner.interval),
            TrainingStage::SimplePipes => (true, self.simple_pipes_interval),
            TrainingStage::FullGame => (true, self.full_game_interval),
        }
    }
}

/// Shaping and bookkeeping state of the running episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeContext {
    /// Survives episode resets until explicitly changed.
    pub stage: TrainingStage,
    pub episode_start_time: f32,
    /// Target along-distance seen by the progress reward on the previous step.
    pub prev_along: Option<f32>,
    /// Target along-distance seen by the observation encoder on the previous step.
    pub prev_observed_along: Option<f32>,
    /// Gate targeted on the previous step, for the crossing bonus.
    pub prev_target: Option<GateId>,
    pub consecutive_flaps: u32,
    pub cumulative_reward: f32,
    pub steps: u32,
    pub score: u32,
    pub done: bool,
}

impl EpisodeContext {
    pub fn new(stage: TrainingStage) -> Self {
        Self {
            stage,
            episode_start_time: 0.0,
            prev_along: None,
            prev_observed_along: None,
            prev_target: None,
            consecutive_flaps: 0,
            cumulative_reward: 0.0,
            steps: 0,
            score: 0,
            done: false,
        }
    }

    /// Clears everything except the stage.
    pub fn begin(&mut self, start_time: f32) {
        *self = Self {
            episode_start_time: start_time,
            ..Self::new(self.stage)
        };
    }

    /// Tracks the flap streak. Returns the new streak length.
    pub fn record_flap(&mut self, flapped: bool) -> u32 {
        self.consecutive_flaps = if flapped {
            self.consecutive_flaps + 1
        } else {
            0
        };
        self.consecutive_flaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stage_progression_stops_at_full_game() {
        let mut stage = TrainingStage::Survival;
        let mut seen = vec![stage];
        for _ in 0..4 {
            stage = stage.next();
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                TrainingStage::Survival,
                TrainingStage::SimplePipes,
                TrainingStage::FullGame,
                TrainingStage::FullGame,
                TrainingStage::FullGame,
            ]
        );
    }

    #[test]
    fn test_curriculum_spawner_settings() {
        let curriculum = CurriculumConfig::default();
        let spawner = SpawnerConfig::default();

        assert!(!curriculum.spawner_setting(TrainingStage::Survival, &spawner).0);
        assert_eq!(
            curriculum.spawner_setting(TrainingStage::SimplePipes, &spawner),
            (true, 8.0)
        );
        assert_eq!(
            curriculum.spawner_setting(TrainingStage::FullGame, &spawner),
            (true, 5.0)
        );

        let manual = CurriculumConfig {
            enabled: false,
            ..Default::default()
        };
        let spawner = SpawnerConfig {
            enabled: true,
            interval: 2.0,
            ..Default::default()
        };
        assert_eq!(
            manual.spawner_setting(TrainingStage::Survival, &spawner),
            (true, 2.0)
        );
    }

    #[test]
    fn test_begin_keeps_stage_only() {
        let mut context = EpisodeContext::new(TrainingStage::FullGame);
        context.prev_along = Some(4.0);
        context.consecutive_flaps = 5;
        context.cumulative_reward = 2.5;
        context.score = 3;
        context.done = true;

        context.begin(12.0);

        let mut expected = EpisodeContext::new(TrainingStage::FullGame);
        expected.episode_start_time = 12.0;
        assert_eq!(context, expected);
    }

    #[test]
    fn test_flap_streak() {
        let mut context = EpisodeContext::new(TrainingStage::Survival);
        assert_eq!(context.record_flap(true), 1);
        assert_eq!(context.record_flap(true), 2);
        assert_eq!(context.record_flap(false), 0);
        assert_eq!(context.record_flap(true), 1);
    }

    #[test]
    fn test_descriptions_are_distinct() {
        let mut descriptions: Vec<_> = TrainingStage::ALL.iter().map(|s| s.description()).collect();
        descriptions.dedup();
        assert_eq!(descriptions.len(), 3);
    }
}
