use bevy::prelude::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    agent::{
        encode_observation, next_gate, sight_gate, stage_reward, top_gates, ActionError,
        AnimationClip, DiscreteAction, EpisodeContext, FlightSample, GameHooks, NullHooks,
        ShapingInput, TrainingStage,
    },
    components::DeathCause,
    resources::{ControlMode, EnvConfig, SimulationMode},
    utils::RngManager,
    world::{FlightWorld, TickEvents},
};

/// Diagnostics attached to every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub stage: TrainingStage,
    pub steps: u32,
    pub score: u32,
    pub episode_reward: f32,
    pub episode_time: f32,
    pub altitude: f32,
    pub gates: usize,
    pub death_cause: Option<DeathCause>,
}

/// Result of one environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

/// Reinforcement-learning environment around a [`FlightWorld`].
///
/// Owns the episode lifecycle, observation encoding, action mapping and reward shaping.
/// Presentation side effects go through `H`.
#[derive(Debug)]
pub struct FlyerEnv<H: GameHooks = NullHooks> {
    config: EnvConfig,
    rng_manager: RngManager,
    world: FlightWorld,
    episode: EpisodeContext,
    hooks: H,
}

impl FlyerEnv<NullHooks> {
    pub fn headless(config: EnvConfig) -> Self {
        Self::new(config, NullHooks)
    }
}

impl<H: GameHooks> FlyerEnv<H> {
    pub fn new(mut config: EnvConfig, hooks: H) -> Self {
        config.sanitize();
        let rng_manager = RngManager::new(config.seed);
        let world = FlightWorld::new(&config, &rng_manager);
        let episode = EpisodeContext::new(config.curriculum.start_stage);

        info!(
            "Environment created: seed={}, stage={}, mode={:?}, control={:?}",
            config.seed, episode.stage, config.mode, config.control
        );

        Self {
            config,
            rng_manager,
            world,
            episode,
            hooks,
        }
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn world(&self) -> &FlightWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut FlightWorld {
        &mut self.world
    }

    pub fn episode(&self) -> &EpisodeContext {
        &self.episode
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn stage(&self) -> TrainingStage {
        self.episode.stage
    }

    pub fn observation_width(&self) -> usize {
        self.config.observation.width()
    }

    pub fn is_done(&self) -> bool {
        self.episode.done
    }

    fn interactive(&self) -> bool {
        self.config.mode == SimulationMode::Interactive
    }

    /// Rebuilds every random stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.config = self.config.rebuild_with_seed(seed);
        self.rng_manager = RngManager::new(seed);
        self.world.reseed(&self.rng_manager);
    }

    /// Begins a new episode and returns its first observation.
    pub fn reset(&mut self) -> Vec<f32> {
        let (enabled, interval) = self
            .config
            .curriculum
            .spawner_setting(self.episode.stage, &self.config.spawner);
        self.world.configure_spawner(enabled, interval);
        self.world.reset();

        self.episode.begin(self.world.elapsed());
        self.hooks.reset_score();
        if self.interactive() && self.config.control == ControlMode::Human {
            self.hooks.play_clip(AnimationClip::Fly);
        }

        debug!(
            "Episode begin: stage={}, spawner enabled={}, interval={:.1}",
            self.episode.stage, enabled, interval
        );
        self.observe()
    }

    pub fn reset_with_seed(&mut self, seed: Option<u64>) -> Vec<f32> {
        if let Some(seed) = seed {
            self.reseed(seed);
        }
        self.reset()
    }

    /// Encodes the current state. Updates the observation finite-difference state.
    pub fn observe(&mut self) -> Vec<f32> {
        let frame = self.world.frame();
        let origin = self.world.bird.position;
        let target = next_gate(&frame, origin, &self.world.planet, &self.world.gates);
        let lookahead = top_gates(
            &frame,
            origin,
            &self.world.planet,
            &self.world.gates,
            self.config.observation.lookahead_gates,
            self.config.observation.max_arc_lookahead_deg,
        );

        encode_observation(
            &self.config.observation,
            self.episode.stage,
            &self.world.bird,
            target.as_ref(),
            &lookahead,
            &mut self.episode.prev_observed_along,
        )
    }

    pub fn step_branches(&mut self, flap: i64, strafe: i64) -> Result<StepOutcome, ActionError> {
        let action = DiscreteAction::from_branches(flap, strafe)?;
        Ok(self.step(action))
    }

    /// Applies `action`, advances one tick and scores the result.
    ///
    /// Stepping a finished episode is a no-op that repeats the terminal flags with zero
    /// reward. A bird killed between steps ends the episode without reward.
    pub fn step(&mut self, action: DiscreteAction) -> StepOutcome {
        if self.episode.done {
            warn!("Step called on a finished episode; call reset first");
            let observation = self.observe();
            let alive = self.world.bird.is_alive();
            return self.outcome(observation, 0.0, !alive, alive);
        }

        if !self.world.bird.is_alive() {
            self.episode.done = true;
            self.on_death(self.world.bird.death_cause);
            let observation = self.observe();
            return self.outcome(observation, 0.0, true, false);
        }

        self.episode.record_flap(action.flap);
        action.apply(&mut self.world.bird);

        let events = self.world.tick(self.config.time_step);
        self.episode.steps += 1;

        let mut reward = self.event_reward(&events);
        let terminated = events.died.is_some();

        if terminated {
            reward += self.config.reward.death_penalty;
            self.on_death(events.died);
        } else {
            reward += self.shaping_reward(action.flap);
        }

        let truncated = !terminated
            && self
                .config
                .agent
                .max_episode_steps
                .is_some_and(|max| self.episode.steps >= max);

        self.episode.cumulative_reward += reward;
        self.episode.done = terminated || truncated;

        let observation = self.observe();
        self.outcome(observation, reward, terminated, truncated)
    }

    fn event_reward(&mut self, events: &TickEvents) -> f32 {
        let mut reward = 0.0;
        for id in &events.scored {
            debug!("Scored {}", id);
            self.episode.score += 1;
            self.hooks.add_score(1);
            reward += self.config.reward.score_reward;
        }
        reward
    }

    fn shaping_reward(&mut self, flapped: bool) -> f32 {
        let frame = self.world.frame();
        let origin = self.world.bird.position;
        let target = next_gate(&frame, origin, &self.world.planet, &self.world.gates);

        let crossed_previous = self
            .episode
            .prev_target
            .and_then(|id| sight_gate(&frame, origin, &self.world.planet, &self.world.gates, id))
            .is_some_and(|previous| previous.along <= 0.0);
        self.episode.prev_target = target.map(|sighting| sighting.id);

        let bird = &self.world.bird;
        let input = ShapingInput {
            sample: FlightSample {
                altitude: bird.altitude(),
                radial_velocity: bird.radial_velocity(),
                max_altitude: self.world.bird_config().max_altitude,
                flapped,
                consecutive_flaps: self.episode.consecutive_flaps,
            },
            target: target.as_ref(),
            crossed_previous,
        };

        stage_reward(
            &self.config.reward,
            self.episode.stage,
            &input,
            &mut self.episode.prev_along,
        )
    }

    fn on_death(&mut self, cause: Option<DeathCause>) {
        info!(
            "Bird died ({:?}) after {:.2}s, {} steps, episode reward {:.4}",
            cause,
            self.world.elapsed() - self.episode.episode_start_time,
            self.episode.steps,
            self.episode.cumulative_reward,
        );
        if self.interactive() {
            if self.config.control == ControlMode::Human {
                self.hooks.play_clip(AnimationClip::Dead);
            }
            self.hooks.game_over(self.config.control == ControlMode::Agent);
        }
    }

    fn outcome(
        &self,
        observation: Vec<f32>,
        reward: f32,
        terminated: bool,
        truncated: bool,
    ) -> StepOutcome {
        StepOutcome {
            observation,
            reward,
            terminated,
            truncated,
            info: self.info(),
        }
    }

    /// Diagnostics for the current state of the episode.
    pub fn info(&self) -> StepInfo {
        StepInfo {
            stage: self.episode.stage,
            steps: self.episode.steps,
            score: self.episode.score,
            episode_reward: self.episode.cumulative_reward,
            episode_time: self.world.elapsed() - self.episode.episode_start_time,
            altitude: self.world.bird.altitude(),
            gates: self.world.gates.len(),
            death_cause: self.world.bird.death_cause,
        }
    }

    /// Kills the bird from outside the simulation. The next step terminates the episode.
    ///
    /// Returns `false` if the bird was already dead.
    pub fn kill_bird(&mut self) -> bool {
        self.world.bird.kill(DeathCause::External)
    }

    /// Ends the episode at the current tick boundary as truncated.
    pub fn force_end_episode(&mut self) -> StepOutcome {
        if !self.episode.done {
            info!("Episode force-ended after {} steps", self.episode.steps);
        }
        self.episode.done = true;
        let observation = self.observe();
        let alive = self.world.bird.is_alive();
        self.outcome(observation, 0.0, !alive, alive)
    }

    /// Changes the curriculum stage. Takes effect from the next episode begin.
    pub fn set_stage(&mut self, stage: TrainingStage) {
        if stage != self.episode.stage {
            info!("Training stage: {} -> {}", self.episode.stage, stage);
        }
        self.episode.stage = stage;
        let (enabled, interval) = self
            .config
            .curriculum
            .spawner_setting(stage, &self.config.spawner);
        self.world.configure_spawner(enabled, interval);
    }

    pub fn next_stage(&mut self) -> TrainingStage {
        self.set_stage(self.episode.stage.next());
        self.episode.stage
    }

    pub fn stage_description(&self) -> &'static str {
        self.episode.stage.description()
    }

    /// Human restart request. Ignored while training.
    pub fn restart_game(&mut self) -> bool {
        if self.config.is_training() {
            return false;
        }
        self.reset();
        true
    }
}
