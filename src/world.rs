use bevy::math::Vec3;
use bevy::prelude::debug;
use rand_chacha::ChaCha8Rng;

use crate::{
    components::{Bird, BirdConfig, DeathCause, GateConfig, TangentFrame},
    resources::{EnvConfig, GateId, GateRegistry, Planet},
    systems::{
        detect_gate_contacts, insert_gate, integrate_bird, reset_bird, spawn_gate, GateContact,
        GateSpawner, PlanetSpinner, SpawnerConfig, SpinnerConfig,
    },
    utils::{try_direction, RngManager},
};

/// Everything that happened during one [`FlightWorld::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    pub died: Option<DeathCause>,
    pub scored: Vec<GateId>,
    pub collided: Option<GateId>,
    pub spawned: Vec<GateId>,
    pub expired: Vec<GateId>,
}

/// The simulated scene: planet, bird, gates and the systems advancing them.
///
/// One call to [`tick`](FlightWorld::tick) runs the pipeline in a fixed order: spin,
/// locomotion, gate contacts, gate expiry, spawning.
#[derive(Debug, Clone)]
pub struct FlightWorld {
    pub planet: Planet,
    pub bird: Bird,
    pub gates: GateRegistry,
    pub spinner: PlanetSpinner,
    pub spawner: GateSpawner,

    bird_config: BirdConfig,
    spinner_config: SpinnerConfig,
    spawner_config: SpawnerConfig,
    gate_config: GateConfig,

    rng: ChaCha8Rng,
    spin_axis: Vec3,
    elapsed: f32,
}

impl FlightWorld {
    pub fn new(config: &EnvConfig, rng_manager: &RngManager) -> Self {
        let planet = Planet::new(&config.planet);
        let bird = Bird::new(&config.bird, planet.center, planet.radius);

        Self {
            planet,
            bird,
            gates: GateRegistry::new(),
            spinner: PlanetSpinner::new(),
            spawner: GateSpawner::new(&config.spawner),
            bird_config: config.bird.clone(),
            spinner_config: config.spinner.clone(),
            spawner_config: config.spawner.clone(),
            gate_config: config.gate.clone(),
            rng: rng_manager.get_rng("spawner"),
            spin_axis: Vec3::Y,
            elapsed: 0.0,
        }
    }

    pub fn bird_config(&self) -> &BirdConfig {
        &self.bird_config
    }

    pub fn gate_config(&self) -> &GateConfig {
        &self.gate_config
    }

    /// Simulated seconds since construction.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Spin axis in effect after the last locomotion step.
    pub fn spin_axis(&self) -> Vec3 {
        self.spin_axis
    }

    /// Tangent frame at the bird for the current spin axis.
    pub fn frame(&self) -> TangentFrame {
        TangentFrame::compute(
            self.bird.position,
            self.planet.center,
            self.spin_axis,
            self.bird.forward(),
        )
    }

    pub fn reseed(&mut self, rng_manager: &RngManager) {
        self.rng = rng_manager.get_rng("spawner");
    }

    /// Advances the whole scene by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickEvents {
        let mut events = TickEvents::default();

        let axis = self
            .spinner
            .tick(&self.spinner_config, &mut self.planet, &self.bird, dt);

        events.died = integrate_bird(&mut self.bird, &self.bird_config, &self.planet, axis, dt);
        self.refresh_spin_axis(axis);

        for contact in detect_gate_contacts(
            &self.bird,
            self.bird_config.collision_radius,
            &self.planet,
            &self.gate_config,
            &mut self.gates,
        ) {
            match contact {
                GateContact::Scored(id) => events.scored.push(id),
                GateContact::Collided(id) => {
                    if self.bird.kill(DeathCause::GateCollision) {
                        debug!("Bird collided with {}", id);
                        events.collided = Some(id);
                        events.died = Some(DeathCause::GateCollision);
                    }
                }
            }
        }

        events.expired = self.gates.expire(dt);

        events.spawned = self.spawner.tick(
            &self.spawner_config,
            &self.gate_config,
            &self.planet,
            &self.bird,
            self.spin_axis,
            &mut self.gates,
            &mut self.rng,
            dt,
        );

        self.elapsed += dt;
        events
    }

    /// Puts the bird back on the surface, destroys all gates and restarts the spawner.
    ///
    /// Returns the gate primed by the spawner, if any.
    pub fn reset(&mut self) -> Option<GateId> {
        reset_bird(&mut self.bird, &self.bird_config, &self.planet, self.spin_axis);
        self.refresh_spin_axis(self.spin_axis);
        self.gates.clear();
        self.spawner.reset();

        if self.spawner.enabled && self.spawner_config.prime_on_enable {
            Some(self.spawn_gate())
        } else {
            None
        }
    }

    /// Applies a curriculum setting to the spawner.
    pub fn configure_spawner(&mut self, enabled: bool, interval: f32) {
        self.spawner.configure(enabled, interval);
    }

    /// Spawns one gate immediately using the spawner's placement rules.
    pub fn spawn_gate(&mut self) -> GateId {
        spawn_gate(
            &self.spawner_config,
            &self.gate_config,
            &self.planet,
            &self.bird,
            self.spin_axis,
            &mut self.gates,
            &mut self.rng,
        )
    }

    /// Places a gate whose gap center sits at the given offsets in the bird's tangent frame.
    pub fn place_gate_ahead(&mut self, along: f32, lateral: f32, radial: f32) -> GateId {
        let frame = self.frame();
        let center = self.bird.position
            + frame.forward * along
            + frame.right * lateral
            + frame.normal * radial;
        let up = try_direction(center - self.planet.center).unwrap_or(frame.normal);
        let center_height = self
            .gate_config
            .gap_center_heights
            .first()
            .copied()
            .unwrap_or_default();

        insert_gate(
            &self.planet,
            &self.bird,
            self.spin_axis,
            &mut self.gates,
            &self.gate_config,
            center - up * center_height,
            up,
            center_height,
        )
    }

    pub fn clear_gates(&mut self) {
        self.gates.clear();
    }

    fn refresh_spin_axis(&mut self, fallback: Vec3) {
        let normal = self.bird.normal(self.planet.center);
        self.spin_axis = try_direction(self.bird.forward().cross(normal)).unwrap_or(fallback);
    }
}
