use bevy::math::{Quat, Vec3};
use bevy::prelude::{debug, warn};

use crate::{
    components::{Bird, BirdConfig, DeathCause, LocomotionState, TangentFrame},
    resources::Planet,
};

/// Advances the bird by one fixed tick.
///
/// Consumes the staged controls, yaws the heading by the strafe input, integrates the
/// impulse-gravity-damping radial model, re-seats the bird on its shell and runs the
/// debounced ceiling check. Returns the cause if the bird died during this tick. A dead
/// bird is frozen; its staged inputs are discarded.
pub fn integrate_bird(
    bird: &mut Bird,
    config: &BirdConfig,
    planet: &Planet,
    spin_axis: Vec3,
    dt: f32,
) -> Option<DeathCause> {
    let controls = bird.controls.take();
    if !bird.is_alive() {
        return None;
    }

    let center = planet.center;
    let normal = bird.normal(center);

    // Steering yaws about the local normal. The running axis is yawed with it so the
    // re-orientation below keeps the new heading.
    let side_angle = controls.strafe.clamp(-1.0, 1.0) * config.side_speed_deg.to_radians() * dt;
    let yaw = Quat::from_axis_angle(normal, side_angle);
    let heading = yaw * bird.forward();
    let axis = yaw * spin_axis;

    integrate_radial(&mut bird.state, config, controls.flap, dt);

    let base_radius = planet.radius + config.ground_clearance;
    bird.position = center + normal * (base_radius + bird.state.altitude);
    bird.rotation = TangentFrame::compute(bird.position, center, axis, heading).rotation();

    let radius = (bird.position - center).length();
    if radius > base_radius + config.max_altitude {
        bird.state.over_ceiling_timer += dt;
        if bird.state.over_ceiling_timer >= config.ceiling_grace && bird.kill(DeathCause::Ceiling)
        {
            debug!(
                "Bird hit the ceiling: radius={:.2}, altitude={:.2}",
                radius, bird.state.altitude
            );
            return Some(DeathCause::Ceiling);
        }
    } else {
        bird.state.over_ceiling_timer = 0.0;
    }

    None
}

/// Impulse, inward pull, integration, inelastic floor, then damping.
pub fn integrate_radial(state: &mut LocomotionState, config: &BirdConfig, flap: bool, dt: f32) {
    if flap {
        state.radial_velocity += config.flap_impulse();
    }

    state.radial_velocity -= config.gravity.abs() * dt;
    state.altitude += state.radial_velocity * dt;

    if state.altitude < 0.0 {
        state.altitude = 0.0;
        if state.radial_velocity < 0.0 {
            state.radial_velocity = 0.0;
        }
    }

    state.radial_velocity -= state.radial_velocity * config.radial_damping * dt;
}

/// Puts the bird back into its canonical episode-start state on the surface.
///
/// The radial direction is kept. If the resulting radius still lies beyond the ceiling
/// (only possible with a corrupt config) the bird is forced onto the base radius.
pub fn reset_bird(bird: &mut Bird, config: &BirdConfig, planet: &Planet, spin_axis: Vec3) {
    bird.state = LocomotionState::default();
    bird.controls = Default::default();
    bird.death_cause = None;

    let center = planet.center;
    let normal = bird.normal(center);
    let base_radius = planet.radius + config.ground_clearance;
    bird.position = center + normal * base_radius;

    let radius = (bird.position - center).length();
    let max_radius = base_radius + config.max_altitude;
    if !radius.is_finite() || radius > max_radius {
        warn!(
            "Bird position unsafe after reset (r={:.2}, max={:.2}); clamping to base radius",
            radius, max_radius
        );
        let fallback = if base_radius.is_finite() {
            base_radius
        } else {
            planet.radius
        };
        bird.position = center + normal * fallback.max(0.0);
    }

    bird.rotation = TangentFrame::compute(bird.position, center, spin_axis, bird.forward()).rotation();
}
