use serde::{Deserialize, Serialize};

use crate::{
    components::{Bird, GateConfig},
    resources::{GateId, GateRegistry, Planet},
};

/// Contact between the bird and a gate detected during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateContact {
    /// The bird crossed the gate plane through the gap.
    Scored(GateId),
    /// The bird touched a pipe or tunnelled through one between ticks.
    Collided(GateId),
}

/// Checks the bird against every live gate and updates each gate's crossing state.
///
/// Depth is measured along the gate's forward axis, which faces the approaching bird, so a
/// passage is a change of sign from positive to non-positive. A gate scores at most once.
pub fn detect_gate_contacts(
    bird: &Bird,
    collision_radius: f32,
    planet: &Planet,
    gate_config: &GateConfig,
    registry: &mut GateRegistry,
) -> Vec<GateContact> {
    let mut contacts = Vec::new();
    if !bird.is_alive() {
        return contacts;
    }

    let r = collision_radius.max(0.0);
    for (id, gate) in registry.iter_mut() {
        let (depth, lateral, height) = gate.pose(planet).local_offset(bird.position);

        let within_width = lateral.abs() <= gate_config.half_width;
        let within_gap = height.abs() <= gate_config.gap_half_height;
        let crossed = gate.last_depth.is_some_and(|last| last > 0.0) && depth <= 0.0;
        gate.last_depth = Some(depth);

        let touching_pipe = depth.abs() <= gate_config.half_thickness + r
            && lateral.abs() <= gate_config.half_width + r
            && height.abs() > gate_config.gap_half_height - r;

        if touching_pipe || (crossed && within_width && !within_gap) {
            contacts.push(GateContact::Collided(id));
        } else if crossed && within_width && !gate.scored {
            gate.scored = true;
            contacts.push(GateContact::Scored(id));
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{BirdConfig, DeathCause, Gate},
        resources::PlanetConfig,
        utils::orientation_from,
    };
    use bevy::math::Vec3;
    use pretty_assertions::assert_eq;

    /// Gate whose gap center sits at `center`, facing +X.
    fn gate_at(center: Vec3, center_height: f32) -> Gate {
        let up = center.normalize();
        let base = center - up * center_height;
        Gate::new(base, orientation_from(Vec3::X, up), center_height, 10.0)
    }

    fn setup() -> (Planet, Bird, GateRegistry) {
        let planet = Planet::new(&PlanetConfig::default());
        let bird = Bird::new(&BirdConfig::default(), planet.center, planet.radius);
        (planet, bird, GateRegistry::new())
    }

    #[test]
    fn test_passage_through_gap_scores_once() {
        let (planet, mut bird, mut registry) = setup();
        let config = GateConfig::default();
        let id = registry.insert(gate_at(Vec3::new(0.0, 0.0, 27.0), 7.0));

        let mut contacts = Vec::new();
        for x in [3.0, 1.5, -0.1, -1.5, 1.5, -1.5] {
            bird.position = Vec3::new(x, 0.0, 27.0);
            contacts.extend(detect_gate_contacts(&bird, 0.5, &planet, &config, &mut registry));
        }

        assert_eq!(contacts, vec![GateContact::Scored(id)]);
        assert!(registry.get(id).unwrap().scored);
    }

    #[test]
    fn test_pipe_overlap_collides() {
        let (planet, mut bird, mut registry) = setup();
        let config = GateConfig::default();
        let id = registry.insert(gate_at(Vec3::new(0.0, 0.0, 30.0), 9.0));

        // 3 units below the gap center, inside the lower pipe's slab.
        bird.position = Vec3::new(0.2, 0.0, 27.0);
        let contacts = detect_gate_contacts(&bird, 0.5, &planet, &config, &mut registry);
        assert_eq!(contacts, vec![GateContact::Collided(id)]);
    }

    #[test]
    fn test_tunnelling_through_pipe_collides() {
        let (planet, mut bird, mut registry) = setup();
        let config = GateConfig::default();
        let id = registry.insert(gate_at(Vec3::new(0.0, 0.0, 30.0), 9.0));

        bird.position = Vec3::new(5.0, 0.0, 26.0);
        assert!(detect_gate_contacts(&bird, 0.5, &planet, &config, &mut registry).is_empty());
        bird.position = Vec3::new(-5.0, 0.0, 26.0);
        assert_eq!(
            detect_gate_contacts(&bird, 0.5, &planet, &config, &mut registry),
            vec![GateContact::Collided(id)]
        );
    }

    #[test]
    fn test_passing_beside_the_gate_is_ignored() {
        let (planet, mut bird, mut registry) = setup();
        let config = GateConfig::default();
        registry.insert(gate_at(Vec3::new(0.0, 0.0, 27.0), 7.0));

        for x in [2.0, 0.0, -2.0] {
            bird.position = Vec3::new(x, 4.0, 27.0);
            assert!(detect_gate_contacts(&bird, 0.5, &planet, &config, &mut registry).is_empty());
        }
    }

    #[test]
    fn test_dead_bird_has_no_contacts() {
        let (planet, mut bird, mut registry) = setup();
        registry.insert(gate_at(Vec3::new(0.0, 0.0, 30.0), 9.0));
        bird.position = Vec3::new(0.0, 0.0, 27.0);
        bird.kill(DeathCause::External);

        let contacts =
            detect_gate_contacts(&bird, 0.5, &planet, &GateConfig::default(), &mut registry);
        assert!(contacts.is_empty());
    }
}
