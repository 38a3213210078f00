use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::{
    components::TangentFrame,
    resources::{GateId, GateRegistry, Planet},
};

/// A gate seen from the bird's tangent frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateSighting {
    pub id: GateId,
    /// Signed distance ahead along `forward`.
    pub along: f32,
    /// Signed offset along `right`.
    pub lateral: f32,
    /// Height of the gap center relative to the bird along `normal`.
    pub radial: f32,
    /// Angle between the direction to the gate and `forward` (deg).
    pub arc_deg: f32,
}

/// Decomposes the offset from `origin` to `target` in `frame`.
pub fn sight(frame: &TangentFrame, origin: Vec3, id: GateId, target: Vec3) -> GateSighting {
    let offset = target - origin;
    let (along, lateral, radial) = frame.decompose(offset);
    let arc_deg = offset
        .try_normalize()
        .map(|dir| dir.dot(frame.forward).clamp(-1.0, 1.0).acos().to_degrees())
        .unwrap_or(0.0);

    GateSighting {
        id,
        along,
        lateral,
        radial,
        arc_deg,
    }
}

/// Sighting of one specific gate, if it is still alive. Behind gates are included.
pub fn sight_gate(
    frame: &TangentFrame,
    origin: Vec3,
    planet: &Planet,
    registry: &GateRegistry,
    id: GateId,
) -> Option<GateSighting> {
    registry
        .get(id)
        .map(|gate| sight(frame, origin, id, gate.center(planet)))
}

/// Gates strictly ahead of `origin`, unordered.
fn gates_ahead<'a>(
    frame: &'a TangentFrame,
    origin: Vec3,
    planet: &'a Planet,
    registry: &'a GateRegistry,
) -> impl Iterator<Item = GateSighting> + 'a {
    registry
        .iter()
        .map(move |(id, gate)| sight(frame, origin, id, gate.center(planet)))
        .filter(|sighting| sighting.along > 0.0)
}

/// Nearest gate strictly ahead, by along-distance.
pub fn next_gate(
    frame: &TangentFrame,
    origin: Vec3,
    planet: &Planet,
    registry: &GateRegistry,
) -> Option<GateSighting> {
    gates_ahead(frame, origin, planet, registry).min_by(|a, b| a.along.total_cmp(&b.along))
}

/// Up to `k` gates ahead within `max_arc_deg` of forward, closest first.
pub fn top_gates(
    frame: &TangentFrame,
    origin: Vec3,
    planet: &Planet,
    registry: &GateRegistry,
    k: usize,
    max_arc_deg: f32,
) -> Vec<GateSighting> {
    let mut candidates: Vec<GateSighting> = gates_ahead(frame, origin, planet, registry)
        .filter(|sighting| sighting.arc_deg <= max_arc_deg)
        .collect();
    candidates.sort_by(|a, b| a.along.total_cmp(&b.along));
    candidates.truncate(k);
    candidates
}
