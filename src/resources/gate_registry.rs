use serde::{Deserialize, Serialize};
use std::fmt;

use crate::components::Gate;

/// Stable handle to a gate. Stale handles never alias a newer gate in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateId {
    index: u32,
    generation: u32,
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gate#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    gate: Option<Gate>,
}

/// Arena of live gates owned by the simulation world.
///
/// Removal frees the slot immediately, so a destroyed gate can never be returned by a
/// lookup. Queries that need to mutate the registry while scanning take a [`snapshot`]
/// first.
///
/// [`snapshot`]: GateRegistry::snapshot
#[derive(Debug, Clone, Default)]
pub struct GateRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl GateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, gate: Gate) -> GateId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.gate = Some(gate);
            return GateId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            gate: Some(gate),
        });
        GateId {
            index,
            generation: 0,
        }
    }

    /// Deregisters a gate. Returns `None` for unknown or stale handles.
    pub fn remove(&mut self, id: GateId) -> Option<Gate> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let gate = slot.gate.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(gate)
    }

    pub fn get(&self, id: GateId) -> Option<&Gate> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.gate.as_ref())
    }

    pub fn get_mut(&mut self, id: GateId) -> Option<&mut Gate> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.gate.as_mut())
    }

    pub fn contains(&self, id: GateId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn ids(&self) -> impl Iterator<Item = GateId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GateId, &Gate)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.gate.as_ref().map(|gate| {
                (
                    GateId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    gate,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (GateId, &mut Gate)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.gate.as_mut().map(|gate| {
                (
                    GateId {
                        index: index as u32,
                        generation,
                    },
                    gate,
                )
            })
        })
    }

    /// Copy of the live set, safe to scan while the registry is mutated.
    pub fn snapshot(&self) -> Vec<(GateId, Gate)> {
        self.iter().map(|(id, gate)| (id, gate.clone())).collect()
    }

    /// Destroys every gate. Outstanding handles become stale.
    pub fn clear(&mut self) {
        let ids: Vec<GateId> = self.ids().collect();
        for id in ids {
            self.remove(id);
        }
    }

    /// Advances all lifetime timers and destroys expired gates, returning their handles.
    pub fn expire(&mut self, dt: f32) -> Vec<GateId> {
        let expired: Vec<GateId> = self
            .iter_mut()
            .filter_map(|(id, gate)| gate.tick_lifetime(dt).then_some(id))
            .collect();
        for id in &expired {
            self.remove(*id);
        }
        expired
    }
}
