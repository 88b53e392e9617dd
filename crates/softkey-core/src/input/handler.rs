// Softkey Pointer Handler
// Routes pointer events and timer ticks to the per-key gesture machines

use indexmap::IndexMap;

use crate::input::{
    GestureConfig, GestureDisambiguator, GestureInput, GestureIntents, TargetConfig,
};
use crate::KeyId;

/// Owns one [`GestureDisambiguator`] per registered key
#[derive(Debug, Clone, Default)]
pub struct PointerHandler {
    timing: GestureConfig,
    targets: IndexMap<KeyId, GestureDisambiguator>,
}

impl PointerHandler {
    pub fn new(timing: GestureConfig) -> Self {
        Self {
            timing,
            targets: IndexMap::new(),
        }
    }

    pub fn timing(&self) -> GestureConfig {
        self.timing
    }

    /// Register (or replace) the gesture machine of a key
    pub fn register(&mut self, target: KeyId, config: TargetConfig) {
        self.targets
            .insert(target, GestureDisambiguator::new(target, config, self.timing));
    }

    /// Drop a key; its running gesture is abandoned
    pub fn unregister(&mut self, target: KeyId) -> GestureIntents {
        match self.targets.shift_remove(&target) {
            Some(mut gesture) => gesture.dispose(),
            None => GestureIntents::new(),
        }
    }

    pub fn get(&self, target: KeyId) -> Option<&GestureDisambiguator> {
        self.targets.get(&target)
    }

    /// Forward an input to the machine of its target
    pub fn handle(&mut self, input: &GestureInput) -> GestureIntents {
        let target = input.target();
        match self.targets.get_mut(&target) {
            Some(gesture) => gesture.handle(input),
            None => {
                log::warn!("input for unregistered key {} ignored", target);
                GestureIntents::new()
            }
        }
    }

    /// Abandon every running gesture (focus loss)
    pub fn cancel_all(&mut self) -> GestureIntents {
        let mut out = GestureIntents::new();
        for gesture in self.targets.values_mut() {
            out.extend(gesture.dispose());
        }
        out
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
