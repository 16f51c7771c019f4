//! Anchor self-registration
//!
//! Anchors register when they become active in the scene. The registry is
//! the only source of anchors for placeholder restore.

use super::AnchorId;

/// Anchors that have announced themselves, in registration order
#[derive(Debug, Clone, Default)]
pub struct AnchorRegistry {
    anchors: Vec<AnchorId>,
    sealed: bool,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an anchor. Returns `false` if it was already registered.
    pub fn register(&mut self, id: AnchorId) -> bool {
        if self.anchors.contains(&id) {
            return false;
        }
        self.anchors.push(id);
        true
    }

    /// Mark registration complete for this scene
    pub fn seal(&mut self) {
        self.sealed = true;
        log::debug!("Anchor registry sealed with {} anchors", self.anchors.len());
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn anchors(&self) -> &[AnchorId] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Forget all anchors (new scene)
    pub fn reset(&mut self) {
        self.anchors.clear();
        self.sealed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = AnchorRegistry::new();
        assert!(registry.register(AnchorId(4)));
        assert!(!registry.register(AnchorId(4)));
        assert!(registry.register(AnchorId(2)));
        assert_eq!(registry.anchors(), &[AnchorId(4), AnchorId(2)]);
    }

    #[test]
    fn test_reset_clears_seal() {
        let mut registry = AnchorRegistry::new();
        registry.register(AnchorId(1));
        registry.seal();
        registry.reset();
        assert!(registry.is_empty());
        assert!(!registry.is_sealed());
    }
}
