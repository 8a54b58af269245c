//! Visibility toggles per analysis type.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap {
    visible: HashMap<String, bool>,
}

impl VisibilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a type, visible by default. Existing entries keep their state.
    pub fn register(&mut self, analysis_type_id: &str) {
        self.visible.entry(analysis_type_id.to_string()).or_insert(true);
    }

    pub fn remove(&mut self, analysis_type_id: &str) {
        self.visible.remove(analysis_type_id);
    }

    /// Unknown types are not visible.
    pub fn is_visible(&self, analysis_type_id: &str) -> bool {
        self.visible.get(analysis_type_id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, analysis_type_id: &str, visible: bool) -> bool {
        match self.visible.get_mut(analysis_type_id) {
            Some(v) => {
                *v = visible;
                true
            }
            None => false,
        }
    }

    /// Flip one type. Returns the new state, or `None` for an unknown type.
    pub fn toggle(&mut self, analysis_type_id: &str) -> Option<bool> {
        let v = self.visible.get_mut(analysis_type_id)?;
        *v = !*v;
        Some(*v)
    }

    pub fn all_visible(&self) -> bool {
        self.visible.values().all(|&v| v)
    }

    /// If everything is visible, hide everything; otherwise show everything.
    /// A partially visible map therefore always resolves to all visible.
    /// Returns the state every entry now has.
    pub fn toggle_all(&mut self) -> bool {
        let target = !self.all_visible();
        for v in self.visible.values_mut() {
            *v = target;
        }
        target
    }

    pub fn visible_count(&self) -> usize {
        self.visible.values().filter(|&&v| v).count()
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}
