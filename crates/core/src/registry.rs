//! Registries for installable feature groups (views and modes).
//!
//! A manager owns every installed group for the lifetime of the surface and
//! tracks which one is active plus at most one temporary overlay. The
//! resolution rule — temporary if set, else active — lives in
//! [`FeatureGroupManager::active_or_temp_name`] and nowhere else; dispatch
//! and rendering must consult it instead of caching the answer.

use std::collections::HashMap;

use crate::error::SurfaceError;
use crate::view::{Mode, View};

/// Anything installable under a unique name.
pub trait FeatureGroup {
    /// Unique key; two groups with the same name are the same logical group.
    fn name(&self) -> &str;
}

/// Which registry an instance serves. Only affects error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Views,
    Modes,
}

pub type ViewManager = FeatureGroupManager<dyn View>;
pub type ModeManager = FeatureGroupManager<dyn Mode>;

pub struct FeatureGroupManager<T: FeatureGroup + ?Sized> {
    kind: GroupKind,
    installed: HashMap<String, Box<T>>,
    active: Option<String>,
    temporary: Option<String>,
    /// Resolved names suspended by `set_temporary`, oldest first.
    previous: Vec<String>,
}

impl<T: FeatureGroup + ?Sized> FeatureGroupManager<T> {
    pub fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            installed: HashMap::new(),
            active: None,
            temporary: None,
            previous: Vec::new(),
        }
    }

    fn duplicate(&self, name: &str) -> SurfaceError {
        match self.kind {
            GroupKind::Views => SurfaceError::DuplicateView(name.to_string()),
            GroupKind::Modes => SurfaceError::DuplicateMode(name.to_string()),
        }
    }

    fn unknown(&self, name: &str) -> SurfaceError {
        match self.kind {
            GroupKind::Views => SurfaceError::UnknownView(name.to_string()),
            GroupKind::Modes => SurfaceError::UnknownMode(name.to_string()),
        }
    }

    /// Register a group under its name. Duplicate names are fatal to
    /// startup; groups are never re-registered once activation begins.
    pub fn install(&mut self, group: Box<T>) -> Result<(), SurfaceError> {
        let name = group.name().to_string();
        if self.installed.contains_key(&name) {
            return Err(self.duplicate(&name));
        }
        self.installed.insert(name, group);
        Ok(())
    }

    /// Activate `name`, discarding any in-progress temporary overlay and
    /// the restore stack.
    pub fn set_active(&mut self, name: &str) -> Result<(), SurfaceError> {
        if !self.installed.contains_key(name) {
            return Err(self.unknown(name));
        }
        self.active = Some(name.to_string());
        self.temporary = None;
        self.previous.clear();
        Ok(())
    }

    /// Activate `name` as a temporary overlay. The currently resolved group
    /// is suspended, not discarded, and comes back on [`Self::restore`].
    pub fn set_temporary(&mut self, name: &str) -> Result<(), SurfaceError> {
        if !self.installed.contains_key(name) {
            return Err(self.unknown(name));
        }
        if let Some(current) = self.active_or_temp_name() {
            let current = current.to_string();
            self.previous.push(current);
        }
        self.temporary = Some(name.to_string());
        Ok(())
    }

    /// Return dispatch resolution to the suspended group. A no-op when no
    /// temporary overlay is set.
    pub fn restore(&mut self) {
        if self.temporary.is_none() {
            return;
        }
        match self.previous.pop() {
            Some(prev) if self.active.as_deref() != Some(prev.as_str()) => {
                self.temporary = Some(prev);
            }
            _ => self.temporary = None,
        }
    }

    /// The single resolution rule: temporary if set, else active.
    pub fn active_or_temp_name(&self) -> Option<&str> {
        self.temporary.as_deref().or(self.active.as_deref())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// True iff `name` is the *resolved* group (not the raw active slot).
    pub fn is_active(&self, name: &str) -> bool {
        self.active_or_temp_name() == Some(name)
    }

    pub fn active_or_temp(&self) -> Option<&T> {
        self.active_or_temp_name()
            .and_then(|name| self.installed.get(name))
            .map(Box::as_ref)
    }

    pub fn active_or_temp_mut(&mut self) -> Option<&mut T> {
        let name = self.active_or_temp_name()?.to_string();
        self.installed.get_mut(&name).map(Box::as_mut)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.installed.get(name).map(Box::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl FeatureGroup for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn manager_with(names: &[&'static str]) -> FeatureGroupManager<Named> {
        let mut manager = FeatureGroupManager::new(GroupKind::Views);
        for name in names {
            manager.install(Box::new(Named(name))).unwrap();
        }
        manager
    }

    #[test]
    fn set_active_resolves_to_that_name() {
        let mut manager = manager_with(&["Session", "Note"]);
        for name in ["Session", "Note"] {
            manager.set_active(name).unwrap();
            assert_eq!(manager.active_or_temp_name(), Some(name));
        }
    }

    #[test]
    fn duplicate_install_fails() {
        let mut manager = manager_with(&["Session"]);
        let err = manager.install(Box::new(Named("Session"))).unwrap_err();
        assert_eq!(err, SurfaceError::DuplicateView("Session".to_string()));
    }

    #[test]
    fn activating_unknown_name_fails() {
        let mut manager = manager_with(&["Session"]);
        assert_eq!(
            manager.set_active("Drum"),
            Err(SurfaceError::UnknownView("Drum".to_string()))
        );
        assert_eq!(
            manager.set_temporary("Drum"),
            Err(SurfaceError::UnknownView("Drum".to_string()))
        );
    }

    #[test]
    fn temporary_then_restore_returns_to_prior_active() {
        let mut manager = manager_with(&["Session", "Shift"]);
        manager.set_active("Session").unwrap();
        manager.set_temporary("Shift").unwrap();
        assert_eq!(manager.active_or_temp_name(), Some("Shift"));
        assert!(manager.is_active("Shift"));
        assert_eq!(manager.active_name(), Some("Session"));

        manager.restore();
        assert_eq!(manager.active_or_temp_name(), Some("Session"));
    }

    #[test]
    fn nested_temporaries_unwind_in_order() {
        let mut manager = manager_with(&["Session", "Tempo", "Shift"]);
        manager.set_active("Session").unwrap();
        manager.set_temporary("Tempo").unwrap();
        manager.set_temporary("Shift").unwrap();

        manager.restore();
        assert_eq!(manager.active_or_temp_name(), Some("Tempo"));
        manager.restore();
        assert_eq!(manager.active_or_temp_name(), Some("Session"));
    }

    #[test]
    fn restore_without_temporary_is_a_noop() {
        let mut manager = manager_with(&["Session"]);
        manager.set_active("Session").unwrap();
        manager.restore();
        assert_eq!(manager.active_or_temp_name(), Some("Session"));
    }

    #[test]
    fn set_active_clears_overlay_state() {
        let mut manager = manager_with(&["Session", "Note", "Shift"]);
        manager.set_active("Session").unwrap();
        manager.set_temporary("Shift").unwrap();
        manager.set_active("Note").unwrap();

        assert_eq!(manager.active_or_temp_name(), Some("Note"));
        manager.restore();
        assert_eq!(manager.active_or_temp_name(), Some("Note"));
    }
}
