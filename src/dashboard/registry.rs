use super::view::{View, ViewId, ViewSpec};
use crate::core::{DashError, Result};
use std::collections::{BTreeSet, HashMap};

/// Registry of all views on the dashboard, addressable by id or name.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: Vec<View>,
    by_name: HashMap<String, ViewId>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: ViewSpec) -> Result<ViewId> {
        if self.by_name.contains_key(&spec.name) {
            return Err(DashError::ViewExists(spec.name));
        }
        let id = ViewId(self.views.len());
        self.by_name.insert(spec.name.clone(), id);
        self.views.push(View {
            id,
            spec,
            selection: BTreeSet::new(),
        });
        Ok(id)
    }

    pub fn get(&self, id: ViewId) -> Result<&View> {
        self.views
            .get(id.0)
            .ok_or_else(|| DashError::ViewNotFound(format!("#{}", id.0)))
    }

    pub(crate) fn get_mut(&mut self, id: ViewId) -> Result<&mut View> {
        self.views
            .get_mut(id.0)
            .ok_or_else(|| DashError::ViewNotFound(format!("#{}", id.0)))
    }

    pub fn id_of(&self, name: &str) -> Result<ViewId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| DashError::ViewNotFound(name.to_string()))
    }

    pub fn by_name(&self, name: &str) -> Result<&View> {
        self.get(self.id_of(name)?)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, View> {
        self.views.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, View> {
        self.views.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.views.iter().map(|v| v.name()).collect()
    }
}
