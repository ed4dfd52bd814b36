use super::registry::ViewRegistry;
use super::view::{View, ViewId, ViewKind, ViewModel, ViewSpec};
use crate::core::{DashError, Key, Result};
use crate::index::{
    Crossfilter, DimensionId, DimensionSpec, FilterChange, FilterPredicate, GroupId, Reducer,
};
use log::debug;
use std::collections::BTreeSet;
use tracing::{Level, event, info_span};

/// Receives the view models after every redraw.
///
/// Listeners only get immutable data, so they cannot start another filter
/// change while one is being applied.
pub trait RedrawListener {
    fn on_redraw(&mut self, views: &[ViewModel]);
}

impl<F: FnMut(&[ViewModel])> RedrawListener for F {
    fn on_redraw(&mut self, views: &[ViewModel]) {
        self(views)
    }
}

/// Owns the crossfilter and the views, and is the only path through which
/// filters change. Every mutation applies the filter, redraws every view
/// and notifies listeners before it returns.
pub struct SelectionCoordinator {
    crossfilter: Crossfilter,
    registry: ViewRegistry,
    listeners: Vec<Box<dyn RedrawListener>>,
    redraws: u64,
}

impl SelectionCoordinator {
    pub fn new(crossfilter: Crossfilter) -> Self {
        Self {
            crossfilter,
            registry: ViewRegistry::new(),
            listeners: Vec::new(),
            redraws: 0,
        }
    }

    pub fn crossfilter(&self) -> &Crossfilter {
        &self.crossfilter
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    // ------------------------------------------------------------------------
    // Wiring
    // ------------------------------------------------------------------------

    pub fn define_dimension(&mut self, spec: DimensionSpec) -> Result<DimensionId> {
        self.crossfilter.define_dimension(spec)
    }

    pub fn group(&mut self, dimension: DimensionId) -> Result<GroupId> {
        self.crossfilter.group(dimension)
    }

    pub fn group_with<R: Reducer + 'static>(
        &mut self,
        dimension: DimensionId,
        reducer: R,
    ) -> Result<GroupId> {
        self.crossfilter.group_with(dimension, reducer)
    }

    pub fn group_all(&mut self) -> GroupId {
        self.crossfilter.group_all()
    }

    pub fn group_all_with<R: Reducer + 'static>(&mut self, reducer: R) -> GroupId {
        self.crossfilter.group_all_with(reducer)
    }

    /// Register a view. A charting view must read a group keyed by its own
    /// dimension; a number display must read a group-all.
    pub fn register_view(&mut self, spec: ViewSpec) -> Result<ViewId> {
        let group_dimension = self.crossfilter.group_dimension(spec.group)?;
        match (spec.kind, spec.dimension, group_dimension) {
            (ViewKind::NumberDisplay, None, None) => {}
            (ViewKind::NumberDisplay, _, _) => {
                return Err(DashError::InvalidConfig(format!(
                    "number display '{}' needs a group-all and no dimension",
                    spec.name
                )));
            }
            (_, Some(dim), Some(group_dim)) if dim == group_dim => {}
            _ => {
                return Err(DashError::InvalidConfig(format!(
                    "view '{}' must be bound to the dimension of its group",
                    spec.name
                )));
            }
        }
        let name = spec.name.clone();
        let id = self.registry.register(spec)?;
        debug!("Registered view '{}' as #{}", name, id.0);
        Ok(id)
    }

    pub fn add_listener(&mut self, listener: Box<dyn RedrawListener>) {
        self.listeners.push(listener);
    }

    pub fn view(&self, id: ViewId) -> Result<&View> {
        self.registry.get(id)
    }

    pub fn view_id(&self, name: &str) -> Result<ViewId> {
        self.registry.id_of(name)
    }

    // ------------------------------------------------------------------------
    // Dimension-level filtering
    // ------------------------------------------------------------------------

    /// Replace the filter on a dimension and redraw. Views bound to that
    /// dimension take the matching keys as their selection.
    pub fn set_filter(
        &mut self,
        dimension: DimensionId,
        predicate: Option<FilterPredicate>,
    ) -> Result<Vec<ViewModel>> {
        let selection: BTreeSet<Key> = match &predicate {
            Some(p) => self
                .crossfilter
                .dimension_keys(dimension)?
                .into_iter()
                .filter(|k| p.matches(k))
                .collect(),
            None => BTreeSet::new(),
        };
        self.crossfilter.set_filter(dimension, predicate)?;
        for view in self.registry.iter_mut() {
            if view.spec.dimension == Some(dimension) {
                view.selection = selection.clone();
            }
        }
        self.redraw_all()
    }

    pub fn clear_filter(&mut self, dimension: DimensionId) -> Result<Vec<ViewModel>> {
        self.set_filter(dimension, None)
    }

    // ------------------------------------------------------------------------
    // View-level selection
    // ------------------------------------------------------------------------

    /// Replace a view's selection; an empty set removes its filter.
    pub fn select<I>(&mut self, view: ViewId, keys: I) -> Result<Vec<ViewModel>>
    where
        I: IntoIterator<Item = Key>,
    {
        let target = self.registry.get_mut(view)?;
        target.filter_dimension()?;
        target.selection = keys.into_iter().collect();
        self.apply_selection(view)?;
        self.redraw_all()
    }

    /// Chart click: add the key to the selection, or remove it if present.
    pub fn toggle(&mut self, view: ViewId, key: Key) -> Result<Vec<ViewModel>> {
        let target = self.registry.get_mut(view)?;
        target.filter_dimension()?;
        if !target.selection.remove(&key) {
            target.selection.insert(key);
        }
        self.apply_selection(view)?;
        self.redraw_all()
    }

    pub fn clear_view(&mut self, view: ViewId) -> Result<Vec<ViewModel>> {
        self.select(view, std::iter::empty())
    }

    /// Remove every selection and every filter.
    pub fn reset_all(&mut self) -> Result<Vec<ViewModel>> {
        for view in self.registry.iter_mut() {
            view.selection.clear();
        }
        self.crossfilter.clear_all();
        self.redraw_all()
    }

    /// Push a view's selection to its dimension without redrawing.
    fn apply_selection(&mut self, view: ViewId) -> Result<FilterChange> {
        let target = self.registry.get(view)?;
        let dimension = target.filter_dimension()?;
        let predicate = if target.selection.is_empty() {
            None
        } else {
            Some(FilterPredicate::OneOf(target.selection.clone()))
        };
        self.crossfilter.set_filter(dimension, predicate)
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    pub fn render(&self, view: ViewId) -> Result<ViewModel> {
        self.registry.get(view)?.render(&self.crossfilter)
    }

    /// Render every view and hand the models to the listeners.
    pub fn redraw_all(&mut self) -> Result<Vec<ViewModel>> {
        let span = info_span!(
            "dashboard.redraw",
            views = self.registry.len(),
            records = self.crossfilter.filtered_count()
        );
        let _enter = span.enter();

        let models = self
            .registry
            .iter()
            .map(|view| view.render(&self.crossfilter))
            .collect::<Result<Vec<_>>>()?;
        for listener in &mut self.listeners {
            listener.on_redraw(&models);
        }
        self.redraws += 1;
        event!(Level::DEBUG, redraw = self.redraws, "views redrawn");
        Ok(models)
    }
}
