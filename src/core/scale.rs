use std::cmp::Ordering;

use tracing::debug;

use super::color::{Color, ColorScale};
use super::dispatch::UpdateDispatcher;
use super::value::{DomainValue, UNKNOWN_LABEL};

/// Initial domain handed to a scale: either known up front or still being
/// produced by an external loader.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DomainInput {
    /// The domain arrives later through [`ScaleCore::resolve_domain`].
    #[default]
    Pending,
    Ready(Vec<DomainValue>),
}

impl From<Vec<DomainValue>> for DomainInput {
    fn from(values: Vec<DomainValue>) -> Self {
        Self::Ready(values)
    }
}

impl FromIterator<DomainValue> for DomainInput {
    fn from_iter<T: IntoIterator<Item = DomainValue>>(iter: T) -> Self {
        Self::Ready(iter.into_iter().collect())
    }
}

/// Shared state for every scale variant: identity, the full and filtered
/// domains, the active palette, and the per-scale dispatcher.
///
/// The filtered domain is always derived from the full domain by slicing,
/// index selection, or hierarchy-leaf extraction; it never introduces values
/// of its own. `domain_original` snapshots the construction-time ordering so
/// sorts can be undone without storing extra history.
#[derive(Debug)]
pub struct ScaleCore {
    id: String,
    name: String,
    loading: bool,
    domain: Vec<DomainValue>,
    domain_filtered: Vec<DomainValue>,
    domain_original: Vec<DomainValue>,
    color_scale: ColorScale,
    color_scale_original: ColorScale,
    dispatcher: UpdateDispatcher,
}

impl ScaleCore {
    pub fn new(id: impl Into<String>, name: impl Into<String>, domain: DomainInput) -> Self {
        Self::with_color_scale(id, name, domain, ColorScale::default_discrete())
    }

    /// Like [`ScaleCore::new`] but with a palette chosen by registry key.
    /// Unknown keys fall back to the default palette.
    pub fn with_palette_key(
        id: impl Into<String>,
        name: impl Into<String>,
        domain: DomainInput,
        palette_key: &str,
    ) -> Self {
        let color_scale =
            ColorScale::by_key(palette_key).unwrap_or_else(ColorScale::default_discrete);
        Self::with_color_scale(id, name, domain, color_scale)
    }

    pub fn with_color_scale(
        id: impl Into<String>,
        name: impl Into<String>,
        domain: DomainInput,
        color_scale: ColorScale,
    ) -> Self {
        let (loading, values) = match domain {
            DomainInput::Pending => (true, Vec::new()),
            DomainInput::Ready(values) => (false, values),
        };
        Self {
            id: id.into(),
            name: name.into(),
            loading,
            domain: values.clone(),
            domain_filtered: values.clone(),
            domain_original: values,
            color_scale,
            color_scale_original: color_scale,
            dispatcher: UpdateDispatcher::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True while a pending domain has not been resolved yet. Domain reads
    /// return empty slices until resolution.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn domain(&self) -> &[DomainValue] {
        &self.domain
    }

    #[must_use]
    pub fn domain_filtered(&self) -> &[DomainValue] {
        &self.domain_filtered
    }

    #[must_use]
    pub fn domain_original(&self) -> &[DomainValue] {
        &self.domain_original
    }

    #[must_use]
    pub fn color_scale(&self) -> ColorScale {
        self.color_scale
    }

    /// Completed load of a pending domain: installs the values as domain,
    /// filtered domain, and reset snapshot, then notifies subscribers.
    /// Calling this on an already resolved scale is ignored.
    pub fn resolve_domain(&mut self, values: Vec<DomainValue>) {
        if !self.loading {
            debug!(scale = %self.id, "ignoring domain resolution for a scale that is not loading");
            return;
        }
        self.domain = values.clone();
        self.domain_filtered = values.clone();
        self.domain_original = values;
        self.loading = false;
        self.emit_update();
    }

    pub fn set_domain(&mut self, values: Vec<DomainValue>) {
        self.domain = values;
        self.emit_update();
    }

    pub fn set_domain_filtered(&mut self, values: Vec<DomainValue>) {
        self.domain_filtered = values;
        self.emit_update();
    }

    /// Construction-time palette swap: installs the palette as both the
    /// active scale and the reset snapshot, without notifying.
    pub(crate) fn install_palette(&mut self, color_scale: ColorScale) {
        self.color_scale = color_scale;
        self.color_scale_original = color_scale;
    }

    /// Replaces the full and filtered domains together with a single
    /// notification. Used by operations that reorder both at once.
    pub(crate) fn replace_domains(&mut self, domain: Vec<DomainValue>, filtered: Vec<DomainValue>) {
        self.domain = domain;
        self.domain_filtered = filtered;
        self.emit_update();
    }

    /// Swaps the active palette by registry key. Unknown keys leave the
    /// palette untouched and emit nothing.
    pub fn set_color_scale_by_key(&mut self, palette_key: &str) {
        let Some(color_scale) = ColorScale::by_key(palette_key) else {
            debug!(scale = %self.id, key = palette_key, "ignoring unknown color scale key");
            return;
        };
        self.color_scale = color_scale;
        self.emit_update();
    }

    pub fn reset_color_scale(&mut self) {
        self.color_scale = self.color_scale_original;
        self.emit_update();
    }

    /// Restores the filtered domain to the current full domain.
    pub fn reset_filter(&mut self) {
        self.domain_filtered = self.domain.clone();
        self.emit_update();
    }

    pub fn on_update(&mut self, subscriber: impl Into<String>, callback: impl FnMut() + 'static) {
        self.dispatcher.on_update(subscriber, callback);
    }

    pub fn on_highlight(
        &mut self,
        subscriber: impl Into<String>,
        callback: impl FnMut(&DomainValue) + 'static,
    ) {
        self.dispatcher.on_highlight(subscriber, callback);
    }

    pub fn on_highlight_destroy(
        &mut self,
        subscriber: impl Into<String>,
        callback: impl FnMut() + 'static,
    ) {
        self.dispatcher.on_highlight_destroy(subscriber, callback);
    }

    pub fn unsubscribe(&mut self, subscriber: &str) {
        self.dispatcher.unsubscribe(subscriber);
    }

    pub fn emit_update(&mut self) {
        self.dispatcher.emit_update();
    }

    pub fn emit_highlight(&mut self, value: &DomainValue) {
        self.dispatcher.emit_highlight(value);
    }

    pub fn emit_highlight_destroy(&mut self) {
        self.dispatcher.emit_highlight_destroy();
    }
}

/// Ordering used by every comparator: descending over numeric rank keys,
/// with NaN ranks ordered deterministically via `total_cmp`.
pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Contract shared by the discrete and continuous scale variants.
///
/// Variants supply colors and a numeric rank per domain value; the ordering,
/// label, and mutation plumbing are provided on top of [`ScaleCore`].
pub trait Scale {
    fn core(&self) -> &ScaleCore;
    fn core_mut(&mut self) -> &mut ScaleCore;

    /// Maps a domain value to a color. Unknown values map to the sentinel
    /// unknown color.
    fn color(&self, value: &DomainValue) -> Color;

    /// Numeric sort key for a domain value. Unknown values rank as `-1`.
    fn rank(&self, value: &DomainValue) -> f64;

    /// Orders two domain values. The default direction matches descending
    /// rank; `ascending = false` reverses it.
    fn comparator(&self, a: &DomainValue, b: &DomainValue, ascending: bool) -> Ordering {
        let ord = descending(self.rank(a), self.rank(b));
        if ascending { ord } else { ord.reverse() }
    }

    /// Display label for a domain value; unknown values label as `Unknown`.
    fn to_human(&self, value: &DomainValue) -> String {
        if value.is_unknown() {
            UNKNOWN_LABEL.to_owned()
        } else {
            value.to_string()
        }
    }

    fn id(&self) -> &str {
        self.core().id()
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn is_loading(&self) -> bool {
        self.core().is_loading()
    }

    fn domain(&self) -> &[DomainValue] {
        self.core().domain()
    }

    fn domain_filtered(&self) -> &[DomainValue] {
        self.core().domain_filtered()
    }

    fn resolve_domain(&mut self, values: Vec<DomainValue>) {
        self.core_mut().resolve_domain(values);
    }

    fn set_domain(&mut self, values: Vec<DomainValue>) {
        self.core_mut().set_domain(values);
    }

    fn set_domain_filtered(&mut self, values: Vec<DomainValue>) {
        self.core_mut().set_domain_filtered(values);
    }

    fn set_color_scale_by_key(&mut self, palette_key: &str) {
        self.core_mut().set_color_scale_by_key(palette_key);
    }

    fn reset_color_scale(&mut self) {
        self.core_mut().reset_color_scale();
    }

    fn reset_filter(&mut self) {
        self.core_mut().reset_filter();
    }

    fn on_update(&mut self, subscriber: impl Into<String>, callback: impl FnMut() + 'static)
    where
        Self: Sized,
    {
        self.core_mut().on_update(subscriber, callback);
    }

    fn on_highlight(
        &mut self,
        subscriber: impl Into<String>,
        callback: impl FnMut(&DomainValue) + 'static,
    ) where
        Self: Sized,
    {
        self.core_mut().on_highlight(subscriber, callback);
    }

    fn on_highlight_destroy(
        &mut self,
        subscriber: impl Into<String>,
        callback: impl FnMut() + 'static,
    ) where
        Self: Sized,
    {
        self.core_mut().on_highlight_destroy(subscriber, callback);
    }

    fn unsubscribe(&mut self, subscriber: &str) {
        self.core_mut().unsubscribe(subscriber);
    }

    fn emit_highlight(&mut self, value: &DomainValue) {
        self.core_mut().emit_highlight(value);
    }

    fn emit_highlight_destroy(&mut self) {
        self.core_mut().emit_highlight_destroy();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{DomainInput, ScaleCore};
    use crate::core::value::DomainValue;

    fn letters() -> Vec<DomainValue> {
        ["a", "b", "c"].into_iter().map(DomainValue::from).collect()
    }

    #[test]
    fn pending_domain_reads_empty_until_resolved() {
        let mut core = ScaleCore::new("s", "Scale", DomainInput::Pending);
        assert!(core.is_loading());
        assert!(core.domain().is_empty());

        let updates = Rc::new(Cell::new(0));
        let counter = Rc::clone(&updates);
        core.on_update("observer", move || counter.set(counter.get() + 1));

        core.resolve_domain(letters());
        assert!(!core.is_loading());
        assert_eq!(core.domain(), letters());
        assert_eq!(core.domain_filtered(), letters());
        assert_eq!(updates.get(), 1);

        // A second resolution is ignored.
        core.resolve_domain(vec![DomainValue::from("z")]);
        assert_eq!(core.domain(), letters());
        assert_eq!(updates.get(), 1);
    }

    #[test]
    fn reset_filter_restores_current_domain() {
        let mut core = ScaleCore::new("s", "Scale", DomainInput::Ready(letters()));
        core.set_domain_filtered(vec![DomainValue::from("b")]);
        assert_eq!(core.domain_filtered().len(), 1);

        core.reset_filter();
        assert_eq!(core.domain_filtered(), core.domain());
    }

    #[test]
    fn unknown_palette_key_is_ignored() {
        let mut core = ScaleCore::new("s", "Scale", DomainInput::Ready(letters()));
        let before = core.color_scale().key();

        let updates = Rc::new(Cell::new(0));
        let counter = Rc::clone(&updates);
        core.on_update("observer", move || counter.set(counter.get() + 1));

        core.set_color_scale_by_key("NotAPalette");
        assert_eq!(core.color_scale().key(), before);
        assert_eq!(updates.get(), 0);

        core.set_color_scale_by_key("Viridis");
        assert_eq!(core.color_scale().key(), "Viridis");
        assert_eq!(updates.get(), 1);
    }

    #[test]
    fn reset_color_scale_restores_construction_palette() {
        let mut core = ScaleCore::new("s", "Scale", DomainInput::Ready(letters()));
        core.set_color_scale_by_key("Plasma");
        core.reset_color_scale();
        assert_eq!(core.color_scale().key(), "RdYlBu");
    }
}
