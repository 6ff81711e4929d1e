use indexmap::IndexMap;

use crate::data::DataContainer;

use super::categorical::CategoricalScale;
use super::color::{Color, UNKNOWN_COLOR};
use super::scale::{Scale, ScaleCore};
use super::value::DomainValue;

/// Yes/no scale: a categorical scale fixed to the domain `[1, 0]` with the
/// labels `["Yes", "No"]`.
///
/// Coloring is flipped so that `1` ("Yes") takes the start of the palette.
#[derive(Debug)]
pub struct BinaryScale {
    inner: CategoricalScale,
}

impl BinaryScale {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let inner = CategoricalScale::new(
            id,
            name,
            vec![DomainValue::number(1.0), DomainValue::number(0.0)],
        )
        .with_human_domain(["Yes", "No"]);
        Self { inner }
    }

    #[must_use]
    pub fn as_categorical(&self) -> &CategoricalScale {
        &self.inner
    }

    pub fn as_categorical_mut(&mut self) -> &mut CategoricalScale {
        &mut self.inner
    }

    pub fn zoom(&mut self, min_index: usize, max_index: usize) {
        self.inner.zoom(min_index, max_index);
    }

    pub fn filter(&mut self, indices: &[usize]) {
        self.inner.filter(indices);
    }

    pub fn sort(&mut self, data: &DataContainer, variable_key: &str, ascending: bool) {
        self.inner.sort(data, variable_key, ascending);
    }

    pub fn set_color_overrides(&mut self, overrides: IndexMap<String, Color>) {
        self.inner.set_color_overrides(overrides);
    }

    pub fn reset_color_override(&mut self) {
        self.inner.reset_color_override();
    }

    pub fn reset_sort(&mut self) {
        self.inner.reset_sort();
    }
}

impl Scale for BinaryScale {
    fn core(&self) -> &ScaleCore {
        self.inner.core()
    }

    fn core_mut(&mut self) -> &mut ScaleCore {
        self.inner.core_mut()
    }

    fn color(&self, value: &DomainValue) -> Color {
        let Some(number) = value.to_number() else {
            return UNKNOWN_COLOR;
        };
        self.core().color_scale().sample(1.0 - number)
    }

    fn rank(&self, value: &DomainValue) -> f64 {
        value.to_number().unwrap_or(-1.0)
    }

    fn to_human(&self, value: &DomainValue) -> String {
        self.inner.to_human(value)
    }
}
