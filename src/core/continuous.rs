use super::color::{Color, ColorScale, UNKNOWN_COLOR};
use super::scale::{DomainInput, Scale, ScaleCore};
use super::value::DomainValue;

/// Scale over a numeric interval; the domain is the two-element pair
/// `[min, max]` and the filtered domain is the currently zoomed interval.
///
/// Colors always normalize against the full domain, not the filtered one: a
/// value keeps its color while zooming because color encodes its absolute
/// position in the full range.
#[derive(Debug)]
pub struct ContinuousScale {
    core: ScaleCore,
}

impl ContinuousScale {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        domain: impl Into<DomainInput>,
    ) -> Self {
        Self {
            core: ScaleCore::with_color_scale(
                id,
                name,
                domain.into(),
                ColorScale::default_continuous(),
            ),
        }
    }

    /// Convenience constructor for a `[min, max]` domain known up front.
    pub fn with_bounds(id: impl Into<String>, name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(
            id,
            name,
            vec![DomainValue::number(min), DomainValue::number(max)],
        )
    }

    /// Selects the construction palette by registry key; unknown keys keep
    /// the continuous default.
    #[must_use]
    pub fn with_palette_key(mut self, palette_key: &str) -> Self {
        if let Some(color_scale) = ColorScale::by_key(palette_key) {
            self.core.install_palette(color_scale);
        }
        self
    }

    /// Full `[min, max]` interval, once the domain is resolved.
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        interval(self.core.domain())
    }

    /// Currently zoomed `[min, max]` interval.
    #[must_use]
    pub fn bounds_filtered(&self) -> Option<(f64, f64)> {
        interval(self.core.domain_filtered())
    }

    /// Narrows the filtered interval to `[min, max]` exactly as given; the
    /// bounds are not reordered or validated.
    pub fn zoom(&mut self, min: f64, max: f64) {
        self.core
            .set_domain_filtered(vec![DomainValue::number(min), DomainValue::number(max)]);
    }
}

fn interval(values: &[DomainValue]) -> Option<(f64, f64)> {
    match values {
        [min, max] => Some((min.to_number()?, max.to_number()?)),
        _ => None,
    }
}

impl Scale for ContinuousScale {
    fn core(&self) -> &ScaleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScaleCore {
        &mut self.core
    }

    fn color(&self, value: &DomainValue) -> Color {
        let Some(number) = value.to_number() else {
            return UNKNOWN_COLOR;
        };
        let Some((min, max)) = self.bounds() else {
            return UNKNOWN_COLOR;
        };
        self.core.color_scale().sample((number - min) / (max - min))
    }

    fn rank(&self, value: &DomainValue) -> f64 {
        value.to_number().unwrap_or(-1.0)
    }
}
