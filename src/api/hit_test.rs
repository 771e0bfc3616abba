use ordered_float::OrderedFloat;
use tracing::trace;

use crate::api::PlotModel;
use crate::core::{DataPoint, ElementId, PlotElement, ScreenPoint};

/// Collection an element hit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Series,
    Annotation,
}

/// Reference to an element of a model, stable while the collection is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub id: ElementId,
    /// Position inside its collection at query time.
    pub index: usize,
}

/// One element near a queried screen point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTestResult {
    pub element: ElementRef,
    pub nearest_point: ScreenPoint,
    pub distance: f64,
    pub item_index: Option<usize>,
    pub data_point: Option<DataPoint>,
    /// Paint order across series and annotations; higher is drawn later.
    pub z_order: usize,
}

impl PlotModel {
    /// Elements within `tolerance` screen units of `point`.
    ///
    /// Nearest first; equal distances list the element painted on top first.
    /// Read-only: neither axes nor elements change.
    #[must_use]
    pub fn hit_test(&self, point: ScreenPoint, tolerance: f64) -> Vec<HitTestResult> {
        if !point.is_finite() || !tolerance.is_finite() || tolerance < 0.0 {
            return Vec::new();
        }
        if self.layout.plot_area.is_degenerate() {
            trace!("hit test before a successful layout");
            return Vec::new();
        }

        let mut results = Vec::new();
        let mut z_order = 0;
        for (index, series) in self.series.iter().enumerate() {
            let element = ElementRef {
                kind: ElementKind::Series,
                id: series.id(),
                index,
            };
            self.collect_hit(series.as_ref(), element, z_order, point, tolerance, &mut results);
            z_order += 1;
        }
        for (index, annotation) in self.annotations.iter().enumerate() {
            let element = ElementRef {
                kind: ElementKind::Annotation,
                id: annotation.id(),
                index,
            };
            self.collect_hit(annotation.as_ref(), element, z_order, point, tolerance, &mut results);
            z_order += 1;
        }

        results.sort_by_key(|hit: &HitTestResult| {
            (OrderedFloat(hit.distance), std::cmp::Reverse(hit.z_order))
        });
        results
    }

    /// Hits restricted to one element collection, in the same order.
    #[must_use]
    pub fn hit_test_kind(
        &self,
        point: ScreenPoint,
        tolerance: f64,
        kind: ElementKind,
    ) -> Vec<HitTestResult> {
        let mut results = self.hit_test(point, tolerance);
        results.retain(|hit| hit.element.kind == kind);
        results
    }

    fn collect_hit<E: PlotElement + ?Sized>(
        &self,
        element: &E,
        element_ref: ElementRef,
        z_order: usize,
        point: ScreenPoint,
        tolerance: f64,
        results: &mut Vec<HitTestResult>,
    ) {
        if !element.is_visible() {
            return;
        }
        let Some(transform) = self.element_transform(element) else {
            return;
        };
        let Some(hit) = element.hit_test(point, tolerance, &transform) else {
            return;
        };
        if !hit.distance.is_finite() || hit.distance > tolerance {
            return;
        }
        results.push(HitTestResult {
            element: element_ref,
            nearest_point: hit.nearest_point,
            distance: hit.distance,
            item_index: hit.item_index,
            data_point: hit.data_point,
            z_order,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::ElementKind;
    use crate::api::PlotModel;
    use crate::core::{DataPoint, LineSeries, RectangleAnnotation, ScreenPoint};
    use crate::render::NullRenderContext;

    fn rendered(model: &mut PlotModel) {
        model.update(true);
        model.render(&mut NullRenderContext::default(), 400.0, 300.0);
    }

    #[test]
    fn empty_before_layout_and_for_invalid_queries() {
        let mut model = PlotModel::new();
        model.add_annotation(RectangleAnnotation::new(0.0, 100.0, 0.0, 100.0));
        assert!(model.hit_test(ScreenPoint::new(10.0, 10.0), 5.0).is_empty());

        rendered(&mut model);
        let center = model.plot_area().center();
        assert!(!model.hit_test(center, 0.0).is_empty());
        assert!(model.hit_test(center, -1.0).is_empty());
        assert!(model.hit_test(ScreenPoint::new(f64::NAN, 1.0), 5.0).is_empty());
    }

    #[test]
    fn later_element_wins_equal_distance() {
        let mut model = PlotModel::new();
        model.add_series(
            LineSeries::new().with_points([DataPoint::new(0.0, 0.0), DataPoint::new(10.0, 10.0)]),
        );
        let first = model.add_annotation(RectangleAnnotation::new(2.0, 8.0, 2.0, 8.0));
        let second = model.add_annotation(RectangleAnnotation::new(3.0, 7.0, 3.0, 7.0));
        rendered(&mut model);

        let center = model.plot_area().center();
        let hits = model.hit_test_kind(center, 1.0, ElementKind::Annotation);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].element.id, second);
        assert_eq!(hits[1].element.id, first);
        assert!(hits[0].z_order > hits[1].z_order);
    }
}
