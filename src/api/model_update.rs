use tracing::{debug, warn};

use crate::api::PlotModel;
use crate::core::{Axis, AxisHandle, AxisPosition, PlotElement};

impl PlotModel {
    /// Recomputes data extents, axis ranges and axis transforms.
    ///
    /// With `update_data` every element first refreshes its cached data.
    /// Transforms use the plot area of the last render, so calling this twice
    /// without mutations in between yields identical ranges and transforms.
    pub fn update(&mut self, update_data: bool) {
        self.ensure_default_axes();

        if update_data {
            for series in &mut self.series {
                series.update_data();
            }
            for annotation in &mut self.annotations {
                annotation.update_data();
            }
        }

        for axis in &self.axes {
            match axis.try_borrow_mut() {
                Some(mut axis) => axis.reset_data_range(),
                None => warn!("axis is borrowed during update; its range is kept"),
            }
        }

        for series in &self.series {
            self.include_extents(series.as_ref());
        }
        for annotation in &self.annotations {
            self.include_extents(annotation.as_ref());
        }

        let plot_area = self.layout.plot_area;
        for axis in &self.axes {
            if let Some(mut axis) = axis.try_borrow_mut() {
                axis.update_actual_range();
                axis.update_transform(plot_area);
            }
        }
    }

    fn include_extents<E: PlotElement + ?Sized>(&self, element: &E) {
        if !element.is_visible() {
            return;
        }
        let Some(extents) = element.data_extents() else {
            return;
        };
        if let Some(index) = self.resolve_axis(element.x_axis_key(), true) {
            if let Some(mut axis) = self.axes[index].try_borrow_mut() {
                axis.include_data_range(extents.x_min, extents.x_max);
            }
        }
        if let Some(index) = self.resolve_axis(element.y_axis_key(), false) {
            if let Some(mut axis) = self.axes[index].try_borrow_mut() {
                axis.include_data_range(extents.y_min, extents.y_max);
            }
        }
    }

    /// Adds a bottom and a left axis when elements exist but no axis of that
    /// orientation does.
    fn ensure_default_axes(&mut self) {
        if self.series.is_empty() && self.annotations.is_empty() {
            return;
        }
        for (horizontal, position) in [(true, AxisPosition::Bottom), (false, AxisPosition::Left)] {
            if self.default_axis_index(horizontal).is_some() {
                continue;
            }
            let axis = AxisHandle::new(Axis::new(position));
            axis.borrow_mut().set_owner(Some(self.id()));
            self.axes.push(axis);
            debug!(model = self.id().raw(), ?position, "default axis created");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::PlotModel;
    use crate::core::{Axis, AxisPosition, DataPoint, LineSeries};

    #[test]
    fn default_axes_are_created_for_elements() {
        let mut model = PlotModel::new();
        model.update(true);
        assert!(model.axes().is_empty());

        model.add_series(LineSeries::new().with_points([DataPoint::new(0.0, 1.0)]));
        model.update(true);
        let positions: Vec<_> = model.axes().iter().map(|axis| axis.borrow().position()).collect();
        assert_eq!(positions, vec![AxisPosition::Bottom, AxisPosition::Left]);
        assert!(model.axes().iter().all(|axis| axis.borrow().owner() == Some(model.id())));
    }

    #[test]
    fn keyed_series_only_widen_their_axis() {
        let mut model = PlotModel::new();
        model.add_axis(Axis::new(AxisPosition::Bottom)).expect("x axis");
        model
            .add_axis(Axis::new(AxisPosition::Left).with_key("left"))
            .expect("left axis");
        model
            .add_axis(Axis::new(AxisPosition::Right).with_key("right"))
            .expect("right axis");
        model.add_series(
            LineSeries::new()
                .with_axis_keys(None, Some("right"))
                .with_points([DataPoint::new(0.0, 500.0), DataPoint::new(1.0, 600.0)]),
        );
        model.update(true);

        let left = model.axis_by_key("left").expect("left");
        let right = model.axis_by_key("right").expect("right");
        assert!(left.borrow().data_range().is_none());
        assert_eq!(right.borrow().data_range(), Some((500.0, 600.0)));
    }

    #[test]
    fn unknown_key_falls_back_to_default_axis() {
        let mut model = PlotModel::new();
        model.add_series(
            LineSeries::new()
                .with_axis_keys(Some("missing"), None)
                .with_points([DataPoint::new(2.0, 3.0), DataPoint::new(4.0, 5.0)]),
        );
        model.update(true);
        let x_axis = &model.axes()[0];
        assert_eq!(x_axis.borrow().data_range(), Some((2.0, 4.0)));
    }
}
