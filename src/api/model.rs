use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::api::{PlotLayout, PlotStyle, PlotView};
use crate::core::{
    Annotation, Axis, AxisHandle, AxisPosition, ElementId, ModelId, PlotElement, ScreenPoint,
    ScreenRect, Series, XyTransform,
};
use crate::error::{PlotError, PlotResult};

/// Aggregate root of a plot: axes, series and annotations plus the view link.
///
/// Collections keep insertion order, which is also paint order and the
/// hit-test tie-break order. An axis belongs to at most one model at a time;
/// series and annotations are moved in, so the same instance can never be
/// shared between models.
pub struct PlotModel {
    id: ModelId,
    pub(crate) title: Option<String>,
    pub(crate) subtitle: Option<String>,
    pub(crate) style: PlotStyle,
    pub(crate) axes: Vec<AxisHandle>,
    pub(crate) series: Vec<Box<dyn Series>>,
    pub(crate) annotations: Vec<Box<dyn Annotation>>,
    plot_view: Option<Weak<dyn PlotView>>,
    pub(crate) layout: PlotLayout,
}

impl Default for PlotModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlotModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotModel")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("subtitle", &self.subtitle)
            .field("axes", &self.axes.len())
            .field("series", &self.series)
            .field("annotations", &self.annotations)
            .field("has_plot_view", &self.plot_view().is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for PlotModel {
    fn drop(&mut self) {
        for axis in &self.axes {
            if let Some(mut axis) = axis.try_borrow_mut() {
                axis.set_owner(None);
            }
        }
    }
}

impl PlotModel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ModelId::next(),
            title: None,
            subtitle: None,
            style: PlotStyle::default(),
            axes: Vec::new(),
            series: Vec::new(),
            annotations: Vec::new(),
            plot_view: None,
            layout: PlotLayout::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ModelId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    #[must_use]
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) {
        self.subtitle = Some(subtitle.into());
    }

    pub fn clear_titles(&mut self) {
        self.title = None;
        self.subtitle = None;
    }

    #[must_use]
    pub fn style(&self) -> PlotStyle {
        self.style
    }

    pub fn set_style(&mut self, style: PlotStyle) -> PlotResult<()> {
        self.style = style.validate()?;
        Ok(())
    }

    /// Layout computed by the last render.
    #[must_use]
    pub fn layout(&self) -> PlotLayout {
        self.layout
    }

    #[must_use]
    pub fn plot_area(&self) -> ScreenRect {
        self.layout.plot_area
    }

    #[must_use]
    pub fn axes(&self) -> &[AxisHandle] {
        &self.axes
    }

    /// Appends an axis and makes this model its owner.
    ///
    /// Fails without touching the collection when the axis already belongs
    /// to any model (this one included) or is currently borrowed.
    pub fn add_axis(&mut self, axis: impl Into<AxisHandle>) -> PlotResult<()> {
        let axis = axis.into();
        let Some(mut inner) = axis.try_borrow_mut() else {
            warn!(model = self.id.raw(), "rejected axis that is currently borrowed");
            return Err(PlotError::Structural(
                "axis is borrowed and cannot be added".to_owned(),
            ));
        };

        if let Some(owner) = inner.owner() {
            warn!(
                model = self.id.raw(),
                owner = owner.raw(),
                "rejected axis that already has an owner"
            );
            let message = if owner == self.id {
                "axis is already part of this model"
            } else {
                "axis already belongs to another model"
            };
            return Err(PlotError::Structural(message.to_owned()));
        }

        inner.set_owner(Some(self.id));
        drop(inner);
        self.axes.push(axis);
        debug!(model = self.id.raw(), axis_count = self.axes.len(), "axis added");
        Ok(())
    }

    /// Removes `axis` and clears its owner; returns whether it was present.
    ///
    /// Elements still naming the axis by key fall back to the default axis.
    pub fn remove_axis(&mut self, axis: &AxisHandle) -> bool {
        let Some(index) = self.axes.iter().position(|candidate| candidate.ptr_eq(axis)) else {
            return false;
        };
        let removed = self.axes.remove(index);
        if let Some(mut inner) = removed.try_borrow_mut() {
            inner.set_owner(None);
        }
        debug!(model = self.id.raw(), axis_count = self.axes.len(), "axis removed");
        true
    }

    pub fn clear_axes(&mut self) {
        for axis in self.axes.drain(..) {
            if let Some(mut inner) = axis.try_borrow_mut() {
                inner.set_owner(None);
            }
        }
    }

    /// Last axis whose key equals `key`.
    ///
    /// An axis that is mutably borrowed while it is examined makes the lookup
    /// fail with `Structural`, since it might be the last match.
    pub fn axis_by_key(&self, key: &str) -> PlotResult<AxisHandle> {
        for axis in self.axes.iter().rev() {
            let Some(inner) = axis.try_borrow() else {
                warn!(model = self.id.raw(), key, "axis borrowed during key lookup");
                return Err(PlotError::Structural(format!(
                    "axis is mutably borrowed while looking up key `{key}`"
                )));
            };
            if inner.key() == Some(key) {
                return Ok(axis.clone());
            }
        }
        Err(PlotError::AxisNotFound {
            key: key.to_owned(),
        })
    }

    pub fn add_series(&mut self, series: impl Series) -> ElementId {
        self.add_boxed_series(Box::new(series))
    }

    pub fn add_boxed_series(&mut self, series: Box<dyn Series>) -> ElementId {
        let id = series.id();
        self.series.push(series);
        debug!(model = self.id.raw(), series = id.raw(), "series added");
        id
    }

    pub fn remove_series(&mut self, id: ElementId) -> Option<Box<dyn Series>> {
        let index = self.series.iter().position(|series| series.id() == id)?;
        debug!(model = self.id.raw(), series = id.raw(), "series removed");
        Some(self.series.remove(index))
    }

    #[must_use]
    pub fn series(&self) -> &[Box<dyn Series>] {
        &self.series
    }

    #[must_use]
    pub fn series_by_id(&self, id: ElementId) -> Option<&dyn Series> {
        self.series
            .iter()
            .find(|series| series.id() == id)
            .map(|series| series.as_ref())
    }

    #[must_use]
    pub fn series_as<T: Series>(&self, id: ElementId) -> Option<&T> {
        self.series_by_id(id)?.downcast_ref::<T>()
    }

    pub fn series_as_mut<T: Series>(&mut self, id: ElementId) -> Option<&mut T> {
        self.series
            .iter_mut()
            .find(|series| series.id() == id)?
            .downcast_mut::<T>()
    }

    pub fn add_annotation(&mut self, annotation: impl Annotation) -> ElementId {
        self.add_boxed_annotation(Box::new(annotation))
    }

    pub fn add_boxed_annotation(&mut self, annotation: Box<dyn Annotation>) -> ElementId {
        let id = annotation.id();
        self.annotations.push(annotation);
        debug!(model = self.id.raw(), annotation = id.raw(), "annotation added");
        id
    }

    pub fn remove_annotation(&mut self, id: ElementId) -> Option<Box<dyn Annotation>> {
        let index = self
            .annotations
            .iter()
            .position(|annotation| annotation.id() == id)?;
        debug!(model = self.id.raw(), annotation = id.raw(), "annotation removed");
        Some(self.annotations.remove(index))
    }

    #[must_use]
    pub fn annotations(&self) -> &[Box<dyn Annotation>] {
        &self.annotations
    }

    #[must_use]
    pub fn annotation_by_id(&self, id: ElementId) -> Option<&dyn Annotation> {
        self.annotations
            .iter()
            .find(|annotation| annotation.id() == id)
            .map(|annotation| annotation.as_ref())
    }

    #[must_use]
    pub fn annotation_as<T: Annotation>(&self, id: ElementId) -> Option<&T> {
        self.annotation_by_id(id)?.downcast_ref::<T>()
    }

    pub fn annotation_as_mut<T: Annotation>(&mut self, id: ElementId) -> Option<&mut T> {
        self.annotations
            .iter_mut()
            .find(|annotation| annotation.id() == id)?
            .downcast_mut::<T>()
    }

    /// Stores a weak link to `view`.
    ///
    /// Re-attaching the same view is a no-op; attaching while another view is
    /// still alive is a structural error.
    pub fn attach_plot_view(&mut self, view: &Rc<dyn PlotView>) -> PlotResult<()> {
        if let Some(current) = self.plot_view() {
            if Rc::ptr_eq(&current, view) {
                return Ok(());
            }
            warn!(model = self.id.raw(), "rejected second live plot view");
            return Err(PlotError::Structural(
                "model is already attached to another live view".to_owned(),
            ));
        }
        self.plot_view = Some(Rc::downgrade(view));
        debug!(model = self.id.raw(), "plot view attached");
        Ok(())
    }

    pub fn detach_plot_view(&mut self) {
        if self.plot_view.take().is_some() {
            debug!(model = self.id.raw(), "plot view detached");
        }
    }

    /// Attached view if it is still alive.
    #[must_use]
    pub fn plot_view(&self) -> Option<Rc<dyn PlotView>> {
        self.plot_view.as_ref().and_then(Weak::upgrade)
    }

    /// Notifies the attached view; never renders by itself.
    pub fn invalidate_plot(&self, update_data: bool) {
        match self.plot_view() {
            Some(view) => view.invalidate_plot(update_data),
            None => trace!(model = self.id.raw(), "invalidate without attached view"),
        }
    }

    /// Index of the axis an element with `key` uses along one orientation.
    ///
    /// Unknown keys fall back to the first axis of that orientation with a
    /// visible position.
    pub(crate) fn resolve_axis(&self, key: Option<&str>, horizontal: bool) -> Option<usize> {
        if let Some(key) = key {
            let keyed = self.axes.iter().rposition(|axis| {
                axis.try_borrow()
                    .is_some_and(|axis| axis.key() == Some(key))
            });
            if keyed.is_some() {
                return keyed;
            }
            trace!(key, "unresolved axis key, using default axis");
        }
        self.default_axis_index(horizontal)
    }

    pub(crate) fn default_axis_index(&self, horizontal: bool) -> Option<usize> {
        self.axes.iter().position(|axis| {
            axis.try_borrow()
                .is_some_and(|axis| orientation_matches(axis.position(), horizontal))
        })
    }

    /// Transform pair of an element's resolved axes, clipped to their bands.
    pub(crate) fn element_transform<E: PlotElement + ?Sized>(
        &self,
        element: &E,
    ) -> Option<XyTransform> {
        let x_index = self.resolve_axis(element.x_axis_key(), true)?;
        let y_index = self.resolve_axis(element.y_axis_key(), false)?;
        let x_axis = self.axes[x_index].try_borrow()?;
        let y_axis = self.axes[y_index].try_borrow()?;

        let (x0, x1) = x_axis.screen_band();
        let (y0, y1) = y_axis.screen_band();
        let left = x0.min(x1);
        let top = y0.min(y1);
        let clip = ScreenRect::new(left, top, x0.max(x1) - left, y0.max(y1) - top);
        Some(XyTransform::new(x_axis.transform(), y_axis.transform(), clip))
    }

    /// Horizontal and vertical axis whose bands contain `point`.
    #[must_use]
    pub fn axes_at_point(&self, point: ScreenPoint) -> (Option<AxisHandle>, Option<AxisHandle>) {
        let pick = |horizontal: bool| {
            self.axes
                .iter()
                .find(|axis| {
                    axis.try_borrow().is_some_and(|axis| {
                        orientation_matches(axis.position(), horizontal)
                            && axis.band_contains(point)
                    })
                })
                .cloned()
        };
        (pick(true), pick(false))
    }

    /// Pans every axis by the pointer movement; returns whether any range changed.
    pub fn pan_all_axes(&self, previous: ScreenPoint, current: ScreenPoint) -> bool {
        self.for_each_axis(|axis| axis.pan(previous, current))
    }

    /// Zooms every axis around the middle of its band.
    pub fn zoom_all_axes(&self, factor: f64) -> bool {
        self.for_each_axis(|axis| axis.zoom_by(factor))
    }

    pub fn reset_all_axes(&self) {
        self.for_each_axis(|axis| {
            axis.reset();
            true
        });
    }

    fn for_each_axis(&self, mut apply: impl FnMut(&mut Axis) -> bool) -> bool {
        let mut changed = false;
        for axis in &self.axes {
            if let Some(mut axis) = axis.try_borrow_mut() {
                changed |= apply(&mut axis);
            }
        }
        changed
    }
}

fn orientation_matches(position: AxisPosition, horizontal: bool) -> bool {
    if horizontal {
        position.is_horizontal()
    } else {
        position.is_vertical()
    }
}
