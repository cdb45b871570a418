use indexmap::IndexMap;
use serde_json::json;

use crate::canvas::Surface;
use crate::debug::DebugLogger;
use crate::distance::Distance;
use crate::error::FolioError;
use crate::frame::RenderingFrame;
use crate::geometry::{Extent, Region, Stretch};
use crate::state::{self, FrameState};
use crate::strategy::{FitIndices, LayoutStrategy};

pub struct ReservedArea {
    frame: Box<dyn RenderingFrame>,
    region: Region,
}

impl ReservedArea {
    fn new(frame: Box<dyn RenderingFrame>) -> Self {
        Self {
            frame,
            region: Region::default(),
        }
    }

    pub fn frame(&self) -> &dyn RenderingFrame {
        self.frame.as_ref()
    }

    /// Placement relative to the owning container; valid after `do_layout`.
    pub fn region(&self) -> Region {
        self.region
    }
}

pub struct Container {
    name: String,
    requested_size: Extent,
    state: FrameState,
    layout_size: Extent,
    children: IndexMap<String, ReservedArea>,
    sizes: Vec<Extent>,
    fit: FitIndices,
    strategy: Box<dyn LayoutStrategy>,
    debug: Option<DebugLogger>,
}

impl Container {
    pub fn new(
        name: impl Into<String>,
        requested_size: Extent,
        strategy: Box<dyn LayoutStrategy>,
    ) -> Self {
        Self {
            name: name.into(),
            requested_size: requested_size.coalesce(&Extent::FIT_TO),
            state: FrameState::New,
            layout_size: Extent::ZERO,
            children: IndexMap::new(),
            sizes: Vec::new(),
            fit: FitIndices::default(),
            strategy,
            debug: None,
        }
    }

    pub fn with_child(mut self, name: impl Into<String>, frame: Box<dyn RenderingFrame>) -> Self {
        self.children.insert(name.into(), ReservedArea::new(frame));
        self
    }

    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = (String, Box<dyn RenderingFrame>)>,
    {
        for (name, frame) in children {
            self.children.insert(name, ReservedArea::new(frame));
        }
        self
    }

    pub(crate) fn with_debug(mut self, debug: Option<DebugLogger>) -> Self {
        self.debug = debug;
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&ReservedArea> {
        self.children.get(name)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &ReservedArea)> {
        self.children.iter().map(|(name, area)| (name.as_str(), area))
    }

    pub fn layout_size(&self) -> Extent {
        self.layout_size
    }

    /// Add, replace or remove named children between pages.
    ///
    /// `None` removes the named child. A frame under a new name is appended;
    /// under an existing name it replaces the old frame in place.
    pub fn update<I>(&mut self, changes: I) -> Result<(), FolioError>
    where
        I: IntoIterator<Item = (String, Option<Box<dyn RenderingFrame>>)>,
    {
        if self.state.is_laying_out() {
            return Err(FolioError::MutationDuringLayout(self.name.clone()));
        }
        for (name, change) in changes {
            match change {
                None => {
                    self.children.shift_remove(&name);
                }
                Some(frame) => {
                    self.children.insert(name, ReservedArea::new(frame));
                }
            }
        }
        self.sizes.clear();
        self.fit = FitIndices::default();
        Ok(())
    }

    fn measure_children(&mut self, extent: Extent) -> Result<Extent, FolioError> {
        let offered = self.requested_size.intersect(&extent)?;

        let mut fit = FitIndices::default();
        let mut deferred = Vec::new();
        let mut sizes = Vec::with_capacity(self.children.len());
        for (index, area) in self.children.values_mut().enumerate() {
            let stretch = Stretch::of(&area.frame.requested_size());
            if stretch.width {
                fit.width.push(index);
            }
            if stretch.height {
                fit.height.push(index);
            }
            if stretch.any() {
                deferred.push((index, stretch));
            }
            sizes.push(area.frame.measure(offered)?);
        }
        self.sizes = sizes;
        self.fit = fit;

        let mut consumed = self.strategy.measure(&self.sizes, &self.fit)?;
        if !deferred.is_empty() {
            self.remeasure_deferred(offered, consumed, &deferred)?;
            consumed = self.strategy.measure(&self.sizes, &FitIndices::default())?;
        }
        log::debug!(
            "measured container '{}' at {} within {}",
            self.name,
            consumed,
            offered
        );
        self.layout_size = consumed;
        Ok(consumed)
    }

    fn place_children(&mut self, target: Extent) -> Result<Region, FolioError> {
        let (consumed, regions) = self.strategy.layout(target, &self.sizes, &self.fit)?;
        if regions.len() != self.children.len() {
            log::error!(
                "layout strategy for '{}' returned {} regions for {} children",
                self.name,
                regions.len(),
                self.children.len()
            );
            return Err(FolioError::RegionCountMismatch {
                expected: self.children.len(),
                actual: regions.len(),
            });
        }

        for ((child_name, area), allocated) in self.children.iter_mut().zip(regions) {
            let placed = area.frame.do_layout(allocated.extent)?;
            area.region = Region::new(
                allocated.origin.checked_add(&placed.origin)?,
                placed.extent,
            );
            log::debug!(
                "'{}' placed child '{}' at {}",
                self.name,
                child_name,
                area.region
            );
            if let Some(debug) = &self.debug {
                debug.log_event(
                    "container.child_layout",
                    json!({
                        "container": self.name,
                        "child": child_name,
                        "allocated": allocated.to_string(),
                        "region": area.region.to_string(),
                    }),
                );
                debug.increment("container.child_layout", 1);
            }
        }
        Ok(Region::at_zero(consumed))
    }

    /// Second pass for stretchy children: give each flagged axis an even
    /// share of the space the first pass left over (or overspent).
    fn remeasure_deferred(
        &mut self,
        offered: Extent,
        consumed: Extent,
        deferred: &[(usize, Stretch)],
    ) -> Result<(), FolioError> {
        let width_share = share(&offered.width, &consumed.width, self.fit.width.len())?;
        let height_share = share(&offered.height, &consumed.height, self.fit.height.len())?;

        for (index, stretch) in deferred {
            let first = self.sizes[*index];
            let mut proposed = first;
            if let (true, Some(extra)) = (stretch.width, width_share) {
                proposed.width = grow(&first.width, &extra, &self.name)?;
            }
            if let (true, Some(extra)) = (stretch.height, height_share) {
                proposed.height = grow(&first.height, &extra, &self.name)?;
            }
            let Some((_, area)) = self.children.get_index_mut(*index) else {
                continue;
            };
            let revised = area.frame.measure(proposed)?;
            // Never hand back less than the child asked for on re-measure.
            self.sizes[*index] = proposed.union(&revised)?;
        }
        Ok(())
    }
}

fn share(offered: &Distance, consumed: &Distance, count: usize) -> Result<Option<Distance>, FolioError> {
    if count == 0 || offered.is_fit_to() || offered.is_infinite() || consumed.is_infinite() {
        return Ok(None);
    }
    let leftover = offered.checked_sub(consumed)?.with_at_least(false);
    Ok(Some(leftover.checked_div(count as i64)?))
}

fn grow(size: &Distance, extra: &Distance, owner: &str) -> Result<Distance, FolioError> {
    let base = if size.is_fit_to() { Distance::ZERO } else { *size };
    let grown = base.checked_add(extra)?;
    if grown < 0i64 {
        log::warn!("container '{owner}' is over-subscribed; a stretchy child gets no space");
        return Ok(Distance::new(0, grown.unit()));
    }
    Ok(grown)
}

impl RenderingFrame for Container {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> FrameState {
        state::aggregate(self.children.values().map(|area| area.frame.state()))
            .unwrap_or(self.state)
    }

    fn requested_size(&self) -> Extent {
        self.requested_size
    }

    fn begin_page(&mut self, page_number: usize) -> bool {
        if self.children.is_empty() {
            if !self.state.is_drawn() || self.state.has_more_data() {
                self.state = FrameState::Waiting;
                return true;
            }
            return false;
        }
        let mut any = false;
        for area in self.children.values_mut() {
            any |= area.frame.begin_page(page_number);
        }
        self.state = FrameState::Waiting;
        any
    }

    fn measure(&mut self, extent: Extent) -> Result<Extent, FolioError> {
        let previous = self.state;
        self.state = FrameState::NeedsLayout;
        let measured = self.measure_children(extent);
        if measured.is_err() {
            self.state = previous;
        }
        measured
    }

    fn do_layout(&mut self, target: Extent) -> Result<Region, FolioError> {
        let previous = self.state;
        self.state = FrameState::Ready;
        let placed = self.place_children(target);
        if placed.is_err() {
            self.state = previous;
        }
        placed
    }

    fn draw(&mut self, surface: &mut dyn Surface, region: Region) -> Result<(), FolioError> {
        for area in self.children.values_mut() {
            let absolute = area.region.offset(&region.origin)?;
            surface.record_bounds(area.frame.name(), absolute.to_rect()?);
            area.frame.draw(surface, absolute)?;
        }
        self.state = FrameState::Drawn(self.state().decorations());
        Ok(())
    }
}
