use crate::canvas::{Stroke, Surface};
use crate::distance::Distance;
use crate::error::FolioError;
use crate::frame::{FrameCore, RenderingFrame};
use crate::geometry::{Extent, Region};
use crate::state::{Decorations, FrameState};
use crate::types::Pt;

/// A blank area. Fit-to-space components absorb slack in a layout.
#[derive(Debug, Clone)]
pub struct EmptySpace {
    core: FrameCore,
    size: Extent,
}

impl EmptySpace {
    pub fn new(name: impl Into<String>, size: Extent) -> Self {
        Self {
            core: FrameCore::new(name, size),
            size,
        }
    }

    /// Spacer that stretches along both axes.
    pub fn filler(name: impl Into<String>) -> Self {
        Self::new(name, Extent::FIT_TO)
    }
}

impl RenderingFrame for EmptySpace {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn state(&self) -> FrameState {
        self.core.state()
    }

    fn requested_size(&self) -> Extent {
        self.core.requested_size()
    }

    fn begin_page(&mut self, page_number: usize) -> bool {
        self.core.begin_page(page_number)
    }

    fn measure(&mut self, extent: Extent) -> Result<Extent, FolioError> {
        self.core.measure(self.size.coalesce(&extent))
    }

    fn do_layout(&mut self, target: Extent) -> Result<Region, FolioError> {
        self.core.do_layout(target)
    }

    fn draw(&mut self, _surface: &mut dyn Surface, _region: Region) -> Result<(), FolioError> {
        self.core.finish_draw(Decorations::REUSABLE);
        Ok(())
    }
}

/// A stroked line across the full width of its region, centred vertically.
#[derive(Debug, Clone)]
pub struct HorizontalRule {
    core: FrameCore,
    height: Distance,
    stroke: Stroke,
}

impl HorizontalRule {
    pub fn new(name: impl Into<String>, height: Distance, stroke: Stroke) -> Self {
        Self {
            core: FrameCore::new(name, Extent::new(Distance::FIT_TO, height)),
            height,
            stroke,
        }
    }
}

impl RenderingFrame for HorizontalRule {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn state(&self) -> FrameState {
        self.core.state()
    }

    fn requested_size(&self) -> Extent {
        self.core.requested_size()
    }

    fn begin_page(&mut self, page_number: usize) -> bool {
        self.core.begin_page(page_number)
    }

    fn measure(&mut self, extent: Extent) -> Result<Extent, FolioError> {
        self.core
            .measure(Extent::new(extent.width, self.height).coalesce(&extent))
    }

    fn do_layout(&mut self, target: Extent) -> Result<Region, FolioError> {
        self.core.do_layout(target)
    }

    fn draw(&mut self, surface: &mut dyn Surface, region: Region) -> Result<(), FolioError> {
        let rect = region.to_rect()?;
        let y = rect.y + Pt::from_milli_i64(rect.height.to_milli_i64() / 2);
        surface.draw_line((rect.x, y), (rect.right(), y), self.stroke);
        self.core.finish_draw(Decorations::REUSABLE);
        Ok(())
    }
}
