use num_rational::Ratio;

use crate::canvas::Surface;
use crate::distance::Distance;
use crate::error::FolioError;
use crate::frame::{FrameCore, RenderingFrame};
use crate::geometry::{Extent, Region};
use crate::state::{Decorations, FrameState};

/// Pre-broken lines of text set at a fixed line height.
///
/// Lines that do not fit are carried to the next page. In `retain` mode the
/// same lines are redrawn on every page and anything that does not fit is
/// clipped.
pub struct TextBlock {
    core: FrameCore,
    lines: Vec<String>,
    line_height: Distance,
    font_size: Distance,
    retain: bool,
    cursor: usize,
    visible: usize,
}

impl TextBlock {
    pub fn new(
        name: impl Into<String>,
        requested_size: Extent,
        lines: Vec<String>,
        font_size: Distance,
        line_height: Distance,
    ) -> Self {
        Self {
            core: FrameCore::new(name, requested_size),
            lines,
            line_height,
            font_size,
            retain: false,
            cursor: 0,
            visible: 0,
        }
    }

    pub fn retained(mut self) -> Self {
        self.retain = true;
        self
    }

    pub fn remaining(&self) -> &[String] {
        &self.lines[self.cursor.min(self.lines.len())..]
    }

    fn lines_fitting(&self, height: &Distance) -> Result<usize, FolioError> {
        if height.is_fit_to() || height.is_infinite() {
            return Ok(self.remaining().len());
        }
        let whole = height.div_floor(&self.line_height)?.to_integer();
        Ok(usize::try_from(whole).unwrap_or(0))
    }
}

impl RenderingFrame for TextBlock {
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
        let natural = self
            .line_height
            .checked_mul(Ratio::from_integer(self.remaining().len() as i64))?;
        let height = if extent.height.is_fit_to() {
            natural
        } else {
            natural.try_min(&extent.height)?
        };
        let width = self.core.requested_size().width;
        let width = if width.is_fit_to() { extent.width } else { width };
        self.core.measure(Extent::new(width, height))
    }

    fn do_layout(&mut self, target: Extent) -> Result<Region, FolioError> {
        let remaining = self.remaining().len();
        let fitting = self.lines_fitting(&target.height)?;
        if fitting < remaining {
            log::warn!(
                "text '{}' clipped: {} of {} lines fit in {}",
                self.core.name(),
                fitting,
                remaining,
                target.height.log_str()
            );
        }
        self.visible = fitting.min(remaining);
        self.core.do_layout(target)
    }

    fn draw(&mut self, surface: &mut dyn Surface, region: Region) -> Result<(), FolioError> {
        let rect = region.to_rect()?;
        let font_size = self.font_size.to_pt()?;
        let line_height = self.line_height.to_pt()?;
        let mut baseline = rect.top() - font_size;
        let start = self.cursor.min(self.lines.len());
        let end = (start + self.visible).min(self.lines.len());
        for line in &self.lines[start..end] {
            surface.draw_text(rect.x, baseline, font_size, line);
            baseline = baseline - line_height;
        }

        let decorations = if self.retain {
            Decorations::REUSABLE | Decorations::ALL_DATA_CONSUMED
        } else {
            self.cursor = end;
            if self.cursor < self.lines.len() {
                Decorations::HAVE_MORE_DATA
            } else {
                Decorations::ALL_DATA_CONSUMED
            }
        };
        self.core.finish_draw(decorations);
        Ok(())
    }
}
