use std::sync::Arc;

use num_rational::Ratio;

use crate::canvas::{Surface, VectorForm};
use crate::distance::{Distance, DistanceUnit};
use crate::error::FolioError;
use crate::frame::{FrameCore, RenderingFrame};
use crate::geometry::{AnchorPoint, Contains, Extent, Pos, Region};
use crate::state::{Decorations, FrameState};
use crate::types::{Pt, Transform};

/// Places a pre-rendered [`VectorForm`] inside its region by anchor.
///
/// Vector art cannot be clipped: laying it out in a target smaller than the
/// form fails with [`FolioError::InsufficientSpace`].
pub struct VectorArt {
    core: FrameCore,
    anchor: AnchorPoint,
    form: Arc<VectorForm>,
    origin: Pos,
    scale: f32,
}

impl VectorArt {
    pub fn new(
        name: impl Into<String>,
        requested_size: Extent,
        anchor: AnchorPoint,
        form: Arc<VectorForm>,
    ) -> Self {
        Self {
            core: FrameCore::new(name, requested_size),
            anchor,
            form,
            origin: Pos::ZERO,
            scale: 1.0,
        }
    }

    /// Uniform scale applied to the form's own coordinate space.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    fn content_size(&self) -> Extent {
        let scaled = |value: Pt| {
            let milli = (value.to_milli_i64() as f64 * self.scale as f64).round() as i64;
            Distance::at_least(Ratio::new(milli, 1000), DistanceUnit::Point)
        };
        Extent::new(scaled(self.form.width), scaled(self.form.height))
    }
}

impl RenderingFrame for VectorArt {
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

    fn measure(&mut self, _extent: Extent) -> Result<Extent, FolioError> {
        let minimum = self.core.requested_size().union(&self.content_size())?;
        self.core.measure(minimum)
    }

    fn do_layout(&mut self, target: Extent) -> Result<Region, FolioError> {
        let content = self.content_size();
        if !target.contains(&content) {
            return Err(FolioError::InsufficientSpace {
                frame: self.core.name().to_string(),
                needed: content.to_string(),
                offered: target.to_string(),
            });
        }
        self.core.do_layout(target)?;
        self.origin = content.anchor_at(self.anchor, &target)?;
        Ok(Region::new(self.origin, target))
    }

    fn draw(&mut self, surface: &mut dyn Surface, region: Region) -> Result<(), FolioError> {
        let (x, y) = region.origin_pt()?;
        let placement = Transform::scale(self.scale, self.scale).then(&Transform::translate(x, y));
        surface.draw_form(&self.form, placement);
        self.core.finish_draw(Decorations::REUSABLE);
        Ok(())
    }
}
