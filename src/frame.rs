use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::Surface;
use crate::error::FolioError;
use crate::geometry::{Extent, Region};
use crate::state::{Decorations, FrameState};

/// Sized, placed and drawn once per page, in that order.
pub trait RenderingFrame {
    fn name(&self) -> &str;

    fn state(&self) -> FrameState;

    fn requested_size(&self) -> Extent;

    fn begin_page(&mut self, page_number: usize) -> bool;

    fn measure(&mut self, extent: Extent) -> Result<Extent, FolioError>;

    fn do_layout(&mut self, target: Extent) -> Result<Region, FolioError>;

    fn draw(&mut self, surface: &mut dyn Surface, region: Region) -> Result<(), FolioError>;
}

#[derive(Debug, Clone)]
pub struct FrameCore {
    name: String,
    requested_size: Extent,
    state: FrameState,
    layout_size: Extent,
}

impl FrameCore {
    pub fn new(name: impl Into<String>, requested_size: Extent) -> Self {
        Self {
            name: name.into(),
            requested_size: requested_size.coalesce(&Extent::FIT_TO),
            state: FrameState::New,
            layout_size: Extent::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn set_state(&mut self, state: FrameState) {
        self.state = state;
    }

    pub fn requested_size(&self) -> Extent {
        self.requested_size
    }

    /// Extent from the last `measure`, then the target of `do_layout`.
    pub fn layout_size(&self) -> Extent {
        self.layout_size
    }

    pub fn begin_page(&mut self, _page_number: usize) -> bool {
        if !self.state.is_drawn() || self.state.has_more_data() {
            self.state = FrameState::Waiting;
            return true;
        }
        false
    }

    pub fn measure(&mut self, extent: Extent) -> Result<Extent, FolioError> {
        self.state = FrameState::NeedsLayout;
        self.layout_size = extent.coalesce(&self.requested_size);
        Ok(self.layout_size)
    }

    pub fn do_layout(&mut self, target: Extent) -> Result<Region, FolioError> {
        self.state = FrameState::Ready;
        self.layout_size = target;
        Ok(Region::at_zero(target))
    }

    pub fn finish_draw(&mut self, decorations: Decorations) {
        self.state = FrameState::Drawn(decorations);
    }
}

/// A frame placed on more than one page layout.
///
/// Clones share the same underlying frame, so a text flow that starts on a
/// title page continues on the pages after it.
#[derive(Clone)]
pub struct SharedFrame {
    name: String,
    inner: Rc<RefCell<Box<dyn RenderingFrame>>>,
}

impl SharedFrame {
    pub fn new(frame: Box<dyn RenderingFrame>) -> Self {
        Self {
            name: frame.name().to_string(),
            inner: Rc::new(RefCell::new(frame)),
        }
    }
}

impl RenderingFrame for SharedFrame {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> FrameState {
        self.inner.borrow().state()
    }

    fn requested_size(&self) -> Extent {
        self.inner.borrow().requested_size()
    }

    fn begin_page(&mut self, page_number: usize) -> bool {
        self.inner.borrow_mut().begin_page(page_number)
    }

    fn measure(&mut self, extent: Extent) -> Result<Extent, FolioError> {
        self.inner.borrow_mut().measure(extent)
    }

    fn do_layout(&mut self, target: Extent) -> Result<Region, FolioError> {
        self.inner.borrow_mut().do_layout(target)
    }

    fn draw(&mut self, surface: &mut dyn Surface, region: Region) -> Result<(), FolioError> {
        self.inner.borrow_mut().draw(surface, region)
    }
}
