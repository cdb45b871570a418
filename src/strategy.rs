use std::str::FromStr;

use crate::distance::Distance;
use crate::error::FolioError;
use crate::geometry::{Extent, Pos, Region};

/// Indices of children whose requested size stretches on each axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FitIndices {
    pub width: Vec<usize>,
    pub height: Vec<usize>,
}

impl FitIndices {
    pub fn is_empty(&self) -> bool {
        self.width.is_empty() && self.height.is_empty()
    }
}

/// Stateless placement policy. Strategies own no children; they see only
/// child extents.
pub trait LayoutStrategy {
    /// Aggregate extent needed for `extents`.
    fn measure(&self, extents: &[Extent], fit: &FitIndices) -> Result<Extent, FolioError>;

    /// Consumed extent plus one region per entry of `extents`, in order.
    fn layout(
        &self,
        target: Extent,
        extents: &[Extent],
        fit: &FitIndices,
    ) -> Result<(Extent, Vec<Region>), FolioError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackDirection {
    Horizontal,
    #[default]
    Vertical,
}

impl FromStr for StackDirection {
    type Err = FolioError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(StackDirection::Horizontal),
            "vertical" => Ok(StackDirection::Vertical),
            _ => Err(FolioError::UnknownDirection(value.to_string())),
        }
    }
}

/// Lines children up one after another along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackLayoutStrategy {
    direction: StackDirection,
}

impl StackLayoutStrategy {
    pub fn new(direction: StackDirection) -> Self {
        Self { direction }
    }

    pub fn horizontal() -> Self {
        Self::new(StackDirection::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(StackDirection::Vertical)
    }

    pub fn direction(&self) -> StackDirection {
        self.direction
    }

    /// `(stack, cross)` components of `extent`.
    fn split(&self, extent: &Extent) -> (Distance, Distance) {
        match self.direction {
            StackDirection::Horizontal => (extent.width, extent.height),
            StackDirection::Vertical => (extent.height, extent.width),
        }
    }

    fn make_extent(&self, stack: Distance, cross: Distance) -> Extent {
        match self.direction {
            StackDirection::Horizontal => Extent::new(stack, cross),
            StackDirection::Vertical => Extent::new(cross, stack),
        }
    }

    fn make_pos(&self, stack: Distance, cross: Distance) -> Pos {
        match self.direction {
            StackDirection::Horizontal => Pos::new(stack, cross),
            StackDirection::Vertical => Pos::new(cross, stack),
        }
    }

    fn stack_fit<'a>(&self, fit: &'a FitIndices) -> &'a [usize] {
        match self.direction {
            StackDirection::Horizontal => &fit.width,
            StackDirection::Vertical => &fit.height,
        }
    }
}

impl LayoutStrategy for StackLayoutStrategy {
    fn measure(&self, extents: &[Extent], _fit: &FitIndices) -> Result<Extent, FolioError> {
        let mut stack = Distance::ZERO;
        let mut cross = Distance::ZERO;
        for extent in extents {
            let (along, across) = self.split(extent);
            stack = stack.checked_add(&along)?;
            cross = cross.try_max(&across)?;
        }
        Ok(self.make_extent(stack, cross))
    }

    fn layout(
        &self,
        target: Extent,
        extents: &[Extent],
        fit: &FitIndices,
    ) -> Result<(Extent, Vec<Region>), FolioError> {
        let minimum = self.measure(extents, fit)?;
        let (min_stack, min_cross) = self.split(&minimum);
        let (target_stack, target_cross) = self.split(&target);
        // Every child spans the full cross axis, and so does the stack.
        let cross = if target_cross.is_fit_to() || target_cross.is_infinite() {
            min_cross
        } else {
            target_cross
        };
        let flagged = self.stack_fit(fit);

        let slop = if target_stack > min_stack && !flagged.is_empty() {
            Some(target_stack.checked_sub(&min_stack)?.checked_div(flagged.len() as i64)?)
        } else {
            None
        };

        let mut offset = Distance::ZERO;
        let mut regions = Vec::with_capacity(extents.len());
        for (index, extent) in extents.iter().enumerate() {
            let (mut along, _) = self.split(extent);
            if let Some(slop) = slop.filter(|_| flagged.contains(&index)) {
                along = along.checked_add(&slop)?;
            }
            if along.is_fit_to() {
                along = Distance::ZERO;
            }
            let along = along.with_at_least(false);
            regions.push(Region::new(
                self.make_pos(offset, Distance::ZERO),
                self.make_extent(along, cross),
            ));
            offset = offset.checked_add(&along)?;
        }
        log::debug!(
            "stack layout: {} children, {} of {} consumed",
            regions.len(),
            offset.log_str(),
            target_stack.log_str()
        );
        Ok((self.make_extent(offset, cross), regions))
    }
}
