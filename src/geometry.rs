use std::fmt;

use bitflags::bitflags;

use crate::distance::{Distance, DistanceUnit, Measure};
use crate::error::FolioError;
use crate::types::{Pt, Rect};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AnchorPoint: u8 {
        const N = 1 << 0;
        const E = 1 << 1;
        const S = 1 << 2;
        const W = 1 << 3;
        const NE = Self::N.bits() | Self::E.bits();
        const SE = Self::S.bits() | Self::E.bits();
        const NW = Self::N.bits() | Self::W.bits();
        const SW = Self::S.bits() | Self::W.bits();
    }
}

impl AnchorPoint {
    pub const CENTER: AnchorPoint = AnchorPoint::empty();
}

impl Default for AnchorPoint {
    fn default() -> Self {
        AnchorPoint::CENTER
    }
}

pub trait Contains<T> {
    fn contains(&self, item: &T) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pos {
    pub x: Distance,
    pub y: Distance,
}

impl Pos {
    pub const ZERO: Pos = Pos {
        x: Distance::ZERO,
        y: Distance::ZERO,
    };

    pub fn new(x: Distance, y: Distance) -> Self {
        Self { x, y }
    }

    pub fn pt(x: impl Into<Measure>, y: impl Into<Measure>) -> Self {
        Self::new(Distance::pt(x), Distance::pt(y))
    }

    pub fn checked_add(&self, other: &Pos) -> Result<Pos, FolioError> {
        Ok(Pos {
            x: self.x.checked_add(&other.x)?,
            y: self.y.checked_add(&other.y)?,
        })
    }

    pub fn checked_sub(&self, other: &Pos) -> Result<Pos, FolioError> {
        Ok(Pos {
            x: self.x.checked_sub(&other.x)?,
            y: self.y.checked_sub(&other.y)?,
        })
    }
}

impl std::ops::Neg for Pos {
    type Output = Pos;
    fn neg(self) -> Pos {
        Pos {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: Distance,
    pub height: Distance,
}

impl Extent {
    pub const ZERO: Extent = Extent {
        width: Distance::ZERO,
        height: Distance::ZERO,
    };

    pub const FIT_TO: Extent = Extent {
        width: Distance::FIT_TO,
        height: Distance::FIT_TO,
    };

    pub fn new(width: Distance, height: Distance) -> Self {
        Self { width, height }
    }

    pub fn pt(width: impl Into<Measure>, height: impl Into<Measure>) -> Self {
        Self::new(Distance::pt(width), Distance::pt(height))
    }

    pub fn is_empty(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }

    pub fn checked_add(&self, other: &Extent) -> Result<Extent, FolioError> {
        Ok(Extent {
            width: self.width.checked_add(&other.width)?,
            height: self.height.checked_add(&other.height)?,
        })
    }

    /// Component-wise difference, clamped at zero.
    pub fn checked_sub(&self, other: &Extent) -> Result<Extent, FolioError> {
        let width = clamp_non_negative(self.width.checked_sub(&other.width)?, "width");
        let height = clamp_non_negative(self.height.checked_sub(&other.height)?, "height");
        Ok(Extent { width, height })
    }

    /// Per-axis maximum. A fit-to-space component defers to the other side.
    pub fn union(&self, other: &Extent) -> Result<Extent, FolioError> {
        Ok(Extent {
            width: combine(&self.width, &other.width, Distance::try_max)?,
            height: combine(&self.height, &other.height, Distance::try_max)?,
        })
    }

    /// Per-axis minimum. A fit-to-space component defers to the other side.
    pub fn intersect(&self, other: &Extent) -> Result<Extent, FolioError> {
        Ok(Extent {
            width: combine(&self.width, &other.width, Distance::try_min)?,
            height: combine(&self.height, &other.height, Distance::try_min)?,
        })
    }

    pub fn coalesce(&self, other: &Extent) -> Extent {
        let pick = |mine: &Distance, theirs: &Distance| {
            if mine.is_zero() || mine.is_fit_to() {
                *theirs
            } else {
                *mine
            }
        };
        Extent {
            width: pick(&self.width, &other.width),
            height: pick(&self.height, &other.height),
        }
    }

    /// Position that places this extent inside `outer` according to `anchor`.
    ///
    /// An axis without a pinned edge is centred. The result is negative on
    /// any axis where this extent is larger than `outer`.
    pub fn anchor_at(&self, anchor: AnchorPoint, outer: &Extent) -> Result<Pos, FolioError> {
        let x = place_on_axis(
            &self.width,
            &outer.width,
            anchor.contains(AnchorPoint::W),
            anchor.contains(AnchorPoint::E),
        )?;
        let y = place_on_axis(
            &self.height,
            &outer.height,
            anchor.contains(AnchorPoint::S),
            anchor.contains(AnchorPoint::N),
        )?;
        Ok(Pos { x, y })
    }

    pub fn to(&self, unit: DistanceUnit) -> Result<Extent, FolioError> {
        Ok(Extent {
            width: self.width.to(unit)?,
            height: self.height.to(unit)?,
        })
    }
}

fn place_on_axis(
    inner: &Distance,
    outer: &Distance,
    pin_low: bool,
    pin_high: bool,
) -> Result<Distance, FolioError> {
    if pin_low {
        return Ok(Distance::ZERO);
    }
    let slack = outer.checked_sub(inner)?;
    if pin_high { Ok(slack) } else { slack.checked_div(2) }
}

fn combine(
    mine: &Distance,
    theirs: &Distance,
    pick: fn(&Distance, &Distance) -> Result<Distance, FolioError>,
) -> Result<Distance, FolioError> {
    if mine.is_fit_to() {
        return Ok(*theirs);
    }
    if theirs.is_fit_to() {
        return Ok(*mine);
    }
    pick(mine, theirs)
}

fn clamp_non_negative(value: Distance, axis: &str) -> Distance {
    if value < 0i64 {
        log::warn!("extent {axis} went negative ({value}); clamping to zero");
        return Distance::new(0, value.unit());
    }
    value
}

impl std::ops::Mul<i64> for Extent {
    type Output = Extent;
    fn mul(self, rhs: i64) -> Extent {
        Extent {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

impl std::ops::Div<i64> for Extent {
    type Output = Extent;
    fn div(self, rhs: i64) -> Extent {
        Extent {
            width: self.width / rhs,
            height: self.height / rhs,
        }
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

impl Contains<Extent> for Extent {
    fn contains(&self, item: &Extent) -> bool {
        item.width <= self.width && item.height <= self.height
    }
}

impl Contains<Pos> for Extent {
    fn contains(&self, item: &Pos) -> bool {
        item.x >= 0i64 && item.y >= 0i64 && item.x <= self.width && item.y <= self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stretch {
    pub width: bool,
    pub height: bool,
}

impl Stretch {
    pub fn of(extent: &Extent) -> Self {
        Self {
            width: extent.width.is_stretchy(),
            height: extent.height.is_stretchy(),
        }
    }

    pub fn any(&self) -> bool {
        self.width || self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    pub origin: Pos,
    pub extent: Extent,
}

impl Region {
    pub fn new(origin: Pos, extent: Extent) -> Self {
        Self { origin, extent }
    }

    pub fn at_zero(extent: Extent) -> Self {
        Self::new(Pos::ZERO, extent)
    }

    pub fn offset(&self, delta: &Pos) -> Result<Region, FolioError> {
        Ok(Region {
            origin: self.origin.checked_add(delta)?,
            extent: self.extent,
        })
    }

    pub fn far_corner(&self) -> Result<Pos, FolioError> {
        Ok(Pos {
            x: self.origin.x.checked_add(&self.extent.width)?,
            y: self.origin.y.checked_add(&self.extent.height)?,
        })
    }

    pub fn bounds(&self, unit: DistanceUnit) -> Result<[Measure; 4], FolioError> {
        Ok([
            self.origin.x.value_in(unit)?,
            self.origin.y.value_in(unit)?,
            self.extent.width.value_in(unit)?,
            self.extent.height.value_in(unit)?,
        ])
    }

    pub fn to_rect(&self) -> Result<Rect, FolioError> {
        Ok(Rect {
            x: self.origin.x.to_pt()?,
            y: self.origin.y.to_pt()?,
            width: self.extent.width.to_pt()?,
            height: self.extent.height.to_pt()?,
        })
    }

    pub fn origin_pt(&self) -> Result<(Pt, Pt), FolioError> {
        Ok((self.origin.x.to_pt()?, self.origin.y.to_pt()?))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.extent, self.origin)
    }
}

impl Contains<Pos> for Region {
    fn contains(&self, item: &Pos) -> bool {
        match item.checked_sub(&self.origin) {
            Ok(local) => self.extent.contains(&local),
            Err(_) => false,
        }
    }
}

impl Contains<Extent> for Region {
    fn contains(&self, item: &Extent) -> bool {
        self.extent.contains(item)
    }
}

impl Contains<Region> for Region {
    fn contains(&self, item: &Region) -> bool {
        match item.far_corner() {
            Ok(corner) => self.contains(&item.origin) && self.contains(&corner),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> Distance {
        text.parse().expect("distance")
    }

    #[test]
    fn coalesce_fills_missing_components() {
        let partial = Extent::new(Distance::FIT_TO, d("2in"));
        let merged = partial.coalesce(&Extent::pt(100, 50));
        assert_eq!(merged, Extent::new(d("100pt"), d("2in")));
        assert_eq!(Extent::ZERO.coalesce(&Extent::pt(3, 4)), Extent::pt(3, 4));
    }

    #[test]
    fn anchoring_pins_edges_and_centres() {
        let inner = Extent::pt(20, 10);
        let outer = Extent::pt(100, 50);
        assert_eq!(
            inner.anchor_at(AnchorPoint::SW, &outer).unwrap(),
            Pos::pt(0, 0)
        );
        assert_eq!(
            inner.anchor_at(AnchorPoint::NE, &outer).unwrap(),
            Pos::pt(80, 40)
        );
        assert_eq!(
            inner.anchor_at(AnchorPoint::CENTER, &outer).unwrap(),
            Pos::pt(40, 20)
        );
        assert_eq!(
            inner.anchor_at(AnchorPoint::N, &outer).unwrap(),
            Pos::pt(40, 40)
        );
        let oversized = Extent::pt(120, 10);
        assert_eq!(
            oversized.anchor_at(AnchorPoint::E, &outer).unwrap().x,
            d("-20pt")
        );
    }

    #[test]
    fn union_and_intersect_defer_fit_to_space() {
        let fixed = Extent::pt(100, 200);
        let loose = Extent::new(Distance::FIT_TO, d("1in"));
        assert_eq!(loose.intersect(&fixed).unwrap(), Extent::pt(100, 72));
        assert_eq!(fixed.union(&loose).unwrap(), Extent::pt(100, 200));
        assert!(Extent::new(d("1em"), d("1pt"))
            .union(&Extent::pt(1, 1))
            .is_err());
    }

    #[test]
    fn subtraction_clamps_at_zero() {
        let diff = Extent::pt(10, 10).checked_sub(&Extent::pt(4, 20)).unwrap();
        assert_eq!(diff, Extent::pt(6, 0));
    }

    #[test]
    fn extent_containment_is_reflexive_and_transitive() {
        let a = Extent::pt(10, 10);
        let b = Extent::new(d("1in"), d("1in"));
        let c = Extent::new(d("10cm"), d("10cm"));
        assert!(a.contains(&a));
        assert!(b.contains(&a) && c.contains(&b) && c.contains(&a));
        assert!(!a.contains(&b));
        assert!(!Extent::new(d("1em"), d("1em")).contains(&a));
    }

    #[test]
    fn region_containment() {
        let outer = Region::new(Pos::pt(10, 10), Extent::pt(100, 100));
        assert!(outer.contains(&Pos::pt(10, 10)));
        assert!(outer.contains(&Pos::pt(110, 110)));
        assert!(!outer.contains(&Pos::pt(5, 50)));
        assert!(outer.contains(&Region::new(Pos::pt(20, 20), Extent::pt(50, 50))));
        assert!(!outer.contains(&Region::new(Pos::pt(80, 20), Extent::pt(50, 50))));
        assert!(outer.contains(&Extent::pt(100, 100)));
        assert!(outer.contains(&outer));
    }

    #[test]
    fn region_offset_and_bounds() {
        let local = Region::new(Pos::pt(5, 5), Extent::pt(10, 20));
        let moved = local.offset(&Pos::new(d("1in"), Distance::ZERO)).unwrap();
        assert_eq!(moved.origin, Pos::pt(77, 5));
        let bounds = moved.bounds(DistanceUnit::Point).unwrap();
        assert_eq!(bounds[0], Measure::from_integer(77));
        assert_eq!(bounds[3], Measure::from_integer(20));
        let rect = moved.to_rect().unwrap();
        assert_eq!(rect.width.to_milli_i64(), 10_000);
    }

    #[test]
    fn stretch_flags_follow_components() {
        let stretch = Stretch::of(&Extent::new(Distance::FIT_TO, d("3in*")));
        assert!(stretch.width && stretch.height);
        assert!(!Stretch::of(&Extent::pt(1, 1)).any());
    }
}
