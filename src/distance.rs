use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, Signed, Zero};

use crate::error::FolioError;
use crate::types::Pt;

pub type Measure = Ratio<i64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceUnit {
    Em,
    Ex,
    Pixel,
    Point,
    Pica,
    Centimeter,
    Millimeter,
    Inch,
    Percent,
    FitToSpace,
    Infinite,
    User,
}

impl DistanceUnit {
    pub const ALL: [DistanceUnit; 12] = [
        DistanceUnit::Em,
        DistanceUnit::Ex,
        DistanceUnit::Pixel,
        DistanceUnit::Point,
        DistanceUnit::Pica,
        DistanceUnit::Centimeter,
        DistanceUnit::Millimeter,
        DistanceUnit::Inch,
        DistanceUnit::Percent,
        DistanceUnit::FitToSpace,
        DistanceUnit::Infinite,
        DistanceUnit::User,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            DistanceUnit::Em => "em",
            DistanceUnit::Ex => "ex",
            DistanceUnit::Pixel => "px",
            DistanceUnit::Point => "pt",
            DistanceUnit::Pica => "pc",
            DistanceUnit::Centimeter => "cm",
            DistanceUnit::Millimeter => "mm",
            DistanceUnit::Inch => "in",
            DistanceUnit::Percent => "%",
            DistanceUnit::FitToSpace => "*",
            DistanceUnit::Infinite => "!",
            DistanceUnit::User => "u",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<DistanceUnit> {
        DistanceUnit::ALL
            .into_iter()
            .find(|unit| unit.suffix() == suffix)
    }

    /// Twips (1/1440 inch) per unit. Font- and container-relative units have
    /// no absolute size.
    fn twips(self) -> Option<Measure> {
        match self {
            DistanceUnit::Pixel | DistanceUnit::User => Some(Ratio::from_integer(15)),
            DistanceUnit::Point => Some(Ratio::from_integer(20)),
            DistanceUnit::Pica => Some(Ratio::from_integer(240)),
            DistanceUnit::Inch => Some(Ratio::from_integer(1440)),
            DistanceUnit::Centimeter => Some(Ratio::new(72000, 127)),
            DistanceUnit::Millimeter => Some(Ratio::new(7200, 127)),
            DistanceUnit::FitToSpace => Some(Ratio::from_integer(1)),
            DistanceUnit::Em
            | DistanceUnit::Ex
            | DistanceUnit::Percent
            | DistanceUnit::Infinite => None,
        }
    }

    fn is_symbolic(self) -> bool {
        matches!(self, DistanceUnit::FitToSpace | DistanceUnit::Infinite)
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Distance {
    measure: Measure,
    unit: DistanceUnit,
    at_least: bool,
}

impl Distance {
    pub const ZERO: Distance = Distance {
        measure: Ratio::new_raw(0, 1),
        unit: DistanceUnit::Point,
        at_least: false,
    };

    pub const FIT_TO: Distance = Distance {
        measure: Ratio::new_raw(0, 1),
        unit: DistanceUnit::FitToSpace,
        at_least: false,
    };

    pub const INFINITE: Distance = Distance {
        measure: Ratio::new_raw(0, 1),
        unit: DistanceUnit::Infinite,
        at_least: false,
    };

    pub fn new(measure: impl Into<Measure>, unit: DistanceUnit) -> Self {
        Self {
            measure: measure.into(),
            unit,
            at_least: false,
        }
    }

    pub fn at_least(measure: impl Into<Measure>, unit: DistanceUnit) -> Self {
        Self {
            measure: measure.into(),
            unit,
            at_least: true,
        }
    }

    pub fn pt(measure: impl Into<Measure>) -> Self {
        Self::new(measure, DistanceUnit::Point)
    }

    pub fn inch(measure: impl Into<Measure>) -> Self {
        Self::new(measure, DistanceUnit::Inch)
    }

    pub fn cm(measure: impl Into<Measure>) -> Self {
        Self::new(measure, DistanceUnit::Centimeter)
    }

    pub fn mm(measure: impl Into<Measure>) -> Self {
        Self::new(measure, DistanceUnit::Millimeter)
    }

    pub fn measure(&self) -> Measure {
        self.measure
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    pub fn is_at_least(&self) -> bool {
        self.at_least
    }

    pub fn is_fit_to(&self) -> bool {
        self.unit == DistanceUnit::FitToSpace
    }

    pub fn is_infinite(&self) -> bool {
        self.unit == DistanceUnit::Infinite
    }

    pub fn is_stretchy(&self) -> bool {
        self.at_least || self.is_fit_to()
    }

    /// Zero-valued, including a bare fit-to-space marker.
    pub fn is_zero(&self) -> bool {
        !self.is_infinite() && self.measure.is_zero()
    }

    pub fn with_at_least(self, at_least: bool) -> Self {
        Self { at_least, ..self }
    }

    pub fn to(&self, unit: DistanceUnit) -> Result<Distance, FolioError> {
        if unit == self.unit {
            return Ok(*self);
        }
        let conversion = FolioError::UnitConversion {
            from: self.unit,
            to: unit,
        };
        if unit.is_symbolic() || self.unit.is_symbolic() {
            return Err(conversion);
        }
        let (Some(from), Some(to)) = (self.unit.twips(), unit.twips()) else {
            return Err(conversion);
        };
        let factor = from.checked_div(&to).ok_or(FolioError::Overflow)?;
        Ok(Distance {
            measure: checked(self.measure.checked_mul(&factor))?,
            unit,
            at_least: self.at_least,
        })
    }

    pub fn value_in(&self, unit: DistanceUnit) -> Result<Measure, FolioError> {
        Ok(self.to(unit)?.measure)
    }

    pub fn to_pt(&self) -> Result<Pt, FolioError> {
        if self.is_fit_to() {
            return Ok(Pt::ZERO);
        }
        Ok(Pt::from_ratio(self.value_in(DistanceUnit::Point)?))
    }

    pub fn checked_add(&self, other: &Distance) -> Result<Distance, FolioError> {
        if self.is_infinite() || other.is_infinite() {
            return Ok(Distance::INFINITE);
        }
        if other.is_fit_to() {
            return Ok(self.with_at_least(true));
        }
        if self.is_fit_to() {
            return Ok(other.with_at_least(true));
        }
        let other = other.to(self.unit).map_err(|err| match err {
            FolioError::UnitConversion { .. } => {
                FolioError::IncompatibleUnits(format!("cannot add {other} to {self}"))
            }
            err => err,
        })?;
        Ok(Distance {
            measure: checked(self.measure.checked_add(&other.measure))?,
            unit: self.unit,
            at_least: self.at_least || other.at_least,
        })
    }

    pub fn checked_sub(&self, other: &Distance) -> Result<Distance, FolioError> {
        if other.is_infinite() || other.is_fit_to() {
            return self.checked_add(other);
        }
        let negated = Distance {
            measure: checked(Measure::zero().checked_sub(&other.measure))?,
            ..*other
        };
        self.checked_add(&negated)
    }

    pub fn checked_mul(&self, factor: Measure) -> Result<Distance, FolioError> {
        if self.is_infinite() {
            return Ok(*self);
        }
        Ok(Distance {
            measure: checked(self.measure.checked_mul(&factor))?,
            ..*self
        })
    }

    pub fn checked_div(&self, divisor: i64) -> Result<Distance, FolioError> {
        if divisor == 0 {
            return Err(FolioError::DivisionByZero);
        }
        if self.is_infinite() {
            return Ok(*self);
        }
        Ok(Distance {
            measure: checked(self.measure.checked_div(&Ratio::from_integer(divisor)))?,
            ..*self
        })
    }

    /// Resolve a stretchy distance against a concrete one.
    pub fn fix_to(&self, other: &Distance) -> Result<Distance, FolioError> {
        if other.is_fit_to() {
            return Err(FolioError::FixToFitToSpace(other.to_string()));
        }
        if !self.is_stretchy() {
            return Ok(*self);
        }
        if self.at_least && other < self {
            return Err(FolioError::FixTooSmall {
                bound: self.to_string(),
                value: other.to_string(),
            });
        }
        if self.is_fit_to() {
            return Ok(*other);
        }
        Ok(other.to(self.unit)?.with_at_least(false))
    }

    fn twips_for_division(&self, other: &Distance) -> Result<(Measure, Measure), FolioError> {
        if other.is_zero() {
            return Err(FolioError::DivisionByZero);
        }
        let incompatible =
            || FolioError::IncompatibleUnits(format!("cannot divide {self} by {other}"));
        if self.unit.is_symbolic() || other.unit.is_symbolic() {
            return Err(incompatible());
        }
        if self.unit == other.unit {
            return Ok((self.measure, other.measure));
        }
        match (self.unit.twips(), other.unit.twips()) {
            (Some(mine), Some(yours)) => Ok((
                checked(self.measure.checked_mul(&mine))?,
                checked(other.measure.checked_mul(&yours))?,
            )),
            _ => Err(incompatible()),
        }
    }

    /// Exact ratio `self / other`; zero when `other` is infinite.
    pub fn ratio_to(&self, other: &Distance) -> Result<Measure, FolioError> {
        if other.is_infinite() {
            return Ok(Ratio::zero());
        }
        let (me, you) = self.twips_for_division(other)?;
        checked(me.checked_div(&you))
    }

    pub fn div_floor(&self, other: &Distance) -> Result<Measure, FolioError> {
        Ok(self.ratio_to(other)?.floor())
    }

    /// What is left of `self` after removing whole multiples of `other`.
    pub fn rem(&self, other: &Distance) -> Result<Distance, FolioError> {
        if other.is_infinite() {
            return Ok(Distance::ZERO);
        }
        let (me, you) = self.twips_for_division(other)?;
        let scale = if self.unit == other.unit {
            Ratio::from_integer(1)
        } else {
            self.unit.twips().unwrap_or_else(|| Ratio::from_integer(1))
        };
        let whole = checked(me.checked_div(&you))?.trunc();
        let left = checked(me.checked_sub(&checked(you.checked_mul(&whole))?))?;
        Ok(Distance {
            measure: checked(left.checked_div(&scale))?,
            ..*self
        })
    }

    pub fn abs(&self) -> Distance {
        Distance {
            measure: self.measure.abs(),
            ..*self
        }
    }

    pub fn try_max(&self, other: &Distance) -> Result<Distance, FolioError> {
        match self.partial_cmp(other) {
            Some(Ordering::Less) => Ok(*other),
            Some(_) => Ok(*self),
            None => Err(FolioError::IncompatibleUnits(format!(
                "cannot compare {self} with {other}"
            ))),
        }
    }

    pub fn try_min(&self, other: &Distance) -> Result<Distance, FolioError> {
        match self.partial_cmp(other) {
            Some(Ordering::Greater) => Ok(*other),
            Some(_) => Ok(*self),
            None => Err(FolioError::IncompatibleUnits(format!(
                "cannot compare {self} with {other}"
            ))),
        }
    }

    /// Both measures in twips, or `None` when the units cannot be compared.
    /// Fit-to-space counts one twip per unit.
    fn comparable(&self, other: &Distance) -> Option<(Measure, Measure)> {
        if self.unit == other.unit || self.measure.is_zero() || other.measure.is_zero() {
            return Some((self.measure, other.measure));
        }
        let mine = self.measure.checked_mul(&self.unit.twips()?)?;
        let yours = other.measure.checked_mul(&other.unit.twips()?)?;
        Some((mine, yours))
    }

    pub fn log_str(&self) -> String {
        match self.value_in(DistanceUnit::Inch) {
            Ok(inches) => format!("{:.2}in", ratio_to_f64(inches)),
            Err(_) => self.to_string(),
        }
    }
}

fn checked(value: Option<Measure>) -> Result<Measure, FolioError> {
    value.ok_or(FolioError::Overflow)
}

pub(crate) fn ratio_to_f64(value: Measure) -> f64 {
    *value.numer() as f64 / *value.denom() as f64
}

impl Default for Distance {
    fn default() -> Self {
        Distance::ZERO
    }
}

impl PartialEq for Distance {
    fn eq(&self, other: &Distance) -> bool {
        if self.is_infinite() || other.is_infinite() {
            return self.is_infinite() && other.is_infinite();
        }
        self.comparable(other)
            .map(|(mine, yours)| mine == yours)
            .unwrap_or(false)
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Distance) -> Option<Ordering> {
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => return Some(Ordering::Equal),
            (true, false) => return Some(Ordering::Greater),
            (false, true) => return Some(Ordering::Less),
            (false, false) => {}
        }
        let (mine, yours) = self.comparable(other)?;
        mine.partial_cmp(&yours)
    }
}

/// Only the literal `0` is meaningful: it compares as the zero distance.
impl PartialEq<i64> for Distance {
    fn eq(&self, other: &i64) -> bool {
        *other == 0 && self.is_zero()
    }
}

impl PartialOrd<i64> for Distance {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        if *other != 0 {
            return None;
        }
        if self.is_infinite() {
            return Some(Ordering::Greater);
        }
        self.measure.partial_cmp(&Ratio::zero())
    }
}

impl std::ops::Neg for Distance {
    type Output = Distance;
    fn neg(self) -> Distance {
        if self.is_infinite() {
            return self;
        }
        Distance {
            measure: -self.measure,
            ..self
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.at_least { ">=" } else { "" };
        match self.unit {
            DistanceUnit::FitToSpace | DistanceUnit::Infinite if self.measure.is_zero() => {
                write!(f, "{prefix}{}", self.unit)
            }
            _ => write!(
                f,
                "{prefix}{:.1}{}",
                ratio_to_f64(self.measure),
                self.unit
            ),
        }
    }
}

impl FromStr for Distance {
    type Err = FolioError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        let invalid = || FolioError::ParseDistance(raw.to_string());
        if text.is_empty() {
            return Err(invalid());
        }
        match text {
            "*" => return Ok(Distance::FIT_TO),
            "!" => return Ok(Distance::INFINITE),
            _ => {}
        }
        // "5in*" is a stretchy distance of at least five inches.
        let (text, at_least) = match text.strip_suffix('*') {
            Some(rest) => (rest, true),
            None => (text, false),
        };
        let split = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
            .ok_or_else(invalid)?;
        let (number, suffix) = text.split_at(split);
        let unit = DistanceUnit::from_suffix(suffix).ok_or_else(invalid)?;
        if unit.is_symbolic() {
            return Err(invalid());
        }
        let measure = parse_decimal(number).ok_or_else(invalid)?;
        Ok(Distance {
            measure,
            unit,
            at_least,
        })
    }
}

fn parse_decimal(number: &str) -> Option<Measure> {
    let (negative, digits) = match number.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, number),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) || fraction.len() > 9 {
        return None;
    }
    let scale = 10i64.checked_pow(fraction.len() as u32)?;
    let whole: i64 = whole.parse().ok()?;
    let fraction: i64 = if fraction.is_empty() {
        0
    } else {
        fraction.parse().ok()?
    };
    let numer = whole.checked_mul(scale)?.checked_add(fraction)?;
    let value = Ratio::new(numer, scale);
    Some(if negative { -value } else { value })
}

pub fn distance_list(measures: &[i64], unit: DistanceUnit) -> Vec<Distance> {
    measures
        .iter()
        .map(|measure| Distance::new(*measure, unit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> Distance {
        text.parse().expect("distance")
    }

    #[test]
    fn parses_units_and_markers() {
        assert_eq!(d("5in"), Distance::inch(5));
        assert_eq!(d("12.5pt").measure(), Ratio::new(25, 2));
        assert!(d("*").is_fit_to());
        assert!(d("!").is_infinite());
        let stretchy = d("5in*");
        assert!(stretchy.is_at_least());
        assert_eq!(stretchy.unit(), DistanceUnit::Inch);
        assert!(matches!(
            "5furlongs".parse::<Distance>(),
            Err(FolioError::ParseDistance(_))
        ));
        assert!("".parse::<Distance>().is_err());
        assert!("pt".parse::<Distance>().is_err());
    }

    #[test]
    fn conversions_round_trip_exactly() {
        let concrete = [
            DistanceUnit::Pixel,
            DistanceUnit::Point,
            DistanceUnit::Pica,
            DistanceUnit::Centimeter,
            DistanceUnit::Millimeter,
            DistanceUnit::Inch,
            DistanceUnit::User,
        ];
        let samples = [d("7.3mm"), d("1in"), d("13pt"), d("2.54cm"), d("3px")];
        for sample in samples {
            for first in concrete {
                for second in concrete {
                    let back = sample
                        .to(first)
                        .and_then(|v| v.to(second))
                        .and_then(|v| v.to(sample.unit()))
                        .expect("convertible");
                    assert_eq!(back.measure(), sample.measure());
                    assert_eq!(back.unit(), sample.unit());
                }
            }
        }
    }

    #[test]
    fn inch_is_seventy_two_points() {
        assert_eq!(d("1in").value_in(DistanceUnit::Point).unwrap(), Ratio::from_integer(72));
        assert_eq!(d("2.54cm"), d("1in"));
        assert_eq!(d("1pc"), d("12pt"));
    }

    #[test]
    fn relative_units_do_not_convert() {
        assert!(matches!(
            d("2em").to(DistanceUnit::Point),
            Err(FolioError::UnitConversion { .. })
        ));
        assert!(d("50%").to(DistanceUnit::Inch).is_err());
        assert!(d("1in").to(DistanceUnit::Infinite).is_err());
    }

    #[test]
    fn addition_keeps_left_unit_and_marker_rules() {
        let sum = d("1in").checked_add(&d("36pt")).unwrap();
        assert_eq!(sum.unit(), DistanceUnit::Inch);
        assert_eq!(sum.measure(), Ratio::new(3, 2));

        let stretched = d("3in").checked_add(&Distance::FIT_TO).unwrap();
        assert!(stretched.is_at_least());
        assert_eq!(stretched, d("3in"));

        let from_fit = Distance::FIT_TO.checked_add(&d("4pt")).unwrap();
        assert!(from_fit.is_at_least());
        assert_eq!(from_fit.unit(), DistanceUnit::Point);

        assert!(d("3in").checked_add(&Distance::INFINITE).unwrap().is_infinite());
        assert!(Distance::INFINITE.checked_sub(&d("3in")).unwrap().is_infinite());
        assert!(matches!(
            d("1em").checked_add(&d("1pt")),
            Err(FolioError::IncompatibleUnits(_))
        ));
    }

    #[test]
    fn ordering_handles_infinite_and_zero() {
        assert!(Distance::INFINITE > d("100000in"));
        assert!(d("1pt") < Distance::INFINITE);
        assert_eq!(Distance::INFINITE, Distance::INFINITE);
        assert_ne!(Distance::INFINITE, d("1pt"));
        assert!(d("0mm") == 0i64);
        assert!(d("1mm") > 0i64);
        assert!(d("1pt") < d("1mm"));
        assert_eq!(d("1em").partial_cmp(&d("1pt")), None);
    }

    #[test]
    fn scalar_arithmetic() {
        assert_eq!(d("3pt").checked_mul(Ratio::from_integer(2)).unwrap(), d("6pt"));
        assert_eq!(d("3pt").checked_div(2).unwrap(), Distance::pt(Ratio::new(3, 2)));
        assert_eq!(-d("3pt"), d("-3pt"));
        assert!(
            Distance::INFINITE
                .checked_mul(Ratio::from_integer(3))
                .unwrap()
                .is_infinite()
        );
        assert!(matches!(d("3pt").checked_div(0), Err(FolioError::DivisionByZero)));
    }

    #[test]
    fn huge_measures_report_overflow() {
        let huge = d("9223372036854775807pt");
        let inches = huge.to(DistanceUnit::Inch).unwrap();
        assert_eq!(inches.measure(), Ratio::new(i64::MAX, 72));
        assert!(matches!(huge.to(DistanceUnit::Centimeter), Err(FolioError::Overflow)));
        assert!(matches!(huge.checked_add(&huge), Err(FolioError::Overflow)));
        assert!(matches!(
            huge.checked_mul(Ratio::from_integer(2)),
            Err(FolioError::Overflow)
        ));
        assert!(matches!(huge.ratio_to(&d("1mm")), Err(FolioError::Overflow)));
        assert_eq!(huge.partial_cmp(&d("1cm")), None);
        assert!(huge > d("1pt"));
    }

    #[test]
    fn fit_to_space_compares_in_twips() {
        let hundred_twips = Distance::new(100, DistanceUnit::FitToSpace);
        assert!(hundred_twips < Distance::inch(1));
        assert!(hundred_twips > Distance::pt(4));
        assert_eq!(hundred_twips, Distance::pt(5));
        assert!(Distance::FIT_TO < d("1mm"));
        assert_eq!(Distance::FIT_TO, 0i64);
        assert_eq!(Distance::FIT_TO, d("0em"));
        assert_eq!(hundred_twips.partial_cmp(&d("1em")), None);
    }

    #[test]
    fn fit_to_space_keeps_its_unit() {
        let hundred_twips = Distance::new(100, DistanceUnit::FitToSpace);
        assert!(matches!(
            hundred_twips.to(DistanceUnit::Point),
            Err(FolioError::UnitConversion { .. })
        ));
        assert!(Distance::FIT_TO.to(DistanceUnit::Inch).is_err());
        assert!(Distance::INFINITE.to(DistanceUnit::Point).is_err());
        assert!(hundred_twips.to(DistanceUnit::FitToSpace).unwrap().is_fit_to());
        assert_eq!(Distance::FIT_TO.to_pt().unwrap(), Pt::ZERO);
    }

    #[test]
    fn division_by_distances() {
        assert_eq!(d("1in").ratio_to(&d("18pt")).unwrap(), Ratio::from_integer(4));
        assert_eq!(d("1in").div_floor(&d("20pt")).unwrap(), Ratio::from_integer(3));
        assert_eq!(d("1in").rem(&d("20pt")).unwrap(), d("12pt"));
        assert_eq!(d("1in").ratio_to(&Distance::INFINITE).unwrap(), Ratio::zero());
        assert!(matches!(
            d("1in").ratio_to(&Distance::ZERO),
            Err(FolioError::DivisionByZero)
        ));
        assert!(d("1in").div_floor(&d("2in*")).is_ok());
        assert!(d("1in").div_floor(&d("2em")).is_err());
    }

    #[test]
    fn fix_to_resolves_stretchy_distances() {
        assert_eq!(Distance::FIT_TO.fix_to(&d("3in")).unwrap(), d("3in"));
        let fixed = d("2in*").fix_to(&d("216pt")).unwrap();
        assert_eq!(fixed.unit(), DistanceUnit::Inch);
        assert_eq!(fixed, d("3in"));
        assert!(!fixed.is_at_least());
        assert!(matches!(
            d("2in*").fix_to(&d("1in")),
            Err(FolioError::FixTooSmall { .. })
        ));
        assert!(matches!(
            d("2in").fix_to(&Distance::FIT_TO),
            Err(FolioError::FixToFitToSpace(_))
        ));
        assert_eq!(d("2in").fix_to(&d("5in")).unwrap(), d("2in"));
    }

    #[test]
    fn display_marks_lower_bounds() {
        assert_eq!(d("5in*").to_string(), ">=5.0in");
        assert_eq!(Distance::FIT_TO.to_string(), "*");
        assert_eq!(d("12.3pt").to_string(), "12.3pt");
        assert_eq!(d("1in").log_str(), "1.00in");
    }
}
