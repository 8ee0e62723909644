//! @ai:module:intent Define the read-only TextGrid data model
//! @ai:module:layer domain
//! @ai:module:public_api TextGrid, Tier, TierKind, IntervalTier, PointTier, Interval, Point
//! @ai:module:stateless true
//!
//! Everything here is built once by the parser and never mutated afterwards.
//! Fields are private; constructors are crate-visible only.

use serde::Serialize;

/// @ai:intent Root annotation object: time bounds plus ordered tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextGrid {
    xmin: f64,
    xmax: f64,
    tiers: Vec<Tier>,
}

/// @ai:intent A named annotation track, interval-based or point-based
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "class")]
pub enum Tier {
    #[serde(rename = "IntervalTier")]
    Interval(IntervalTier),
    #[serde(rename = "TextTier")]
    Point(PointTier),
}

/// Discriminant of [`Tier`], for callers that only need the variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    Interval,
    Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalTier {
    name: String,
    xmin: f64,
    xmax: f64,
    intervals: Vec<Interval>,
}

/// Written as `"TextTier"` in TextGrid files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointTier {
    name: String,
    xmin: f64,
    xmax: f64,
    points: Vec<Point>,
}

/// @ai:intent A labeled time span
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval {
    xmin: f64,
    xmax: f64,
    text: String,
}

/// @ai:intent A labeled instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    time: f64,
    text: String,
}

impl TextGrid {
    pub(crate) fn new(xmin: f64, xmax: f64, tiers: Vec<Tier>) -> Self {
        Self { xmin, xmax, tiers }
    }

    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// @ai:intent Find the first tier with the given name
    /// @ai:effects pure
    pub fn tier_by_name(&self, name: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn into_tiers(self) -> Vec<Tier> {
        self.tiers
    }
}

impl Tier {
    pub fn name(&self) -> &str {
        match self {
            Tier::Interval(t) => &t.name,
            Tier::Point(t) => &t.name,
        }
    }

    pub fn xmin(&self) -> f64 {
        match self {
            Tier::Interval(t) => t.xmin,
            Tier::Point(t) => t.xmin,
        }
    }

    pub fn xmax(&self) -> f64 {
        match self {
            Tier::Interval(t) => t.xmax,
            Tier::Point(t) => t.xmax,
        }
    }

    /// @ai:intent Number of intervals or points in the tier
    /// @ai:effects pure
    pub fn len(&self) -> usize {
        match self {
            Tier::Interval(t) => t.intervals.len(),
            Tier::Point(t) => t.points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> TierKind {
        match self {
            Tier::Interval(_) => TierKind::Interval,
            Tier::Point(_) => TierKind::Point,
        }
    }

    /// Class tag as written in the file.
    pub fn class_name(&self) -> &'static str {
        match self {
            Tier::Interval(_) => "IntervalTier",
            Tier::Point(_) => "TextTier",
        }
    }

    pub fn as_interval_tier(&self) -> Option<&IntervalTier> {
        match self {
            Tier::Interval(t) => Some(t),
            Tier::Point(_) => None,
        }
    }

    pub fn as_point_tier(&self) -> Option<&PointTier> {
        match self {
            Tier::Point(t) => Some(t),
            Tier::Interval(_) => None,
        }
    }
}

impl IntervalTier {
    pub(crate) fn new(name: String, xmin: f64, xmax: f64, intervals: Vec<Interval>) -> Self {
        Self {
            name,
            xmin,
            xmax,
            intervals,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// @ai:intent Find the interval covering a time
    /// @ai:pre intervals are chronological
    /// @ai:post half-open [xmin, xmax), except the tier end maps to the last interval
    /// @ai:effects pure
    pub fn interval_at(&self, time: f64) -> Option<&Interval> {
        let idx = self.intervals.partition_point(|i| i.xmax <= time);
        match self.intervals.get(idx) {
            Some(interval) if interval.xmin <= time => Some(interval),
            Some(_) => None,
            None => self
                .intervals
                .last()
                .filter(|last| last.xmax == time && last.xmin <= time),
        }
    }
}

impl PointTier {
    pub(crate) fn new(name: String, xmin: f64, xmax: f64, points: Vec<Point>) -> Self {
        Self {
            name,
            xmin,
            xmax,
            points,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Interval {
    pub(crate) fn new(xmin: f64, xmax: f64, text: String) -> Self {
        Self { xmin, xmax, text }
    }

    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn duration(&self) -> f64 {
        self.xmax - self.xmin
    }
}

impl Point {
    pub(crate) fn new(time: f64, text: String) -> Self {
        Self { time, text }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
