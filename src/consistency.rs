//! @ai:module:intent Verify temporal ordering and coverage of a parsed TextGrid
//! @ai:module:layer application
//! @ai:module:public_api check_consistency
//! @ai:module:depends_on textgrid, error
//! @ai:module:stateless true

use crate::error::{ConsistencyError, Violation};
use crate::textgrid::{IntervalTier, PointTier, TextGrid, Tier};

type Found = (Option<usize>, Violation);

/// @ai:intent Walk every tier and report the first invariant violation
/// @ai:post Ok(()) implies intervals tile their tier and points increase within bounds
/// @ai:effects pure
pub fn check_consistency(grid: &TextGrid) -> Result<(), ConsistencyError> {
    let (xmin, xmax) = (grid.xmin(), grid.xmax());
    if xmin > xmax {
        let violation = Violation::Inverted { xmin, xmax };
        tracing::debug!(%violation, "consistency violation in grid bounds");
        return Err(ConsistencyError::grid(violation));
    }

    for (tier_index, tier) in grid.tiers().iter().enumerate() {
        let found = check_tier_bounds(grid, tier).or_else(|| match tier {
            Tier::Interval(t) => check_intervals(t),
            Tier::Point(t) => check_points(t),
        });

        if let Some((item_index, violation)) = found {
            tracing::debug!(tier_index, tier = tier.name(), %violation, "consistency violation");
            return Err(ConsistencyError {
                tier_index: Some(tier_index),
                tier_name: Some(tier.name().to_string()),
                item_index,
                violation,
            });
        }
    }
    Ok(())
}

fn check_tier_bounds(grid: &TextGrid, tier: &Tier) -> Option<Found> {
    let (xmin, xmax) = (tier.xmin(), tier.xmax());
    if xmin > xmax {
        return Some((None, Violation::Inverted { xmin, xmax }));
    }
    for value in [xmin, xmax] {
        if value < grid.xmin() || value > grid.xmax() {
            let violation = Violation::OutOfBounds {
                value,
                xmin: grid.xmin(),
                xmax: grid.xmax(),
            };
            return Some((None, violation));
        }
    }
    None
}

fn check_intervals(tier: &IntervalTier) -> Option<Found> {
    let intervals = tier.intervals();

    let Some(last) = intervals.last() else {
        // nothing covers a non-empty span
        return (tier.xmin() < tier.xmax()).then(|| {
            let violation = Violation::EndMismatch {
                expected: tier.xmax(),
                found: tier.xmin(),
            };
            (None, violation)
        });
    };

    let mut expected_start = tier.xmin();
    for (idx, interval) in intervals.iter().enumerate() {
        let start = interval.xmin();
        if start != expected_start {
            let violation = if idx == 0 {
                Violation::StartMismatch {
                    expected: expected_start,
                    found: start,
                }
            } else if start > expected_start {
                Violation::Gap {
                    expected: expected_start,
                    found: start,
                }
            } else {
                Violation::Overlap {
                    expected: expected_start,
                    found: start,
                }
            };
            return Some((Some(idx), violation));
        }
        if interval.xmin() > interval.xmax() {
            let violation = Violation::Inverted {
                xmin: interval.xmin(),
                xmax: interval.xmax(),
            };
            return Some((Some(idx), violation));
        }
        expected_start = interval.xmax();
    }

    if last.xmax() != tier.xmax() {
        let violation = Violation::EndMismatch {
            expected: tier.xmax(),
            found: last.xmax(),
        };
        return Some((Some(intervals.len() - 1), violation));
    }
    None
}

fn check_points(tier: &PointTier) -> Option<Found> {
    let mut previous: Option<f64> = None;
    for (idx, point) in tier.points().iter().enumerate() {
        let time = point.time();
        if time < tier.xmin() || time > tier.xmax() {
            let violation = Violation::OutOfBounds {
                value: time,
                xmin: tier.xmin(),
                xmax: tier.xmax(),
            };
            return Some((Some(idx), violation));
        }
        if let Some(prev) = previous {
            if time <= prev {
                let violation = Violation::OutOfOrder {
                    previous: prev,
                    found: time,
                };
                return Some((Some(idx), violation));
            }
        }
        previous = Some(time);
    }
    None
}
