//! Proximity primitives.
//!
//! Objectives are compared by the distance from a query point to a
//! representative point of their region (the center of its bounds). Selection
//! walks candidates in declaration order and only replaces the current best on
//! a strictly smaller distance, so ties always go to the first declared.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use lattice::material::technical_name;

/// How player proximity to an objective is measured for display and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProximityMetric {
    /// Distance of the closest player on an attacking team
    #[default]
    ClosestPlayer,
    /// Distance of the closest block placed by an attacking team
    ClosestBlock,
    /// Distance of the closest kill made by an attacking team
    ClosestKill,
}

impl ProximityMetric {
    /// Canonical technical name (e.g. `CLOSEST_PLAYER`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ClosestPlayer => "CLOSEST_PLAYER",
            Self::ClosestBlock => "CLOSEST_BLOCK",
            Self::ClosestKill => "CLOSEST_KILL",
        }
    }
}

impl fmt::Display for ProximityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised proximity metric name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetric;

impl FromStr for ProximityMetric {
    type Err = UnknownMetric;

    /// Accepts any spelling that normalizes to a technical name, so
    /// `closest-player`, `Closest Player` and `CLOSEST_PLAYER` are equal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match technical_name(s).as_str() {
            "CLOSEST_PLAYER" => Ok(Self::ClosestPlayer),
            "CLOSEST_BLOCK" => Ok(Self::ClosestBlock),
            "CLOSEST_KILL" => Ok(Self::ClosestKill),
            _ => Err(UnknownMetric),
        }
    }
}

/// Euclidean distance, ignoring the vertical axis when `horizontal` is set.
#[must_use]
pub fn distance(a: DVec3, b: DVec3, horizontal: bool) -> f64 {
    if horizontal {
        DVec3::new(a.x, 0.0, a.z).distance(DVec3::new(b.x, 0.0, b.z))
    } else {
        a.distance(b)
    }
}

/// The candidate whose anchor is closest to `point`.
///
/// Candidates without an anchor are skipped. Equal distances keep the earlier
/// candidate.
pub fn closest<'a, T, I, F>(candidates: I, point: DVec3, anchor: F) -> Option<&'a T>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> Option<DVec3>,
    T: 'a,
{
    let mut best: Option<(&'a T, f64)> = None;
    for candidate in candidates {
        let Some(at) = anchor(candidate) else {
            continue;
        };
        let d = at.distance(point);
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((candidate, d));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Index of the candidate closest to `point`, with the same rules as [`closest`].
pub fn closest_index<'a, T, I, F>(candidates: I, point: DVec3, anchor: F) -> Option<usize>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> Option<DVec3>,
    T: 'a,
{
    let indexed: Vec<(usize, &T)> = candidates.into_iter().enumerate().collect();
    closest(indexed.iter(), point, |(_, c)| anchor(*c)).map(|(i, _)| *i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_normalize() {
        assert_eq!("closest-player".parse::<ProximityMetric>(), Ok(ProximityMetric::ClosestPlayer));
        assert_eq!("Closest Block".parse::<ProximityMetric>(), Ok(ProximityMetric::ClosestBlock));
        assert_eq!("CLOSEST_KILL".parse::<ProximityMetric>(), Ok(ProximityMetric::ClosestKill));
        assert_eq!("furthest".parse::<ProximityMetric>(), Err(UnknownMetric));
        assert_eq!(ProximityMetric::default().to_string(), "CLOSEST_PLAYER");
    }

    #[test]
    fn horizontal_distance_ignores_height() {
        let a = DVec3::new(0.0, 0.0, 0.0);
        let b = DVec3::new(3.0, 100.0, 4.0);
        assert!((distance(a, b, true) - 5.0).abs() < 1e-9);
        assert!(distance(a, b, false) > 100.0);
    }

    #[test]
    fn ties_go_to_first_candidate() {
        let anchors = [DVec3::new(-5.0, 0.0, 0.0), DVec3::new(5.0, 0.0, 0.0)];
        for _ in 0..10 {
            let picked = closest(anchors.iter(), DVec3::ZERO, |a| Some(*a));
            assert!(std::ptr::eq(picked.unwrap(), &anchors[0]));
        }
        assert_eq!(closest_index(anchors.iter(), DVec3::ZERO, |a| Some(*a)), Some(0));
        assert_eq!(closest_index(anchors.iter(), DVec3::new(4.0, 0.0, 0.0), |a| Some(*a)), Some(1));
    }

    #[test]
    fn candidates_without_anchor_are_skipped() {
        let anchors = [None, Some(DVec3::splat(50.0))];
        assert_eq!(closest_index(anchors.iter(), DVec3::ZERO, |a| *a), Some(1));
        assert_eq!(closest_index(std::iter::empty::<&Option<DVec3>>(), DVec3::ZERO, |a| *a), None);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn anchors() -> impl Strategy<Value = Vec<DVec3>> {
            prop::collection::vec((-20i32..20, -20i32..20, -20i32..20), 1..12)
                .prop_map(|v| v.into_iter().map(|(x, y, z)| DVec3::new(x.into(), y.into(), z.into())).collect())
        }

        proptest! {
            #[test]
            fn picks_first_of_the_nearest(anchors in anchors(), x in -20i32..20, z in -20i32..20) {
                let point = DVec3::new(x.into(), 0.0, z.into());
                let picked = closest_index(anchors.iter(), point, |a| Some(*a)).unwrap();
                let best = anchors[picked].distance(point);

                prop_assert!(anchors.iter().all(|a| a.distance(point) >= best));
                prop_assert!(anchors[..picked].iter().all(|a| a.distance(point) > best));
            }
        }
    }
}
