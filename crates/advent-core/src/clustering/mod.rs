//! Nearest-pair clustering engine.
//!
//! Points are linked closest pair first. Every unordered pair is visited at
//! most once, in order of `(squared distance, i, j)`, so link distances never
//! decrease within a run and ties resolve by input order. A link between two
//! points already in the same cluster is recorded but changes nothing.

mod forest;
mod point;

use crate::{PuzzleError, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

pub use forest::DisjointForest;
pub use point::{Point3, PointSet, MAX_COORDINATE};

/// Cluster sizes keyed by the representative point index
pub type ClusterSizes = BTreeMap<usize, usize>;

/// Candidate pair. Field order gives the visiting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Pair {
    dist_sq: i128,
    a: usize,
    b: usize,
}

/// One applied link between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEvent {
    /// Index of the first point (lower input index)
    pub a: usize,
    /// Index of the second point
    pub b: usize,
    pub from: Point3,
    pub to: Point3,
    /// Euclidean distance between the two points
    pub distance: f64,
    /// Whether the link joined two different clusters
    pub merged: bool,
}

/// Clustering state for one run over one point set
#[derive(Debug, Clone)]
pub struct Clustering {
    points: PointSet,
    pairs: Vec<Pair>,
    /// Next unvisited pair
    cursor: usize,
    forest: DisjointForest,
    history: Vec<LinkEvent>,
}

impl Clustering {
    /// Start a run with every point in its own cluster
    pub fn new(points: PointSet) -> Self {
        let pts = points.points();
        let mut pairs: Vec<Pair> = (0..pts.len())
            .tuple_combinations()
            .map(|(a, b)| Pair {
                dist_sq: pts[a].distance_squared(&pts[b]),
                a,
                b,
            })
            .collect();
        // Keys are unique, so unstable sorting is deterministic
        pairs.sort_unstable();

        debug!(points = pts.len(), pairs = pairs.len(), "clustering ready");

        let forest = DisjointForest::new(pts.len());
        Self {
            points,
            pairs,
            cursor: 0,
            forest,
            history: Vec::new(),
        }
    }

    /// Parse points and start a run
    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self::new(PointSet::parse(input)?))
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Pairs not yet visited
    pub fn remaining_pairs(&self) -> usize {
        self.pairs.len() - self.cursor
    }

    pub fn cluster_count(&self) -> usize {
        self.forest.set_count()
    }

    /// Every link applied so far, in order
    pub fn history(&self) -> &[LinkEvent] {
        &self.history
    }

    fn apply(&mut self, pair: Pair) -> LinkEvent {
        let merged = self.forest.union(pair.a, pair.b).is_some();
        let event = LinkEvent {
            a: pair.a,
            b: pair.b,
            from: self.points.get(pair.a),
            to: self.points.get(pair.b),
            distance: (pair.dist_sq as f64).sqrt(),
            merged,
        };

        if merged {
            debug!(
                from = %event.from,
                to = %event.to,
                distance = event.distance,
                clusters = self.forest.set_count(),
                "merged clusters"
            );
        } else {
            trace!(from = %event.from, to = %event.to, "already connected");
        }

        self.history.push(event.clone());
        event
    }

    /// Link the next closest pair, whether or not it is already connected.
    pub fn link_next(&mut self) -> Result<LinkEvent> {
        let pair = *self.pairs.get(self.cursor).ok_or(PuzzleError::InsufficientData {
            what: "links",
            requested: 1,
            available: 0,
        })?;
        self.cursor += 1;
        Ok(self.apply(pair))
    }

    /// Merge the closest pair that spans two clusters. Pairs inside a single
    /// cluster are passed over. Returns `None` once everything is one cluster.
    pub fn merge_closest_unlinked(&mut self) -> Option<LinkEvent> {
        if self.forest.set_count() <= 1 {
            return None;
        }

        while let Some(&pair) = self.pairs.get(self.cursor) {
            self.cursor += 1;
            if !self.forest.same_set(pair.a, pair.b) {
                return Some(self.apply(pair));
            }
        }

        None
    }

    /// Apply exactly `links` links (redundant ones included) and report cluster sizes.
    #[tracing::instrument(skip(self), fields(points = self.points.len()))]
    pub fn run_bounded(&mut self, links: usize) -> Result<ClusterSizes> {
        let available = self.remaining_pairs();
        if links > available {
            return Err(PuzzleError::InsufficientData {
                what: "links",
                requested: links,
                available,
            });
        }

        for _ in 0..links {
            self.link_next()?;
        }

        Ok(self.cluster_sizes())
    }

    /// Apply exactly `merges` successful merges and report cluster sizes.
    #[tracing::instrument(skip(self), fields(points = self.points.len()))]
    pub fn run_merges(&mut self, merges: usize) -> Result<ClusterSizes> {
        let available = self.forest.set_count().saturating_sub(1);
        if merges > available {
            return Err(PuzzleError::InsufficientData {
                what: "merges",
                requested: merges,
                available,
            });
        }

        for _ in 0..merges {
            // At least two clusters remain, so a spanning pair always exists
            if self.merge_closest_unlinked().is_none() {
                break;
            }
        }

        Ok(self.cluster_sizes())
    }

    /// Merge until a single cluster remains. Returns the last merge, or `None`
    /// if the points already formed one cluster.
    #[tracing::instrument(skip(self), fields(points = self.points.len()))]
    pub fn run_until_single_cluster(&mut self) -> Option<LinkEvent> {
        let mut last = None;
        while let Some(event) = self.merge_closest_unlinked() {
            last = Some(event);
        }
        last
    }

    pub fn cluster_sizes(&self) -> ClusterSizes {
        self.forest
            .sets()
            .map(|(root, members)| (root, members.len()))
            .collect()
    }

    /// Member indices of every cluster, each sorted, clusters ordered by root
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        self.forest
            .sets()
            .map(|(_, members)| {
                let mut members = members.to_vec();
                members.sort_unstable();
                members
            })
            .collect()
    }

    /// Product of the `n` largest cluster sizes
    pub fn largest_product(&self, n: usize) -> usize {
        let mut sizes: Vec<usize> = self.cluster_sizes().into_values().collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes.iter().take(n).product()
    }
}

/// Connect the `links` closest pairs and multiply the three largest cluster sizes.
#[tracing::instrument(skip(input))]
pub fn largest_circuits_product(input: &str, links: usize) -> Result<usize> {
    let mut clustering = Clustering::parse(input)?;
    clustering.run_bounded(links)?;
    Ok(clustering.largest_product(3))
}

/// Merge until one cluster remains and multiply the x coordinates of the last
/// merged pair. `None` for a single point.
#[tracing::instrument(skip(input))]
pub fn final_link_x_product(input: &str) -> Result<Option<i64>> {
    let mut clustering = Clustering::parse(input)?;
    clustering
        .run_until_single_cluster()
        .map(|event| {
            event.from.x.checked_mul(event.to.x).ok_or(PuzzleError::Overflow {
                what: "x coordinate product",
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const SAMPLE: &str = "162,817,812
57,618,57
906,360,560
592,479,940
352,342,300
466,668,158
542,29,236
431,825,988
739,650,466
52,470,668
216,146,977
819,987,18
117,168,530
805,96,715
346,949,466
970,615,88
941,993,340
862,61,35
984,92,344
425,690,689
";

    fn random_points(seed: u64, count: usize) -> PointSet {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = (0..count)
            .map(|_| {
                Point3::new(
                    rng.gen_range(0..1000),
                    rng.gen_range(0..1000),
                    rng.gen_range(0..1000),
                )
            })
            .collect();
        PointSet::new(points).unwrap()
    }

    fn assert_partition(clustering: &Clustering) {
        let n = clustering.points().len();
        let mut seen = vec![0usize; n];
        for cluster in clustering.clusters() {
            assert!(!cluster.is_empty());
            for idx in cluster {
                seen[idx] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1), "not a partition: {:?}", seen);
    }

    #[test]
    fn test_first_links_follow_example() {
        let mut clustering = Clustering::parse(SAMPLE).unwrap();

        let first = clustering.link_next().unwrap();
        assert_eq!(first.from, Point3::new(162, 817, 812));
        assert_eq!(first.to, Point3::new(425, 690, 689));
        assert!(first.merged);

        let second = clustering.link_next().unwrap();
        assert_eq!(second.from, Point3::new(162, 817, 812));
        assert_eq!(second.to, Point3::new(431, 825, 988));

        let third = clustering.link_next().unwrap();
        assert_eq!(third.from, Point3::new(906, 360, 560));
        assert_eq!(third.to, Point3::new(805, 96, 715));

        // Already in the same circuit
        let fourth = clustering.link_next().unwrap();
        assert_eq!(fourth.from, Point3::new(431, 825, 988));
        assert_eq!(fourth.to, Point3::new(425, 690, 689));
        assert!(!fourth.merged);
        assert_eq!(clustering.cluster_count(), 17);
    }

    #[test]
    fn test_bounded_sample() {
        let mut clustering = Clustering::parse(SAMPLE).unwrap();
        let sizes = clustering.run_bounded(10).unwrap();

        assert_eq!(sizes.len(), 11);
        let mut values: Vec<usize> = sizes.into_values().collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(values, vec![5, 4, 2, 2, 1, 1, 1, 1, 1, 1, 1]);
        assert_eq!(clustering.largest_product(3), 40);
        assert_eq!(largest_circuits_product(SAMPLE, 10), Ok(40));
    }

    #[test]
    fn test_exhaustive_sample() {
        let mut clustering = Clustering::parse(SAMPLE).unwrap();
        let last = clustering.run_until_single_cluster().unwrap();

        assert_eq!(last.from, Point3::new(216, 146, 977));
        assert_eq!(last.to, Point3::new(117, 168, 530));
        assert_eq!(clustering.cluster_count(), 1);
        assert_eq!(final_link_x_product(SAMPLE), Ok(Some(25272)));
    }

    #[test]
    fn test_single_point_needs_no_merge() {
        let mut clustering = Clustering::parse("5,5,5").unwrap();
        assert_eq!(clustering.run_until_single_cluster(), None);
        assert!(clustering.history().is_empty());
        assert_eq!(final_link_x_product("5,5,5"), Ok(None));
    }

    #[test]
    fn test_large_coordinates() {
        // Squared distance is far beyond i64, the product still fits
        let input = "3000000000,0,0\n-3000000000,0,0\n";
        assert_eq!(final_link_x_product(input), Ok(Some(-9_000_000_000_000_000_000)));

        let input = "4000000000,0,0\n-4000000000,0,0\n";
        assert_eq!(
            final_link_x_product(input),
            Err(PuzzleError::Overflow {
                what: "x coordinate product"
            })
        );
        assert_eq!(largest_circuits_product(input, 1), Ok(2));
    }

    #[test]
    fn test_far_points_keep_exact_order() {
        let far = MAX_COORDINATE;
        let input = format!("{far},{far},{far}\n-{far},-{far},-{far}\n{far},{far},{}\n", far - 1);
        let mut clustering = Clustering::parse(&input).unwrap();
        let first = clustering.link_next().unwrap();
        assert_eq!((first.a, first.b), (0, 2));
        assert_eq!(first.distance, 1.0);
    }

    #[test]
    fn test_malformed_line() {
        let err = Clustering::parse("1,2,3\n1,2").unwrap_err();
        assert!(matches!(err, PuzzleError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_too_many_links() {
        let mut clustering = Clustering::parse("0,0,0\n1,0,0\n5,0,0").unwrap();
        let err = clustering.run_bounded(4).unwrap_err();
        assert_eq!(
            err,
            PuzzleError::InsufficientData {
                what: "links",
                requested: 4,
                available: 3,
            }
        );
        // Nothing was applied
        assert_eq!(clustering.cluster_count(), 3);

        assert!(clustering.run_bounded(3).is_ok());
        assert!(clustering.link_next().is_err());
    }

    #[test]
    fn test_single_point_has_no_pairs() {
        let mut clustering = Clustering::parse("0,0,0").unwrap();
        assert!(clustering.run_bounded(1).is_err());
        assert_eq!(clustering.run_bounded(0).unwrap().len(), 1);
    }

    #[test]
    fn test_too_many_merges() {
        let mut clustering = Clustering::parse("0,0,0\n1,0,0\n5,0,0").unwrap();
        assert!(clustering.run_merges(3).is_err());
        assert_eq!(clustering.run_merges(2).unwrap().len(), 1);
    }

    #[test]
    fn test_merges_to_one_cluster() {
        for seed in 0..5 {
            let points = random_points(seed, 40);
            let n = points.len();
            let mut clustering = Clustering::new(points);
            let sizes = clustering.run_merges(n - 1).unwrap();
            assert_eq!(sizes.len(), 1);
            assert_eq!(sizes.values().copied().sum::<usize>(), n);
        }
    }

    #[test]
    fn test_bounded_chain_reaches_one_cluster() {
        // Neighbour gaps are 10..=14, every skip spans at least 21
        let input = "0,0,0\n10,0,0\n21,0,0\n33,0,0\n46,0,0\n60,0,0";
        let mut clustering = Clustering::parse(input).unwrap();
        let sizes = clustering.run_bounded(5).unwrap();
        assert_eq!(sizes.len(), 1);
        assert!(clustering.history().iter().all(|e| e.merged));
    }

    #[test]
    fn test_invariants_hold_every_step() {
        let mut clustering = Clustering::new(random_points(7, 30));
        let mut last_distance = 0.0;
        let mut clusters = clustering.cluster_count();

        while clustering.remaining_pairs() > 0 {
            let event = clustering.link_next().unwrap();
            assert!(event.distance >= last_distance);
            last_distance = event.distance;

            let now = clustering.cluster_count();
            if event.merged {
                assert_eq!(now, clusters - 1);
            } else {
                assert_eq!(now, clusters);
            }
            clusters = now;
            assert_partition(&clustering);
        }
        assert_eq!(clustering.cluster_count(), 1);
    }

    #[test]
    fn test_deterministic() {
        let mut first = Clustering::parse(SAMPLE).unwrap();
        let mut second = Clustering::parse(SAMPLE).unwrap();
        assert_eq!(first.run_bounded(12).unwrap(), second.run_bounded(12).unwrap());
        assert_eq!(first.history(), second.history());
    }

    #[test]
    fn test_ties_break_by_input_order() {
        // 0-1 and 1-2 and 2-3 are all distance 1
        let input = "0,0,0\n1,0,0\n2,0,0\n3,0,0";
        let mut clustering = Clustering::parse(input).unwrap();
        let order: Vec<(usize, usize)> = (0..3)
            .map(|_| {
                let e = clustering.link_next().unwrap();
                (e.a, e.b)
            })
            .collect();
        assert_eq!(order, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_duplicate_points() {
        let mut clustering = Clustering::parse("4,4,4\n4,4,4\n9,9,9").unwrap();
        let first = clustering.merge_closest_unlinked().unwrap();
        assert_eq!(first.distance, 0.0);
        assert_eq!((first.a, first.b), (0, 1));
    }

    #[test]
    fn test_link_event_serializes() {
        let mut clustering = Clustering::parse("0,0,0\n3,4,0").unwrap();
        let event = clustering.link_next().unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["distance"], 5.0);
        assert_eq!(json["merged"], true);
        assert_eq!(json["to"]["y"], 4);
    }
}
