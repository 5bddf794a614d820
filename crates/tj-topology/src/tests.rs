//! Unit tests for tj-topology.

use tj_core::{GridPosition, Heading};

use crate::{JunctionTopology, JunctionTopologyBuilder, LaneLine};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(row: i32, col: i32) -> GridPosition {
    GridPosition::new(row, col)
}

/// The standard 14×14 layout written out by hand.
fn hand_built() -> JunctionTopologyBuilder {
    JunctionTopologyBuilder::new()
        .approach(p(5, 6), Heading::South, 0)
        .approach(p(7, 5), Heading::East,  1)
        .approach(p(8, 7), Heading::North, 2)
        .approach(p(6, 8), Heading::West,  3)
        .interior(p(6, 6), 0)
        .interior(p(7, 6), 1)
        .interior(p(7, 7), 2)
        .interior(p(6, 7), 3)
}

// ── Classification ────────────────────────────────────────────────────────────

#[cfg(test)]
mod classify {
    use tj_core::Axis;

    use super::*;
    use crate::Classification;

    #[test]
    fn standard_14_matches_hand_built_cells() {
        let std14 = JunctionTopology::standard(14).unwrap();
        let hand = hand_built().build().unwrap();
        assert_eq!(std14.approaches(), hand.approaches());
        assert_eq!(std14.interiors(), hand.interiors());
    }

    #[test]
    fn approach_cells() {
        let t = JunctionTopology::standard(14).unwrap();
        let a = t.approach_at(p(7, 5)).expect("west-side approach");
        assert_eq!(a.cyclic_index, 1);
        assert_eq!(a.heading, Heading::East);
        assert_eq!(a.axis(), Axis::Horizontal);
        assert_eq!(t.approach(0).axis(), Axis::Vertical);
    }

    #[test]
    fn interior_cells() {
        let t = JunctionTopology::standard(14).unwrap();
        for pos in [p(6, 6), p(7, 6), p(7, 7), p(6, 7)] {
            assert!(t.is_interior(pos), "{pos} should be interior");
        }
        assert!(matches!(
            t.classify(p(7, 7)),
            Classification::Interior(i) if i.cyclic_index == 2
        ));
    }

    #[test]
    fn ordinary_cells_are_other() {
        let t = JunctionTopology::standard(14).unwrap();
        assert_eq!(t.classify(p(0, 6)), Classification::Other);
        assert_eq!(t.classify(p(-3, 40)), Classification::Other);
    }

    #[test]
    fn cyclic_neighbor_right_wraps() {
        assert_eq!(JunctionTopology::cyclic_neighbor_right(0), 1);
        assert_eq!(JunctionTopology::cyclic_neighbor_right(3), 0);
    }

    #[test]
    fn axis_of_direction() {
        assert_eq!(JunctionTopology::axis_of(Heading::North), Axis::Vertical);
        assert_eq!(JunctionTopology::axis_of(Heading::West), Axis::Horizontal);
    }

    #[test]
    fn every_approach_leads_into_interior() {
        let t = JunctionTopology::standard(20).unwrap();
        for a in t.approaches() {
            assert!(t.is_interior(a.position.step(a.heading)));
        }
    }
}

// ── Lanes ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lanes {
    use super::*;

    #[test]
    fn lane_heading_on_ordinary_cells() {
        let t = JunctionTopology::standard(14).unwrap();
        assert_eq!(t.lane_heading(p(0, 6)), Some(Heading::South));
        assert_eq!(t.lane_heading(p(13, 7)), Some(Heading::North));
        assert_eq!(t.lane_heading(p(7, 0)), Some(Heading::East));
        assert_eq!(t.lane_heading(p(6, 13)), Some(Heading::West));
    }

    #[test]
    fn crossing_cells_have_no_single_lane_heading() {
        let t = JunctionTopology::standard(14).unwrap();
        assert_eq!(t.lane_heading(p(6, 6)), None);
        assert_eq!(t.lane_heading(p(2, 2)), None);
    }

    #[test]
    fn approach_heading_agrees_with_lane() {
        let t = JunctionTopology::standard(14).unwrap();
        for a in t.approaches() {
            assert_eq!(t.lane_heading(a.position), Some(a.heading));
        }
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod validation {
    use super::*;
    use crate::TopologyError;

    #[test]
    fn missing_interior_rejected() {
        let err = JunctionTopologyBuilder::new()
            .approach(p(5, 6), Heading::South, 0)
            .build()
            .unwrap_err();
        assert!(matches!(err, TopologyError::WrongCount { .. }));
    }

    #[test]
    fn duplicate_index_rejected() {
        let err = JunctionTopologyBuilder::new()
            .approach(p(5, 6), Heading::South, 0)
            .approach(p(7, 5), Heading::East,  0)
            .approach(p(8, 7), Heading::North, 2)
            .approach(p(6, 8), Heading::West,  3)
            .interior(p(6, 6), 0)
            .interior(p(7, 6), 1)
            .interior(p(7, 7), 2)
            .interior(p(6, 7), 3)
            .build()
            .unwrap_err();
        assert!(matches!(err, TopologyError::BadIndex { kind: "approach", index: 0 }));
    }

    #[test]
    fn overlapping_cells_rejected() {
        let err = JunctionTopologyBuilder::new()
            .approach(p(6, 6), Heading::South, 0)
            .approach(p(7, 5), Heading::East,  1)
            .approach(p(8, 7), Heading::North, 2)
            .approach(p(6, 8), Heading::West,  3)
            .interior(p(6, 6), 0)
            .interior(p(7, 6), 1)
            .interior(p(7, 7), 2)
            .interior(p(6, 7), 3)
            .build()
            .unwrap_err();
        assert!(matches!(err, TopologyError::Overlap(pos) if pos == p(6, 6)));
    }

    #[test]
    fn heading_must_match_cyclic_index() {
        let err = JunctionTopologyBuilder::new()
            .approach(p(5, 6), Heading::East,  0)
            .approach(p(7, 5), Heading::South, 1)
            .approach(p(8, 7), Heading::North, 2)
            .approach(p(6, 8), Heading::West,  3)
            .interior(p(6, 6), 0)
            .interior(p(7, 6), 1)
            .interior(p(7, 7), 2)
            .interior(p(6, 7), 3)
            .build()
            .unwrap_err();
        assert!(matches!(err, TopologyError::HeadingMismatch { index: 0, .. }));
    }

    #[test]
    fn detached_approach_rejected() {
        let err = JunctionTopologyBuilder::new()
            .approach(p(4, 6), Heading::South, 0)
            .approach(p(7, 5), Heading::East,  1)
            .approach(p(8, 7), Heading::North, 2)
            .approach(p(6, 8), Heading::West,  3)
            .interior(p(6, 6), 0)
            .interior(p(7, 6), 1)
            .interior(p(7, 7), 2)
            .interior(p(6, 7), 3)
            .build()
            .unwrap_err();
        assert!(matches!(err, TopologyError::DetachedApproach(pos) if pos == p(4, 6)));
    }

    #[test]
    fn scattered_interior_rejected() {
        let err = hand_built_with_interior([p(6, 6), p(7, 6), p(7, 7), p(9, 9)])
            .build()
            .unwrap_err();
        assert!(matches!(err, TopologyError::ScatteredInterior));
    }

    #[test]
    fn conflicting_lane_rejected() {
        let err = hand_built()
            .lane(LaneLine::Col(6), Heading::South)
            .lane(LaneLine::Col(6), Heading::North)
            .build()
            .unwrap_err();
        assert!(matches!(err, TopologyError::ConflictingLane { .. }));
    }

    #[test]
    fn grid_too_small_is_out_of_bounds() {
        let err = JunctionTopology::standard(3).unwrap_err();
        assert!(matches!(err, TopologyError::OutOfBounds { grid_size: 3, .. }));
    }

    fn hand_built_with_interior(cells: [GridPosition; 4]) -> JunctionTopologyBuilder {
        let mut b = JunctionTopologyBuilder::new()
            .approach(p(5, 6), Heading::South, 0)
            .approach(p(7, 5), Heading::East,  1)
            .approach(p(8, 7), Heading::North, 2)
            .approach(p(6, 8), Heading::West,  3);
        for (i, cell) in cells.into_iter().enumerate() {
            b = b.interior(cell, i);
        }
        b
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn standard_layout_is_consistent(grid_size in 6usize..80) {
            let t = JunctionTopology::standard(grid_size).unwrap();
            prop_assert!(t.check_bounds(grid_size).is_ok());
            for (i, a) in t.approaches().iter().enumerate() {
                prop_assert_eq!(a.cyclic_index, i);
                prop_assert!(t.is_interior(a.position.step(a.heading)));
                prop_assert_eq!(t.lane_heading(a.position), Some(a.heading));
            }
        }
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "serde"))]
mod serde_derives {
    use super::*;
    use crate::{ApproachCell, Lane};

    #[test]
    fn approach_cell_reads_back_from_toml() {
        let cell = JunctionTopology::standard(14).unwrap().approach(2);
        let text = toml::to_string(&cell).unwrap();
        let back: ApproachCell = toml::from_str(&text).unwrap();
        assert_eq!(back, cell);
    }

    #[test]
    fn lane_reads_back_from_toml() {
        let lane = Lane::new(LaneLine::Col(6), Heading::South);
        let back: Lane = toml::from_str(&toml::to_string(&lane).unwrap()).unwrap();
        assert_eq!(back, lane);
    }
}
