//! Junction topology table and builder.
//!
//! # Data layout
//!
//! The eight junction cells live in two fixed-size arrays indexed by cyclic
//! index, plus a `GridPosition → Classification` table for O(1) lookup.
//! Lanes are a short `Vec` scanned linearly (four entries in the standard
//! layout).

use std::collections::HashMap;

use tj_core::{Axis, GridPosition, Heading};

use crate::{Lane, LaneLine, TopologyError, TopologyResult};

// ── Cells ─────────────────────────────────────────────────────────────────────

/// The cell immediately before the junction on one inbound lane.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApproachCell {
    pub position:     GridPosition,
    /// Travel heading of vehicles waiting here.
    pub heading:      Heading,
    /// Position 0–3 in the counter-clockwise right-of-way cycle.
    pub cyclic_index: usize,
}

impl ApproachCell {
    #[inline]
    pub fn axis(&self) -> Axis {
        self.heading.axis()
    }
}

/// One of the four cells forming the junction itself.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteriorCell {
    pub position:     GridPosition,
    pub cyclic_index: usize,
}

/// Result of [`JunctionTopology::classify`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Classification {
    Approach(ApproachCell),
    Interior(InteriorCell),
    /// Ordinary road (or off-road) cell.
    Other,
}

impl Classification {
    #[inline]
    pub fn is_interior(&self) -> bool {
        matches!(self, Classification::Interior(_))
    }

    #[inline]
    pub fn approach(&self) -> Option<&ApproachCell> {
        match self {
            Classification::Approach(a) => Some(a),
            _ => None,
        }
    }
}

// ── JunctionTopology ──────────────────────────────────────────────────────────

/// Immutable, validated description of the junction.
///
/// Construct with [`JunctionTopology::standard`] or
/// [`JunctionTopologyBuilder`]; both refuse inconsistent tables.
#[derive(Clone, Debug)]
pub struct JunctionTopology {
    approaches: [ApproachCell; 4],
    interiors:  [InteriorCell; 4],
    lanes:      Vec<Lane>,
    table:      HashMap<GridPosition, Classification>,
}

impl JunctionTopology {
    /// The two-lane crossing centred on a `grid_size × grid_size` grid.
    ///
    /// With `c = grid_size / 2 - 1` the interior is the block
    /// `(c..=c+1, c..=c+1)`; southbound traffic uses column `c`, northbound
    /// column `c+1`, eastbound row `c+1` and westbound row `c`.
    pub fn standard(grid_size: usize) -> TopologyResult<JunctionTopology> {
        let c = (grid_size / 2) as i32 - 1;
        let p = GridPosition::new;

        let topology = JunctionTopologyBuilder::new()
            .approach(p(c - 1, c),     Heading::South, 0)
            .approach(p(c + 1, c - 1), Heading::East,  1)
            .approach(p(c + 2, c + 1), Heading::North, 2)
            .approach(p(c, c + 2),     Heading::West,  3)
            .interior(p(c, c),         0)
            .interior(p(c + 1, c),     1)
            .interior(p(c + 1, c + 1), 2)
            .interior(p(c, c + 1),     3)
            .lane(LaneLine::Col(c),     Heading::South)
            .lane(LaneLine::Row(c + 1), Heading::East)
            .lane(LaneLine::Col(c + 1), Heading::North)
            .lane(LaneLine::Row(c),     Heading::West)
            .build()?;

        topology.check_bounds(grid_size)?;
        Ok(topology)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Classify a cell.  Cells not in the table are [`Classification::Other`].
    #[inline]
    pub fn classify(&self, position: GridPosition) -> Classification {
        self.table.get(&position).copied().unwrap_or(Classification::Other)
    }

    #[inline]
    pub fn is_interior(&self, position: GridPosition) -> bool {
        self.classify(position).is_interior()
    }

    #[inline]
    pub fn approach_at(&self, position: GridPosition) -> Option<ApproachCell> {
        self.classify(position).approach().copied()
    }

    /// Index of the approach whose vehicle has right of way over approach
    /// `index` under the static "car on the right" rule.
    #[inline]
    pub fn cyclic_neighbor_right(index: usize) -> usize {
        (index + 1) % 4
    }

    /// Axis a direction of travel belongs to.
    #[inline]
    pub fn axis_of(heading: Heading) -> Axis {
        heading.axis()
    }

    /// Lane heading at an ordinary road cell.
    ///
    /// `None` for cells on no lane, and for interior cells (which sit on two
    /// lanes and whose heading depends on the vehicle's turn).
    pub fn lane_heading(&self, position: GridPosition) -> Option<Heading> {
        let mut on = self.lanes.iter().filter(|l| l.line.contains(position));
        match (on.next(), on.next()) {
            (Some(lane), None) => Some(lane.heading),
            _ => None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn approaches(&self) -> &[ApproachCell; 4] {
        &self.approaches
    }

    pub fn approach(&self, cyclic_index: usize) -> ApproachCell {
        self.approaches[cyclic_index % 4]
    }

    pub fn interiors(&self) -> &[InteriorCell; 4] {
        &self.interiors
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Every junction cell must lie on a `grid_size × grid_size` grid.
    pub fn check_bounds(&self, grid_size: usize) -> TopologyResult<()> {
        for &position in self.table.keys() {
            if !position.in_bounds(grid_size) {
                return Err(TopologyError::OutOfBounds { position, grid_size });
            }
        }
        Ok(())
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Accumulates junction cells and lanes, then validates them in
/// [`build`](Self::build).
#[derive(Default)]
pub struct JunctionTopologyBuilder {
    approaches: Vec<ApproachCell>,
    interiors:  Vec<InteriorCell>,
    lanes:      Vec<Lane>,
}

impl JunctionTopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn approach(mut self, position: GridPosition, heading: Heading, cyclic_index: usize) -> Self {
        self.approaches.push(ApproachCell { position, heading, cyclic_index });
        self
    }

    pub fn interior(mut self, position: GridPosition, cyclic_index: usize) -> Self {
        self.interiors.push(InteriorCell { position, cyclic_index });
        self
    }

    pub fn lane(mut self, line: LaneLine, heading: Heading) -> Self {
        self.lanes.push(Lane::new(line, heading));
        self
    }

    /// Validate and freeze the table.
    ///
    /// # Errors
    ///
    /// - not exactly four approach / interior cells;
    /// - cyclic indices duplicated or outside `0..4`;
    /// - any cell declared twice (including approach/interior overlap);
    /// - approach `i` not travelling cyclic heading `i`;
    /// - an approach whose next cell is not interior;
    /// - interior cells not forming a 2×2 block;
    /// - a lane line declared with two headings.
    pub fn build(self) -> TopologyResult<JunctionTopology> {
        let approaches = order_by_index(self.approaches, "approach", |a| a.cyclic_index)?;
        let interiors  = order_by_index(self.interiors, "interior", |i| i.cyclic_index)?;

        let mut table = HashMap::with_capacity(8);
        for a in &approaches {
            if table.insert(a.position, Classification::Approach(*a)).is_some() {
                return Err(TopologyError::Overlap(a.position));
            }
        }
        for i in &interiors {
            if table.insert(i.position, Classification::Interior(*i)).is_some() {
                return Err(TopologyError::Overlap(i.position));
            }
        }

        let rows: Vec<i32> = interiors.iter().map(|i| i.position.row).collect();
        let cols: Vec<i32> = interiors.iter().map(|i| i.position.col).collect();
        let (r0, c0) = (rows.iter().min().copied().unwrap_or(0), cols.iter().min().copied().unwrap_or(0));
        if interiors
            .iter()
            .any(|i| i.position.row - r0 > 1 || i.position.col - c0 > 1)
        {
            return Err(TopologyError::ScatteredInterior);
        }

        for a in &approaches {
            if a.heading.ccw_index() != a.cyclic_index {
                return Err(TopologyError::HeadingMismatch { index: a.cyclic_index, heading: a.heading });
            }
            if !matches!(table.get(&a.position.step(a.heading)), Some(Classification::Interior(_))) {
                return Err(TopologyError::DetachedApproach(a.position));
            }
        }

        for (n, lane) in self.lanes.iter().enumerate() {
            if self.lanes[..n].iter().any(|l| l.line == lane.line && l.heading != lane.heading) {
                return Err(TopologyError::ConflictingLane { line: lane.line.to_string() });
            }
        }

        Ok(JunctionTopology { approaches, interiors, lanes: self.lanes, table })
    }
}

/// Place four cells into an array by their cyclic index, rejecting
/// duplicates, gaps, and wrong counts.
fn order_by_index<T: Copy>(
    cells: Vec<T>,
    kind:  &'static str,
    index: impl Fn(&T) -> usize,
) -> TopologyResult<[T; 4]> {
    if cells.len() != 4 {
        return Err(TopologyError::WrongCount { kind, got: cells.len() });
    }
    let mut slots: [Option<T>; 4] = [None; 4];
    for cell in cells {
        let i = index(&cell);
        match slots.get_mut(i) {
            Some(slot @ None) => *slot = Some(cell),
            _ => return Err(TopologyError::BadIndex { kind, index: i }),
        }
    }
    // All four slots are filled: four cells, four distinct in-range indices.
    let [a, b, c, d] = slots;
    match (a, b, c, d) {
        (Some(a), Some(b), Some(c), Some(d)) => Ok([a, b, c, d]),
        _ => Err(TopologyError::WrongCount { kind, got: 4 }),
    }
}
