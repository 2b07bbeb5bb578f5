//! The climb path: a doubly linked sequence of segments.
//!
//! Links are stored as segment ids inside an id-keyed node table, so every
//! lookup and splice is O(1) and a removed segment leaves no dangling slot
//! behind. The first segment is the start, the last is the summit.

use std::collections::HashMap;

use log::debug;

use crate::error::{ClimbError, ClimbResult};
use crate::trail::{ClimbSegment, SegmentId, Terrain};

/// Direction of travel along the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the summit.
    Ascend,
    /// Towards the start.
    Descend,
}

impl Direction {
    /// Direction implied by a signed step count (zero ascends).
    #[must_use]
    pub const fn from_steps(steps: i64) -> Self {
        if steps < 0 { Self::Descend } else { Self::Ascend }
    }
}

#[derive(Debug, Clone)]
struct Node {
    segment: ClimbSegment,
    prev: Option<SegmentId>,
    next: Option<SegmentId>,
}

/// Ordered, mutable route from start to summit.
#[derive(Debug, Clone)]
pub struct ClimbPath {
    nodes: HashMap<SegmentId, Node>,
    start: SegmentId,
    summit: SegmentId,
    next_id: u32,
}

impl ClimbPath {
    /// Build a path from start to summit in the given order.
    ///
    /// Segments receive ids `0..n` in order.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::InvalidArgument`] if `terrain` is empty.
    pub fn new(terrain: Vec<Terrain>) -> ClimbResult<Self> {
        let mut iter = terrain.into_iter();
        let Some(first) = iter.next() else {
            return Err(ClimbError::InvalidArgument(
                "a climb path needs at least one segment".into(),
            ));
        };

        let start = SegmentId::new(0);
        let mut path = Self {
            nodes: HashMap::new(),
            start,
            summit: start,
            next_id: 1,
        };
        path.nodes.insert(
            start,
            Node {
                segment: ClimbSegment::from_terrain(start, first),
                prev: None,
                next: None,
            },
        );

        for t in iter {
            path.push_summit(t);
        }
        Ok(path)
    }

    fn issue_id(&mut self) -> SegmentId {
        let id = SegmentId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn node(&self, id: SegmentId) -> ClimbResult<&Node> {
        self.nodes.get(&id).ok_or_else(|| ClimbError::not_found(id))
    }

    fn set_next(&mut self, id: SegmentId, next: Option<SegmentId>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.next = next;
        }
    }

    fn set_prev(&mut self, id: SegmentId, prev: Option<SegmentId>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.prev = prev;
        }
    }

    /// Number of segments on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a path keeps at least one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The start segment.
    #[must_use]
    pub const fn start(&self) -> SegmentId {
        self.start
    }

    /// The summit segment.
    #[must_use]
    pub const fn summit(&self) -> SegmentId {
        self.summit
    }

    /// Whether `id` is the start segment.
    #[must_use]
    pub fn is_start(&self, id: SegmentId) -> bool {
        self.start == id
    }

    /// Whether `id` is the summit segment.
    #[must_use]
    pub fn is_summit(&self, id: SegmentId) -> bool {
        self.summit == id
    }

    /// Whether a segment with this id is on the path.
    #[must_use]
    pub fn contains(&self, id: SegmentId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Look up a segment.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `id` is not on the path.
    pub fn get(&self, id: SegmentId) -> ClimbResult<&ClimbSegment> {
        self.node(id).map(|n| &n.segment)
    }

    /// The neighbouring segment in `direction`, or `None` at a terminal.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `id` is not on the path.
    pub fn neighbour(&self, id: SegmentId, direction: Direction) -> ClimbResult<Option<SegmentId>> {
        let node = self.node(id)?;
        Ok(match direction {
            Direction::Ascend => node.next,
            Direction::Descend => node.prev,
        })
    }

    /// The segment after `id`, or `None` at the summit.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `id` is not on the path.
    pub fn next(&self, id: SegmentId) -> ClimbResult<Option<SegmentId>> {
        self.neighbour(id, Direction::Ascend)
    }

    /// The segment before `id`, or `None` at the start.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `id` is not on the path.
    pub fn prev(&self, id: SegmentId) -> ClimbResult<Option<SegmentId>> {
        self.neighbour(id, Direction::Descend)
    }

    /// Splice a new segment in directly after `after`.
    ///
    /// Inserting after the summit makes the new segment the summit.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `after` is not on the path.
    pub fn insert_after(&mut self, after: SegmentId, terrain: Terrain) -> ClimbResult<SegmentId> {
        let next = self.node(after)?.next;
        let id = self.issue_id();
        self.nodes.insert(
            id,
            Node {
                segment: ClimbSegment::from_terrain(id, terrain),
                prev: Some(after),
                next,
            },
        );
        self.set_next(after, Some(id));
        match next {
            Some(n) => self.set_prev(n, Some(id)),
            None => self.summit = id,
        }
        debug!("inserted {id} after {after}");
        Ok(id)
    }

    /// Splice a new segment in directly before `before`.
    ///
    /// Inserting before the start makes the new segment the start.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `before` is not on the path.
    pub fn insert_before(&mut self, before: SegmentId, terrain: Terrain) -> ClimbResult<SegmentId> {
        let prev = self.node(before)?.prev;
        let id = self.issue_id();
        self.nodes.insert(
            id,
            Node {
                segment: ClimbSegment::from_terrain(id, terrain),
                prev,
                next: Some(before),
            },
        );
        self.set_prev(before, Some(id));
        match prev {
            Some(p) => self.set_next(p, Some(id)),
            None => self.start = id,
        }
        debug!("inserted {id} before {before}");
        Ok(id)
    }

    /// Extend the path past the current summit.
    pub fn push_summit(&mut self, terrain: Terrain) -> SegmentId {
        let old = self.summit;
        let id = self.issue_id();
        self.nodes.insert(
            id,
            Node {
                segment: ClimbSegment::from_terrain(id, terrain),
                prev: Some(old),
                next: None,
            },
        );
        self.set_next(old, Some(id));
        self.summit = id;
        id
    }

    /// Replace a segment's terrain in place and return the previous segment.
    ///
    /// The id and the links are kept, so anything referring to `id` still
    /// finds it at the same position.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `id` is not on the path.
    pub fn edit(&mut self, id: SegmentId, terrain: Terrain) -> ClimbResult<ClimbSegment> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| ClimbError::not_found(id))?;
        let old = std::mem::replace(&mut node.segment, ClimbSegment::from_terrain(id, terrain));
        debug!("edited {id}");
        Ok(old)
    }

    /// Unlink and return a segment, re-linking its neighbours.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `id` is not on the path, or
    /// [`ClimbError::InvalidOperation`] if it is the only segment left.
    pub fn remove(&mut self, id: SegmentId) -> ClimbResult<ClimbSegment> {
        if !self.contains(id) {
            return Err(ClimbError::not_found(id));
        }
        if self.len() == 1 {
            return Err(ClimbError::InvalidOperation(format!(
                "cannot remove {id}: it is the only segment on the path"
            )));
        }
        let node = self
            .nodes
            .remove(&id)
            .ok_or_else(|| ClimbError::not_found(id))?;

        match node.prev {
            Some(p) => self.set_next(p, node.next),
            None => {
                if let Some(n) = node.next {
                    self.start = n;
                }
            }
        }
        match node.next {
            Some(n) => self.set_prev(n, node.prev),
            None => {
                if let Some(p) = node.prev {
                    self.summit = p;
                }
            }
        }
        debug!("removed {id}");
        Ok(node.segment)
    }

    /// The segment reached after moving `steps` positions from `from`.
    ///
    /// Positive counts ascend, negative counts descend. Movement clamps at
    /// the start and summit rather than failing.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `from` is not on the path.
    pub fn traverse_from(&self, from: SegmentId, steps: i64) -> ClimbResult<SegmentId> {
        let direction = Direction::from_steps(steps);
        let mut current = from;
        let mut remaining = steps.unsigned_abs();
        while remaining > 0 {
            let Some(n) = self.neighbour(current, direction)? else {
                break;
            };
            current = n;
            remaining -= 1;
        }
        // Zero steps still has to reject an unknown origin.
        self.node(current)?;
        Ok(current)
    }

    /// 0-based position of a segment counted from the start.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `id` is not on the path.
    pub fn position_of(&self, id: SegmentId) -> ClimbResult<usize> {
        self.iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ClimbError::not_found(id))
    }

    /// Positions of every segment, keyed by id.
    #[must_use]
    pub fn positions(&self) -> HashMap<SegmentId, usize> {
        self.iter().enumerate().map(|(i, s)| (s.id, i)).collect()
    }

    /// Iterate segments from start to summit.
    #[must_use]
    pub fn iter(&self) -> Segments<'_> {
        Segments {
            path: self,
            cursor: Some(self.start),
            remaining: self.len(),
        }
    }

    /// Check the link structure.
    ///
    /// Returns a description of every problem found, or an empty list if
    /// the path is a well-formed acyclic chain from start to summit.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        match self.nodes.get(&self.start) {
            Some(node) if node.prev.is_some() => {
                problems.push(format!("start {} has a predecessor", self.start));
            }
            None => problems.push(format!("start {} is missing", self.start)),
            _ => {}
        }
        match self.nodes.get(&self.summit) {
            Some(node) if node.next.is_some() => {
                problems.push(format!("summit {} has a successor", self.summit));
            }
            None => problems.push(format!("summit {} is missing", self.summit)),
            _ => {}
        }

        let mut visited = 0usize;
        let mut prev: Option<SegmentId> = None;
        let mut cursor = Some(self.start);
        while let Some(id) = cursor {
            if visited > self.len() {
                problems.push("cycle detected while walking from the start".into());
                break;
            }
            let Some(node) = self.nodes.get(&id) else {
                problems.push(format!("link to missing {id}"));
                break;
            };
            if node.segment.id != id {
                problems.push(format!("{id} stores segment {}", node.segment.id));
            }
            if node.prev != prev {
                problems.push(format!("{id} has a broken back-link"));
            }
            visited += 1;
            if node.next.is_none() && id != self.summit {
                problems.push(format!("walk ended at {id}, not at the summit"));
            }
            prev = Some(id);
            cursor = node.next;
        }

        if visited != self.len() {
            problems.push(format!(
                "walk visited {visited} segments but the path holds {}",
                self.len()
            ));
        }
        problems
    }
}

impl<'a> IntoIterator for &'a ClimbPath {
    type Item = &'a ClimbSegment;
    type IntoIter = Segments<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a path's segments from start to summit.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    path: &'a ClimbPath,
    cursor: Option<SegmentId>,
    remaining: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a ClimbSegment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.path.nodes.get(&self.cursor?)?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some(&node.segment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
