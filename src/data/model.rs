use std::fmt;

// ---------------------------------------------------------------------------
// Position – one coordinate row
// ---------------------------------------------------------------------------

/// A planar location. Extra coordinates in the source row (z) are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Node / NodeSet – one input file
// ---------------------------------------------------------------------------

/// Which of the two input files a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Enb,
    Ue,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Enb => write!(f, "eNB"),
            NodeKind::Ue => write!(f, "UE"),
        }
    }
}

/// A single record of an input file.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Field 3 with its quotes removed (cell id or IMSI in ns-3 output).
    pub label: Option<String>,
    pub position: Position,
}

/// All nodes of one kind, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSet {
    pub kind: NodeKind,
    pub nodes: Vec<Node>,
}

impl NodeSet {
    pub fn new(kind: NodeKind, nodes: Vec<Node>) -> Self {
        Self { kind, nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.nodes.iter().map(|n| n.position)
    }
}

// ---------------------------------------------------------------------------
// Building – obstacle rectangle from the ns-3 building script
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Building {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Building {
    /// Build from two opposite corners in any order.
    pub fn from_corners(a: Position, b: Position) -> Self {
        Self {
            x_min: a.x.min(b.x),
            y_min: a.y.min(b.y),
            x_max: a.x.max(b.x),
            y_max: a.y.max(b.y),
        }
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Axis-aligned box in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    fn around(p: Position) -> Self {
        Self {
            x_min: p.x,
            x_max: p.x,
            y_min: p.y,
            y_max: p.y,
        }
    }

    fn include(&mut self, p: Position) {
        self.x_min = self.x_min.min(p.x);
        self.x_max = self.x_max.max(p.x);
        self.y_min = self.y_min.min(p.y);
        self.y_max = self.y_max.max(p.y);
    }

    /// Grow each side by `fraction` of the span. A degenerate span is
    /// widened by one unit on each side instead.
    ///
    /// Returns `None` when the result is not a finite, non-empty range, e.g.
    /// when the span overflows or the unit padding vanishes at huge magnitudes.
    pub fn padded(&self, fraction: f64) -> Option<Self> {
        fn pad(lo: f64, hi: f64, fraction: f64) -> (f64, f64) {
            let span = hi - lo;
            if span.abs() < f64::EPSILON {
                (lo - 1.0, hi + 1.0)
            } else {
                (lo - span * fraction, hi + span * fraction)
            }
        }
        let drawable = |lo: f64, hi: f64| lo.is_finite() && hi.is_finite() && lo < hi;

        let (x_min, x_max) = pad(self.x_min, self.x_max, fraction);
        let (y_min, y_max) = pad(self.y_min, self.y_max, fraction);
        if !(drawable(x_min, x_max) && drawable(y_min, y_max)) {
            return None;
        }
        Some(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

// ---------------------------------------------------------------------------
// Topology – everything that ends up on one figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Topology {
    pub enbs: NodeSet,
    pub ues: NodeSet,
    pub buildings: Vec<Building>,
}

impl Topology {
    /// Box covering every node and building, `None` when there is nothing to draw.
    pub fn bounds(&self) -> Option<Bounds> {
        let corners = self.buildings.iter().flat_map(|b| {
            [
                Position::new(b.x_min, b.y_min),
                Position::new(b.x_max, b.y_max),
            ]
        });
        let mut points = self
            .enbs
            .positions()
            .chain(self.ues.positions())
            .chain(corners);

        let mut bounds = Bounds::around(points.next()?);
        for p in points {
            bounds.include(p);
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: f64, y: f64) -> Node {
        Node {
            label: None,
            position: Position::new(x, y),
        }
    }

    #[test]
    fn bounds_cover_nodes_and_buildings() {
        let topo = Topology {
            enbs: NodeSet::new(NodeKind::Enb, vec![node(0.0, 0.0)]),
            ues: NodeSet::new(NodeKind::Ue, vec![node(10.0, -5.0), node(3.0, 4.0)]),
            buildings: vec![Building::from_corners(
                Position::new(20.0, 8.0),
                Position::new(15.0, 2.0),
            )],
        };
        let b = topo.bounds().unwrap();
        assert_eq!(b.x_min, 0.0);
        assert_eq!(b.x_max, 20.0);
        assert_eq!(b.y_min, -5.0);
        assert_eq!(b.y_max, 8.0);
    }

    #[test]
    fn empty_topology_has_no_bounds() {
        let topo = Topology {
            enbs: NodeSet::new(NodeKind::Enb, vec![]),
            ues: NodeSet::new(NodeKind::Ue, vec![]),
            buildings: vec![],
        };
        assert!(topo.bounds().is_none());
    }

    #[test]
    fn single_point_padding_is_nonzero() {
        let b = Bounds::around(Position::new(5.0, 7.0)).padded(0.05).unwrap();
        assert_eq!((b.x_min, b.x_max), (4.0, 6.0));
        assert_eq!((b.y_min, b.y_max), (6.0, 8.0));
    }

    #[test]
    fn padding_is_proportional_to_span() {
        let mut b = Bounds::around(Position::new(0.0, 0.0));
        b.include(Position::new(100.0, 10.0));
        let p = b.padded(0.05).unwrap();
        assert!((p.x_min + 5.0).abs() < 1e-9);
        assert!((p.x_max - 105.0).abs() < 1e-9);
        assert!((p.y_min + 0.5).abs() < 1e-9);
        assert!((p.y_max - 10.5).abs() < 1e-9);
    }

    #[test]
    fn overflowing_span_is_not_drawable() {
        let mut b = Bounds::around(Position::new(1e308, 0.0));
        b.include(Position::new(-1e308, 1.0));
        assert!(b.padded(0.05).is_none());
    }

    #[test]
    fn vanishing_unit_padding_is_not_drawable() {
        // 1e308 ± 1 rounds back to 1e308, leaving an empty range.
        let b = Bounds::around(Position::new(1e308, -1e308));
        assert!(b.padded(0.05).is_none());
    }

    #[test]
    fn building_corners_are_normalized() {
        let b = Building::from_corners(Position::new(5.0, 1.0), Position::new(-5.0, 9.0));
        assert_eq!(b.x_min, -5.0);
        assert_eq!(b.x_max, 5.0);
        assert_eq!(b.y_min, 1.0);
        assert_eq!(b.y_max, 9.0);
    }
}
