/// Data layer: input parsing and the topology model.
///
/// Architecture:
/// ```text
///  enbs.txt / ues.txt / buildings.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  field 5 → "x,y" → Position
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  NodeSet per kind, Building rectangles, Topology
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
