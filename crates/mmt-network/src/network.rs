//! Transit network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing links.
//! Given a `NodeId n`, its outgoing links occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_travel_secs`) are sorted by
//! source node and indexed by `EdgeId`, so iterating a node's outgoing links
//! is a contiguous memory scan — ideal for Dijkstra's inner loop.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  Used
//! at load time to snap trip origin/destination coordinates to stops.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use mmt_core::{EdgeId, NodeId};

use crate::GeoPoint;

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-node queries within a city (error < 0.1 % at ≤ 60° lat).
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── TransitNetwork ────────────────────────────────────────────────────────────

/// Directed transit graph in CSR format plus a spatial index for snapping.
///
/// Fields are `pub` for direct indexed access on hot paths.  Do not construct
/// directly; use [`TransitNetworkBuilder`].
pub struct TransitNetwork {
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// CSR row pointer.  Outgoing links of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = node count + 1.
    pub node_out_start: Vec<u32>,

    /// Source node of each link.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each link.
    pub edge_to: Vec<NodeId>,

    /// Scheduled travel time of each link, in seconds.  Dijkstra cost.
    pub edge_travel_secs: Vec<u32>,

    spatial_idx: RTree<NodeEntry>,
}

impl TransitNetwork {
    /// Construct an empty network with no nodes or links.
    ///
    /// Useful for scenarios whose dispatcher never queries travel times.
    pub fn empty() -> Self {
        TransitNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing links from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest node to `pos`.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }
}

// ── TransitNetworkBuilder ─────────────────────────────────────────────────────

/// Construct a [`TransitNetwork`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed links in any order.  `build()`
/// sorts links by source node, constructs the CSR arrays, and bulk-loads the
/// R-tree.
///
/// # Example
///
/// ```
/// use mmt_network::{GeoPoint, TransitNetworkBuilder};
///
/// let mut b = TransitNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(45.50, -73.56));
/// let c = b.add_node(GeoPoint::new(45.51, -73.55));
/// b.add_link_between(a, c, 90); // 90 s each way
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct TransitNetworkBuilder {
    nodes: Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    travel_secs: u32,
}

impl TransitNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            raw_edges: Vec::new(),
        }
    }

    /// Pre-allocate for the expected number of nodes and links.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** link from `from` to `to` taking `travel_secs`.
    pub fn add_link(&mut self, from: NodeId, to: NodeId, travel_secs: u32) {
        self.raw_edges.push(RawEdge {
            from,
            to,
            travel_secs,
        });
    }

    /// Convenience: add links in **both directions** between `a` and `b`.
    pub fn add_link_between(&mut self, a: NodeId, b: NodeId, travel_secs: u32) {
        self.add_link(a, b, travel_secs);
        self.add_link(b, a, travel_secs);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    /// Consume the builder and produce a [`TransitNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> TransitNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Sort edges by source node for CSR construction.
        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| e.from.0);

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_travel_secs: Vec<u32> = raw.iter().map(|e| e.travel_secs).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        TransitNetwork {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_travel_secs,
            spatial_idx,
        }
    }
}

impl Default for TransitNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
