//! Unit tests for the transit graph and travel-time query.

use mmt_core::NodeId;

use crate::{GeoPoint, NetworkError, TransitNetwork, TransitNetworkBuilder};

/// Network with 4 nodes in a line: 0 ↔ 1 ↔ 2 ↔ 3, 60 s per hop, plus a slow
/// direct shortcut 0 → 3.
fn line_network() -> TransitNetwork {
    let mut b = TransitNetworkBuilder::new();
    let n0 = b.add_node(GeoPoint::new(45.500, -73.560));
    let n1 = b.add_node(GeoPoint::new(45.505, -73.560));
    let n2 = b.add_node(GeoPoint::new(45.510, -73.560));
    let n3 = b.add_node(GeoPoint::new(45.515, -73.560));
    b.add_link_between(n0, n1, 60);
    b.add_link_between(n1, n2, 60);
    b.add_link_between(n2, n3, 60);
    b.add_link(n0, n3, 600); // slower than the 3-hop path
    b.build()
}

#[cfg(test)]
mod graph {
    use super::*;

    #[test]
    fn csr_dimensions() {
        let net = line_network();
        assert_eq!(net.node_count(), 4);
        assert_eq!(net.edge_count(), 7);
        assert_eq!(net.node_out_start.len(), 5);
    }

    #[test]
    fn out_edges_are_contiguous() {
        let net = line_network();
        // Node 0 has two outgoing links: to 1 and the shortcut to 3.
        let targets: Vec<NodeId> = net
            .out_edges(NodeId(0))
            .map(|e| net.edge_to[e.index()])
            .collect();
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&NodeId(1)));
        assert!(targets.contains(&NodeId(3)));
    }

    #[test]
    fn empty_network() {
        let net = TransitNetwork::empty();
        assert!(net.is_empty());
        assert!(net.nearest_node(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn nearest_node_snaps() {
        let net = line_network();
        let near_n2 = GeoPoint::new(45.5101, -73.5601);
        assert_eq!(net.nearest_node(near_n2), Some(NodeId(2)));
    }
}

#[cfg(test)]
mod travel {
    use super::*;

    #[test]
    fn picks_faster_multi_hop_path() {
        let net = line_network();
        // 3 hops × 60 s beats the 600 s shortcut.
        assert_eq!(net.travel_time(NodeId(0), NodeId(3)).unwrap(), 180);
    }

    #[test]
    fn same_node_is_zero() {
        let net = line_network();
        assert_eq!(net.travel_time(NodeId(1), NodeId(1)).unwrap(), 0);
    }

    #[test]
    fn unreachable_is_no_path() {
        let mut b = TransitNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 1.0));
        b.add_link(a, c, 10); // one-way only
        let net = b.build();

        let err = net.travel_time(c, a).unwrap_err();
        assert!(matches!(err, NetworkError::NoPath { .. }));
    }

    #[test]
    fn unknown_node_is_rejected() {
        let net = line_network();
        let err = net.travel_time(NodeId(0), NodeId(99)).unwrap_err();
        assert!(matches!(err, NetworkError::NodeNotFound(_)));
    }
}
