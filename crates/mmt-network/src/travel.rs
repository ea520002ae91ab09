//! Shortest-travel-time query over the transit graph.
//!
//! Dispatchers only need travel *times* (to rank candidate vehicles), not
//! reconstructed paths, so the query returns the cost alone.  The heap uses
//! `NodeId` as a secondary key so ties always resolve the same way —
//! dispatchers built on this query stay deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use mmt_core::NodeId;

use crate::network::TransitNetwork;
use crate::{NetworkError, NetworkResult};

impl TransitNetwork {
    /// Shortest scheduled travel time from `from` to `to`, in seconds.
    ///
    /// Standard Dijkstra over the CSR graph.  `from == to` is zero seconds;
    /// an unreachable destination is [`NetworkError::NoPath`].
    pub fn travel_time(&self, from: NodeId, to: NodeId) -> NetworkResult<u64> {
        if !self.contains(from) {
            return Err(NetworkError::NodeNotFound(from));
        }
        if !self.contains(to) {
            return Err(NetworkError::NodeNotFound(to));
        }
        if from == to {
            return Ok(0);
        }

        let n = self.node_count();
        // dist[v] = best known cost (seconds) to reach v.
        let mut dist = vec![u64::MAX; n];
        dist[from.index()] = 0;

        // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
        let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
        heap.push(Reverse((0, from)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == to {
                return Ok(cost);
            }

            // Skip stale heap entries.
            if cost > dist[node.index()] {
                continue;
            }

            for edge in self.out_edges(node) {
                let neighbor = self.edge_to[edge.index()];
                let new_cost = cost.saturating_add(self.edge_travel_secs[edge.index()] as u64);

                if new_cost < dist[neighbor.index()] {
                    dist[neighbor.index()] = new_cost;
                    heap.push(Reverse((new_cost, neighbor)));
                }
            }
        }

        Err(NetworkError::NoPath { from, to })
    }
}
