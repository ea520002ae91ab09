//! Synthetic 5-stop transit network for the minibus demo.
//!
//! A north–south line through downtown Montréal with one east shortcut:
//!
//! ```text
//! 0 ── 1 ── 2 ── 3 ── 4
//!      └───────┘ (express, slower per-hop but one hop)
//! ```

use mmt_network::{GeoPoint, TransitNetwork, TransitNetworkBuilder};

pub fn build_network() -> TransitNetwork {
    let mut b = TransitNetworkBuilder::with_capacity(5, 10);

    let stops = [
        GeoPoint::new(45.4950, -73.5780),
        GeoPoint::new(45.5010, -73.5700),
        GeoPoint::new(45.5080, -73.5630),
        GeoPoint::new(45.5150, -73.5560),
        GeoPoint::new(45.5230, -73.5490),
    ];
    let ids: Vec<_> = stops.into_iter().map(|p| b.add_node(p)).collect();

    for pair in ids.windows(2) {
        b.add_link_between(pair[0], pair[1], 180); // 3 min per hop
    }
    b.add_link_between(ids[1], ids[3], 420); // express shortcut

    b.build()
}
