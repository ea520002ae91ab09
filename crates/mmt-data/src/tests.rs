//! Unit tests for the CSV loaders and the demand generator.

use std::io::Cursor;

use mmt_core::{NodeId, SimTime};
use mmt_network::{GeoPoint, TransitNetworkBuilder};

use crate::{
    DemandConfig, LoadError, generate_demand, load_routes_reader, load_trips_geo_reader,
    load_trips_reader,
};

#[cfg(test)]
mod routes {
    use super::*;

    const ROUTES_CSV: &str = "\
vehicle_id,stop_seq,node_id,arrival_secs,departure_secs\n\
1,0,2,120,150\n\
0,1,7,600,630\n\
0,0,3,0,30\n\
";

    #[test]
    fn rows_are_grouped_and_ordered() {
        let routes = load_routes_reader(Cursor::new(ROUTES_CSV)).unwrap();
        assert_eq!(routes.len(), 2);

        // Vehicle 0's stops sorted by stop_seq despite file order.
        let stops = routes[0].stops();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].location, NodeId(3));
        assert_eq!(stops[0].departure, SimTime(30));
        assert_eq!(stops[1].location, NodeId(7));

        // Vehicle 1 (higher id) comes second.
        assert_eq!(routes[1].stops()[0].location, NodeId(2));
    }

    #[test]
    fn bad_timetable_is_rejected() {
        let csv = "\
vehicle_id,stop_seq,node_id,arrival_secs,departure_secs\n\
0,0,3,100,100\n\
0,1,7,50,60\n\
";
        let err = load_routes_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, LoadError::Model(_)));
    }

    #[test]
    fn malformed_row_is_a_csv_error() {
        let csv = "\
vehicle_id,stop_seq,node_id,arrival_secs,departure_secs\n\
0,0,three,0,30\n\
";
        let err = load_routes_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }
}

#[cfg(test)]
mod trips {
    use super::*;

    const TRIPS_CSV: &str = "\
trip_id,leg_seq,board_node,alight_node,release_secs\n\
1,1,5,9,60\n\
1,0,3,5,60\n\
0,0,3,7,45\n\
";

    #[test]
    fn legs_are_grouped_and_ordered() {
        let trips = load_trips_reader(Cursor::new(TRIPS_CSV)).unwrap();
        assert_eq!(trips.len(), 2);

        assert_eq!(trips[0].release_time, SimTime(45));
        assert_eq!(trips[0].segments, vec![(NodeId(3), NodeId(7))]);

        // Trip 1's legs sorted by leg_seq despite file order.
        assert_eq!(
            trips[1].segments,
            vec![(NodeId(3), NodeId(5)), (NodeId(5), NodeId(9))]
        );
    }

    #[test]
    fn disagreeing_release_times_are_rejected() {
        let csv = "\
trip_id,leg_seq,board_node,alight_node,release_secs\n\
0,0,3,5,45\n\
0,1,5,9,46\n\
";
        let err = load_trips_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn geo_endpoints_snap_to_nearest_nodes() {
        let mut b = TransitNetworkBuilder::new();
        b.add_node(GeoPoint::new(45.50, -73.56));
        b.add_node(GeoPoint::new(45.60, -73.56));
        let network = b.build();

        let csv = "\
trip_id,leg_seq,board_lat,board_lon,alight_lat,alight_lon,release_secs\n\
0,0,45.501,-73.561,45.599,-73.559,30\n\
";
        let trips = load_trips_geo_reader(Cursor::new(csv), &network).unwrap();
        assert_eq!(trips[0].segments, vec![(NodeId(0), NodeId(1))]);
    }
}

#[cfg(test)]
mod generator {
    use super::*;

    fn grid_network(n: u32) -> mmt_network::TransitNetwork {
        let mut b = TransitNetworkBuilder::new();
        for i in 0..n {
            b.add_node(GeoPoint::new(45.5 + i as f32 * 0.01, -73.56));
        }
        b.build()
    }

    #[test]
    fn same_seed_same_demand() {
        let network = grid_network(10);
        let config = DemandConfig {
            trips: 50,
            release_window_secs: 3_600,
            seed: 7,
        };
        assert_eq!(
            generate_demand(&network, &config),
            generate_demand(&network, &config)
        );
    }

    #[test]
    fn endpoints_are_distinct_and_in_range() {
        let network = grid_network(5);
        let config = DemandConfig {
            trips: 100,
            release_window_secs: 100,
            seed: 3,
        };
        for trip in generate_demand(&network, &config) {
            let (o, d) = trip.segments[0];
            assert_ne!(o, d);
            assert!(o.index() < 5 && d.index() < 5);
            assert!(trip.release_time < SimTime(100));
        }
    }

    #[test]
    fn tiny_network_yields_no_demand() {
        let network = grid_network(1);
        let config = DemandConfig {
            trips: 10,
            release_window_secs: 100,
            seed: 1,
        };
        assert!(generate_demand(&network, &config).is_empty());
    }
}
