//! Unit tests for mmt-core primitives.

#[cfg(test)]
mod ids {
    use crate::{LegId, NodeId, TripId, VehicleId};

    #[test]
    fn index_roundtrip() {
        let id = VehicleId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(VehicleId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(VehicleId(0) < VehicleId(1));
        assert!(LegId(100) > LegId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(VehicleId::INVALID.0, u32::MAX);
        assert_eq!(TripId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(LegId(7).to_string(), "LegId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::{CoreError, SimClock, SimTime};

    #[test]
    fn time_arithmetic() {
        let t = SimTime(10);
        assert_eq!(t + 5, SimTime(15));
        assert_eq!(t.offset(3), SimTime(13));
        assert_eq!(SimTime(15) - SimTime(10), 5u64);
    }

    #[test]
    fn clock_advances_forward() {
        let mut clock = SimClock::new(1_000);
        clock.advance_to(SimTime(60)).unwrap();
        assert_eq!(clock.now, SimTime(60));
        assert_eq!(clock.current_unix_secs(), 1_060);

        // Re-advancing to the same time is allowed (events share timestamps).
        clock.advance_to(SimTime(60)).unwrap();
        assert_eq!(clock.now, SimTime(60));
    }

    #[test]
    fn clock_rejects_regression() {
        let mut clock = SimClock::new(0);
        clock.advance_to(SimTime(100)).unwrap();
        let err = clock.advance_to(SimTime(99)).unwrap_err();
        assert!(matches!(err, CoreError::ClockRegression { .. }));
        assert_eq!(clock.now, SimTime(100));
    }

    #[test]
    fn elapsed_dhm() {
        let mut clock = SimClock::new(0);
        clock.advance_to(SimTime(90_061)).unwrap(); // 1 day, 1 h, 1 min, 1 s
        assert_eq!(clock.elapsed_dhm(), (1, 1, 1));
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        for _ in 0..10 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn children_diverge_deterministically() {
        let mut root_a = SimRng::new(7);
        let mut root_b = SimRng::new(7);
        let mut child_a = root_a.child(1);
        let mut child_b = root_b.child(1);
        assert_eq!(child_a.random::<u64>(), child_b.random::<u64>());

        let mut other = SimRng::new(7).child(2);
        // Different offsets should not track each other.
        let xs: Vec<u64> = (0..4).map(|_| child_a.random()).collect();
        let ys: Vec<u64> = (0..4).map(|_| other.random()).collect();
        assert_ne!(xs, ys);
    }
}
