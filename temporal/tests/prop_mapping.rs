use proptest::prelude::*;
use temporal::{
    map_to_temporal, PeriodRange, TemporalError, TimingMapper, UniformGridMapper,
    DEFAULT_RESOLUTION,
};

fn fractions() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.001f64..=1.0, 1..10)
}

proptest! {
    #[test]
    fn prop_mapping_preserves_order_and_ratio(
        fractions in fractions(),
        min_us in 100.0f64..10_000.0,
        span_us in 0.0f64..1_000_000.0,
        step_us in 10.0f64..100_000.0,
        seed in any::<u64>(),
    ) {
        let range = PeriodRange::new(min_us, min_us + span_us);
        let mut mappers: [Box<dyn TimingMapper>; 2] = [
            Box::new(temporal::GridMapper::default()),
            Box::new(UniformGridMapper::seeded(seed)),
        ];
        for mapper in &mut mappers {
            match mapper.map(range, step_us, &fractions) {
                Ok(records) => {
                    prop_assert_eq!(records.len(), fractions.len());
                    for (record, fraction) in records.iter().zip(&fractions) {
                        prop_assert!(range.contains(record.period_us));
                        prop_assert!(record.exec_us >= 1.0);
                        prop_assert_eq!(record.exec_us.fract(), 0.0);
                        prop_assert!(
                            (record.utilisation() - fraction).abs() <= DEFAULT_RESOLUTION * fraction
                        );
                    }
                }
                Err(err) => {
                    let unmappable = matches!(err, TemporalError::Unmappable { .. });
                    prop_assert!(unmappable, "unexpected error {:?}", err);
                }
            }
        }
    }

    #[test]
    fn prop_failure_is_reported_not_clamped(fraction in 0.000_001f64..0.000_01) {
        // Even the longest period cannot give this fraction a whole microsecond.
        let err = map_to_temporal(PeriodRange::new(100.0, 1000.0), 100.0, &[fraction]).unwrap_err();
        let unmappable = matches!(err, TemporalError::Unmappable { index: 0, .. });
        prop_assert!(unmappable);
    }
}
