#![no_main]

use libfuzzer_sys::fuzz_target;
use temporal::{GridMapper, PeriodRange, TimingMapper, UniformGridMapper, DEFAULT_RESOLUTION};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let min_us = f64::from(u16::from_le_bytes([data[0], data[1]]));
    let max_us = min_us + f64::from(data[2]) * 100.0;
    let step_us = f64::from(data[3]) * 10.0;
    let range = PeriodRange::new(min_us, max_us);
    let utilisations: Vec<f64> = data[4..]
        .iter()
        .take(16)
        .map(|&b| f64::from(b) / 255.0)
        .collect();

    let smallest = GridMapper::default().map(range, step_us, &utilisations);
    let uniform = UniformGridMapper::seeded(u64::from(data[0])).map(range, step_us, &utilisations);

    // Both mappers search the same grid, so they agree on feasibility.
    assert_eq!(smallest.is_ok(), uniform.is_ok());
    if let Ok(records) = smallest {
        assert_eq!(records.len(), utilisations.len());
        for (record, &u) in records.iter().zip(&utilisations) {
            assert!(range.contains(record.period_us));
            assert!(record.exec_us >= 1.0);
            assert!((record.utilisation() - u).abs() <= u * DEFAULT_RESOLUTION + 1e-12);
        }
    }
});
