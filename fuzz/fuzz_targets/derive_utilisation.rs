#![no_main]

use libfuzzer_sys::fuzz_target;
use utilisation::UtilisationSampler;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let fragments = usize::from(data[0] % 8);
    let max_attempts = usize::from(data[1] % 16);
    let min_fraction = f64::from(data[2]) / 1024.0;
    let sampler = UtilisationSampler::new(min_fraction, 0.6, max_attempts, fragments);

    // Each candidate consumes bytes from the input; the length may be off by one.
    let mut idx = 3usize;
    let mut generator = |_total: f64, fragments: usize| {
        let len = match data.get(idx) {
            Some(b) if b % 17 == 0 => fragments + 1,
            _ => fragments,
        };
        let split: Vec<f64> = (0..len)
            .map(|i| f64::from(data.get(idx + i).copied().unwrap_or(0)) / 512.0)
            .collect();
        idx += len.max(1);
        split
    };

    if let Ok(split) = sampler.derive(&mut generator) {
        assert_eq!(split.len(), fragments);
        assert!(split.as_slice().iter().all(|&u| u >= min_fraction));
    }
});
