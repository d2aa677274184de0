use rawseq::{SensorConfig, SensorTrace};

#[doc(hidden)]
#[allow(clippy::needless_range_loop)]
fn main() -> rawseq::Result<()> {
    let config = SensorConfig {
        sample_count: 100_000,
        seed: Some(2),
        ..SensorConfig::default()
    };
    let trace = SensorTrace::generate(&config)?;
    let mut buckets = [0usize; 41];
    for &sample in trace.samples() {
        let bucket = usize::from(sample).saturating_sub(45).min(40);
        buckets[bucket] += 1;
    }
    for i in 0..buckets.len() {
        let bar = "#".repeat(buckets[i] / 500);
        println!("{:>3}: {}", i + 45, bar);
    }
    println!("mean = {:.3}", trace.mean().unwrap_or_default());
    Ok(())
}
