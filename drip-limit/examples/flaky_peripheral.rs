//! Simulates a flaky sensor read guarded by a leaky bucket.
//!
//! Occasional read errors are tolerated. When errors arrive faster than the
//! bucket leaks, the bucket overflows and the device is marked as faulty.

use std::ops::ControlFlow;
use std::time::Duration;

use drip_limit::Bucket;
use drip_limit::BucketConfig;

fn read_sensor(tick: u32) -> Result<u16, &'static str> {
    // errors come in a burst between ticks 20 and 35
    if tick % 7 == 0 || (20..35).contains(&tick) {
        Err("checksum mismatch")
    } else {
        Ok(1000 + tick as u16)
    }
}

fn main() {
    let config = BucketConfig::default().capacity(5.0).leak_rate(20.0);
    let mut faults = Bucket::from_config(config).expect("valid tuning");

    for tick in 0..60 {
        match read_sensor(tick) {
            Ok(value) => println!("tick {tick:>2}: read {value}"),
            Err(reason) => {
                let (verdict, next) = faults.drip_in();
                faults = next;
                println!(
                    "tick {tick:>2}: {reason} (fault level {:.2})",
                    faults.level()
                );
                let flow: ControlFlow<()> = verdict.into();
                if flow.is_break() {
                    println!(
                        "sensor marked faulty, retry after {:?}",
                        faults.retry_after()
                    );
                    faults = faults.reset().expect("tuning already validated");
                }
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}
