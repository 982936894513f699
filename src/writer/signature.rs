//! Provenance stamp written where the decoder skips the signature string.
//!
//! Format: `{width*height}x{tile type count}${HHMMSS}%{uptime ms}`.

use std::fmt;
use std::sync::OnceLock;
use std::time::Instant;

/// Source of the wall-clock and uptime parts of a signature.
pub trait SignatureClock {
    /// Local time of day as `HHMMSS`.
    fn local_hhmmss(&self) -> String;
    /// Milliseconds since the machine started, wrapping at `u32::MAX`.
    fn uptime_millis(&self) -> u32;
}

/// Local time from `chrono`, uptime from `/proc/uptime` where available.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SignatureClock for SystemClock {
    fn local_hhmmss(&self) -> String {
        chrono::Local::now().format("%H%M%S").to_string()
    }

    fn uptime_millis(&self) -> u32 {
        let millis = std::fs::read_to_string("/proc/uptime")
            .ok()
            .and_then(|s| parse_proc_uptime(&s))
            .unwrap_or_else(|| process_start().elapsed().as_millis() as u64);
        millis as u32
    }
}

fn process_start() -> &'static Instant {
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now)
}

/// First field of `/proc/uptime` ("12345.67 ...") in milliseconds.
fn parse_proc_uptime(s: &str) -> Option<u64> {
    let secs: f64 = s.split_whitespace().next()?.parse().ok()?;
    Some((secs * 1000.0).round() as u64)
}

/// Clock with fixed readings.
#[derive(Debug, Clone)]
pub struct FixedClock {
    pub hhmmss: String,
    pub uptime_millis: u32,
}

impl SignatureClock for FixedClock {
    fn local_hhmmss(&self) -> String {
        self.hhmmss.clone()
    }

    fn uptime_millis(&self) -> u32 {
        self.uptime_millis
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub area: i32,
    pub tile_type_count: u8,
    pub hhmmss: String,
    pub uptime_millis: u32,
}

impl Signature {
    pub fn new(width: i32, height: i32, tile_type_count: u8, clock: &impl SignatureClock) -> Self {
        Self {
            area: width.wrapping_mul(height),
            tile_type_count,
            hhmmss: clock.local_hhmmss(),
            uptime_millis: clock.uptime_millis(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}${}%{}",
            self.area, self.tile_type_count, self.hhmmss, self.uptime_millis
        )
    }
}
