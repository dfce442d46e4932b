use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Hands out ids that are unique for the lifetime of the generator.
///
/// Format: creation time in base36 followed by a counter in base36,
/// so ids from separate runs rarely collide and ids from one run never do.
#[derive(Debug)]
pub struct IdGenerator {
    stamp: String,
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self::with_stamp(&base36(millis))
    }

    /// Fixed stamp, for reproducible output.
    pub fn with_stamp(stamp: &str) -> Self {
        Self {
            stamp: stamp.to_string(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.stamp, base36(n))
    }

    pub fn next_prefixed(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}-{}", prefix, self.stamp, base36(n))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}
