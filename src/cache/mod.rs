// Gateway module for the context cache - follows the Train Station Pattern

mod clock;
mod expiring;
mod types;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::ManualClock;
pub use expiring::ExpiringSlot;
pub use types::{CacheEntry, CacheStats};
