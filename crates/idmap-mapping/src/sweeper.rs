//! Background expiry sweep
//!
//! A named thread wakes every `period`, evicts expired tables from the
//! registry and forgets stale load failures. It holds only a weak reference,
//! so it ends by itself once the registry is dropped.

use crate::registry::TableRegistry;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Weak};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const SWEEPER_THREAD_NAME: &str = "idmap-sweeper";

pub struct Sweeper {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Start sweeping `registry` every `period`
    pub fn start(registry: &Arc<TableRegistry>, period: Duration, failure_ttl: Duration) -> std::io::Result<Self> {
        let registry: Weak<TableRegistry> = Arc::downgrade(registry);
        let (stop, stopped) = mpsc::channel::<()>();

        let handle = std::thread::Builder::new()
            .name(SWEEPER_THREAD_NAME.to_string())
            .spawn(move || {
                debug!(period_ms = period.as_millis() as u64, "Sweeper started");
                loop {
                    match stopped.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {},
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    let Some(registry) = registry.upgrade() else {
                        break;
                    };
                    let removed = registry.remove_expired(Instant::now(), failure_ttl);
                    if !removed.is_empty() {
                        info!(evicted = removed.len(), remaining = registry.len(), "Evicted expired tables");
                    }
                }
                debug!("Sweeper stopped");
            })?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the thread and wait for it to finish
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            // a send error means the thread already exited
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Sweeper thread panicked");
            }
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::table::{MappingData, MappingTable};

    #[test]
    fn test_sweeps_expired_tables() {
        let registry = Arc::new(TableRegistry::new());
        registry.insert(MappingTable::new(MappingData::new(), "a", "b", 9606, Duration::ZERO));
        registry.insert(MappingTable::new(MappingData::new(), "b", "a", 9606, Duration::from_secs(3600)));

        let mut sweeper = Sweeper::start(&registry, Duration::from_millis(10), Duration::from_secs(60)).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while registry.len() > 1 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        sweeper.stop();

        assert_eq!(registry.len(), 1);
        assert!(!sweeper.is_running());
    }

    #[test]
    fn test_exits_when_registry_dropped() {
        let registry = Arc::new(TableRegistry::new());
        let sweeper = Sweeper::start(&registry, Duration::from_millis(5), Duration::from_secs(60)).unwrap();
        drop(registry);

        let deadline = Instant::now() + Duration::from_secs(5);
        while sweeper.is_running() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!sweeper.is_running());
    }
}
