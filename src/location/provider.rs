//! The position provider: a default coordinate that may be upgraded once.
//!
//! A provider always has an answer. It starts from the configured default
//! and fires at most one background lookup; if that lookup succeeds the
//! shared fix is swapped, if it fails the default simply stays. Failures
//! are deliberate non-events, logged at debug only.

use super::ip;
use super::types::{LocationError, PositionFix, ProbeStatus};
use crate::geo::Coordinate;
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{debug, info};

/// A one-shot position lookup run on a background thread.
pub type Probe = Box<dyn FnOnce() -> Result<PositionFix, LocationError> + Send + 'static>;

struct Inner {
    fix: PositionFix,
    probe: ProbeStatus,
}

/// Shared handle to the current best-known position.
///
/// Cloning is cheap and every clone observes the same fix.
#[derive(Clone)]
pub struct PositionProvider {
    inner: Arc<Mutex<Inner>>,
}

impl PositionProvider {
    /// A provider that never looks anything up.
    pub fn offline(default: Coordinate) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                fix: PositionFix::default_at(default),
                probe: ProbeStatus::Idle,
            })),
        }
    }

    /// Start a provider that asks the IP geolocation endpoint once.
    pub fn start(default: Coordinate, endpoint: &str) -> Self {
        let endpoint = endpoint.to_string();
        Self::start_with(default, Box::new(move || ip::locate(&endpoint)))
    }

    /// Start a provider with a caller-supplied probe.
    ///
    /// The probe runs on its own thread with no timeout and no retry.
    /// Until it returns, snapshots serve the default.
    pub fn start_with(default: Coordinate, probe: Probe) -> Self {
        let provider = Self {
            inner: Arc::new(Mutex::new(Inner {
                fix: PositionFix::default_at(default),
                probe: ProbeStatus::Pending,
            })),
        };

        let inner = Arc::clone(&provider.inner);
        thread::spawn(move || match probe() {
            Ok(fix) => {
                info!(
                    lat = fix.coordinate.lat,
                    lng = fix.coordinate.lng,
                    source = %fix.source,
                    "position resolved"
                );
                let mut guard = inner.lock().unwrap();
                guard.fix = fix;
                guard.probe = ProbeStatus::Resolved;
            }
            Err(e) => {
                debug!(error = %e, "position lookup failed; keeping default");
                inner.lock().unwrap().probe = ProbeStatus::Failed;
            }
        });

        provider
    }

    /// The current best-known fix. Never blocks on the probe.
    pub fn snapshot(&self) -> PositionFix {
        self.inner.lock().unwrap().fix
    }

    pub fn status(&self) -> ProbeStatus {
        self.inner.lock().unwrap().probe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::types::PositionSource;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    const DEFAULT: Coordinate = Coordinate::new(49.27419524703112, -123.10334230846034);

    fn wait_for(provider: &PositionProvider, status: ProbeStatus) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while provider.status() != status {
            assert!(Instant::now() < deadline, "probe never reached {status:?}");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_offline_serves_default_forever() {
        let provider = PositionProvider::offline(DEFAULT);
        assert_eq!(provider.status(), ProbeStatus::Idle);
        for _ in 0..3 {
            let fix = provider.snapshot();
            assert_eq!(fix.coordinate, DEFAULT);
            assert_eq!(fix.source, PositionSource::Default);
            assert!(fix.resolved_at.is_none());
        }
    }

    #[test]
    fn test_default_until_probe_resolves() {
        let (tx, rx) = mpsc::channel::<PositionFix>();
        let provider = PositionProvider::start_with(DEFAULT, Box::new(move || Ok(rx.recv().unwrap())));

        // The probe is blocked on the channel, so this is the pre-resolution view.
        assert_eq!(provider.status(), ProbeStatus::Pending);
        assert_eq!(provider.snapshot().source, PositionSource::Default);
        assert_eq!(provider.snapshot().coordinate, DEFAULT);

        let resolved = PositionFix::ip(Coordinate::new(49.2827, -123.1207));
        tx.send(resolved).unwrap();
        wait_for(&provider, ProbeStatus::Resolved);

        let fix = provider.snapshot();
        assert_eq!(fix.source, PositionSource::IpApi);
        assert_eq!(fix.coordinate, Coordinate::new(49.2827, -123.1207));
        assert!(fix.resolved_at.is_some());
    }

    #[test]
    fn test_failed_probe_keeps_default() {
        let provider = PositionProvider::start_with(
            DEFAULT,
            Box::new(|| Err(LocationError::Network("unreachable".into()))),
        );
        wait_for(&provider, ProbeStatus::Failed);

        let fix = provider.snapshot();
        assert_eq!(fix.coordinate, DEFAULT);
        assert_eq!(fix.source, PositionSource::Default);
        assert!(fix.resolved_at.is_none());
    }

    #[test]
    fn test_hung_probe_never_blocks_snapshots() {
        // Keep the sender alive so the probe stays parked on recv().
        let (_tx, rx) = mpsc::channel::<PositionFix>();
        let provider = PositionProvider::start_with(DEFAULT, Box::new(move || Ok(rx.recv().unwrap())));

        for _ in 0..5 {
            assert_eq!(provider.snapshot().coordinate, DEFAULT);
            assert_eq!(provider.status(), ProbeStatus::Pending);
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_clones_share_the_fix() {
        let (tx, rx) = mpsc::channel::<PositionFix>();
        let provider = PositionProvider::start_with(DEFAULT, Box::new(move || Ok(rx.recv().unwrap())));
        let observer = provider.clone();

        tx.send(PositionFix::ip(Coordinate::new(1.5, 2.5))).unwrap();
        wait_for(&observer, ProbeStatus::Resolved);

        assert_eq!(provider.snapshot(), observer.snapshot());
        assert_eq!(observer.snapshot().source, PositionSource::IpApi);
    }
}
