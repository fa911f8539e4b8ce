//! Last-known device position, the single active watch subscription that
//! feeds it, and hand-off to an external maps application.
//!
//! [`LocationCache`] is constructed explicitly and shared by reference;
//! [`LocationCache::cleanup`] is the one place the watch is released.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use futures::StreamExt;
use gigmatch_core::Coordinate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::GeoError;

const DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps/dir/?api=1&destination=";

/// RFC 3986 unreserved characters pass through; everything else is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub coordinates: Coordinate,
    pub timestamp: DateTime<Utc>,
}

impl LocationSnapshot {
    #[must_use]
    pub fn now(coordinates: Coordinate) -> Self {
        Self {
            coordinates,
            timestamp: Utc::now(),
        }
    }
}

/// Device positioning (GPS, network location, or a simulator).
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// One-shot position fix.
    ///
    /// # Errors
    ///
    /// [`GeoError::PermissionDenied`] when location access is refused;
    /// other variants for unavailable or timed-out fixes.
    async fn current_position(&self) -> Result<Coordinate, GeoError>;

    /// Opens a subscription yielding position updates until dropped.
    ///
    /// # Errors
    ///
    /// As [`PositionSource::current_position`].
    async fn watch(&self) -> Result<BoxStream<'static, Result<Coordinate, GeoError>>, GeoError>;
}

/// Opens a URL in whatever handles it on this platform.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    /// # Errors
    ///
    /// [`GeoError::Open`] when the URL cannot be opened or the platform has
    /// no handler.
    async fn open(&self, url: &str) -> Result<(), GeoError>;
}

/// Delegates to `xdg-open`, `open`, or `cmd /C start`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

#[async_trait]
impl UrlOpener for SystemOpener {
    async fn open(&self, url: &str) -> Result<(), GeoError> {
        let mut command = if cfg!(target_os = "macos") {
            tokio::process::Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut c = tokio::process::Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else {
            tokio::process::Command::new("xdg-open")
        };

        let status = command.arg(url).status().await.map_err(|e| GeoError::Open {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(GeoError::Open {
                url: url.to_string(),
                reason: format!("opener exited with {status}"),
            })
        }
    }
}

/// Where to route to: free-text address or an exact point.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    Address(String),
    Point(Coordinate),
}

impl From<&str> for Destination {
    fn from(address: &str) -> Self {
        Destination::Address(address.to_string())
    }
}

impl From<String> for Destination {
    fn from(address: String) -> Self {
        Destination::Address(address)
    }
}

impl From<Coordinate> for Destination {
    fn from(point: Coordinate) -> Self {
        Destination::Point(point)
    }
}

/// Maps URL that opens turn-by-turn directions to `destination`.
#[must_use]
pub fn directions_url(destination: &Destination) -> String {
    let target = match destination {
        Destination::Address(address) => address.trim().to_string(),
        Destination::Point(point) => point.to_string(),
    };
    format!(
        "{DIRECTIONS_BASE_URL}{}",
        utf8_percent_encode(&target, QUERY_VALUE)
    )
}

pub struct LocationCache {
    source: Arc<dyn PositionSource>,
    opener: Arc<dyn UrlOpener>,
    snapshot: Arc<Mutex<Option<LocationSnapshot>>>,
    watch: Mutex<Option<JoinHandle<()>>>,
}

impl LocationCache {
    #[must_use]
    pub fn new(source: Arc<dyn PositionSource>, opener: Arc<dyn UrlOpener>) -> Self {
        Self {
            source,
            opener,
            snapshot: Arc::new(Mutex::new(None)),
            watch: Mutex::new(None),
        }
    }

    /// The last recorded position, or `None` if nothing has been recorded
    /// since construction or the last [`cleanup`](Self::cleanup).
    pub async fn get_cached_location(&self) -> Option<LocationSnapshot> {
        *self.snapshot.lock().await
    }

    /// Takes a one-shot fix and records it.
    ///
    /// # Errors
    ///
    /// Propagates the position source's error unchanged, including
    /// [`GeoError::PermissionDenied`]. The cache is left as it was.
    pub async fn fetch_current_location(&self) -> Result<LocationSnapshot, GeoError> {
        let coordinates = self.source.current_position().await?;
        let snapshot = LocationSnapshot::now(coordinates);
        *self.snapshot.lock().await = Some(snapshot);
        Ok(snapshot)
    }

    /// Starts recording every position update. An already-active watch is
    /// stopped and replaced.
    ///
    /// # Errors
    ///
    /// Propagates the source's error if the subscription cannot be opened;
    /// any previously active watch keeps running in that case.
    pub async fn start_watch(&self) -> Result<(), GeoError> {
        let mut active = self.watch.lock().await;
        let updates = self.source.watch().await?;
        if let Some(previous) = active.take() {
            tracing::debug!("replacing active location watch");
            stop(previous).await;
        }
        *active = Some(tokio::spawn(record_updates(
            updates,
            Arc::clone(&self.snapshot),
        )));
        Ok(())
    }

    pub async fn is_watching(&self) -> bool {
        self.watch
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Stops any active watch and forgets the cached position. Safe to call
    /// any number of times.
    pub async fn cleanup(&self) {
        if let Some(task) = self.watch.lock().await.take() {
            stop(task).await;
            tracing::debug!("location watch stopped");
        }
        *self.snapshot.lock().await = None;
    }

    /// Asks the platform to open directions to `destination`. Failures are
    /// logged and swallowed.
    pub async fn open_directions(&self, destination: impl Into<Destination>) {
        let url = directions_url(&destination.into());
        match self.opener.open(&url).await {
            Ok(()) => tracing::debug!(url, "opened directions"),
            Err(error) => tracing::warn!(url, error = %error, "could not open directions"),
        }
    }
}

impl Drop for LocationCache {
    fn drop(&mut self) {
        if let Some(task) = self.watch.get_mut().take() {
            task.abort();
        }
    }
}

/// Aborts the watch task and waits until it can no longer write.
async fn stop(task: JoinHandle<()>) {
    task.abort();
    // Cancelled or already finished; either way it is gone.
    let _ = task.await;
}

async fn record_updates(
    mut updates: BoxStream<'static, Result<Coordinate, GeoError>>,
    snapshot: Arc<Mutex<Option<LocationSnapshot>>>,
) {
    while let Some(update) = updates.next().await {
        match update {
            Ok(coordinates) => {
                *snapshot.lock().await = Some(LocationSnapshot::now(coordinates));
            }
            Err(GeoError::PermissionDenied) => {
                tracing::warn!("location permission revoked, ending watch");
                break;
            }
            Err(error) => {
                tracing::warn!(error = %error, "location watch update failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_destination_is_percent_encoded() {
        let url = directions_url(&Destination::from("1 Main St, Springfield"));
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&destination=1%20Main%20St%2C%20Springfield"
        );
    }

    #[test]
    fn coordinate_destination_keeps_signs_and_decimals() {
        let url = directions_url(&Destination::from(Coordinate::new(37.5, -122.25)));
        assert!(url.ends_with("destination=37.5%2C-122.25"), "{url}");
    }
}
