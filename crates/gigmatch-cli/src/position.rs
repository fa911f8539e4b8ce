//! Position source for a terminal session, which has no positioning
//! hardware of its own.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use gigmatch_core::Coordinate;
use gigmatch_geo::{GeoError, PositionSource};

/// Reports a position supplied on the command line, or none at all.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FixedPosition(pub(crate) Option<Coordinate>);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinate, GeoError> {
        self.0.ok_or_else(|| {
            GeoError::PositionUnavailable("no position source on this terminal".to_string())
        })
    }

    async fn watch(&self) -> Result<BoxStream<'static, Result<Coordinate, GeoError>>, GeoError> {
        let position = self.current_position().await?;
        Ok(stream::once(async move { Ok(position) }).boxed())
    }
}
