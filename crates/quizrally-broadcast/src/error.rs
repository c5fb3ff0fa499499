//! Error types for the broadcast gateway.

use crate::ChannelId;

/// Errors a gateway implementation can surface.
///
/// [`LocalGateway`](crate::LocalGateway) itself never fails (an empty
/// channel just means zero deliveries); these exist for implementations
/// backed by an external pub/sub provider.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The channel was torn down by the provider.
    #[error("broadcast channel {0} is closed")]
    ChannelClosed(ChannelId),

    /// The provider could not be reached or rejected the publish.
    #[error("broadcast transport unavailable: {0}")]
    Unavailable(String),
}
