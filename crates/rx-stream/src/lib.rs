pub mod alert_scanner;
pub mod app_state;
pub mod connection_id;
pub mod connection_limits;
pub mod connection_registry;
pub mod error;
pub mod event_stream;
pub mod metrics;
pub mod scan_config;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod stream_config;

pub use alert_scanner::AlertScanner;
pub use app_state::{AppState, monitor_handler};
pub use connection_id::ConnectionId;
pub use connection_limits::ConnectionLimits;
pub use connection_registry::ConnectionRegistry;
pub use error::{Result, StreamError};
pub use event_stream::EventStream;
pub use metrics::Metrics;
pub use scan_config::ScanConfig;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use stream_config::StreamConfig;

use tracing::info_span;

/// Create a tracing span for a monitor stream request.
/// All log entries within the handler will include these fields.
pub fn create_stream_span(subdomain: &str, tenant_id: &str) -> tracing::Span {
    info_span!(
        "monitor_stream",
        subdomain = %subdomain,
        tenant_id = %tenant_id,
    )
}
