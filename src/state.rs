use crate::search::SearchGateway;

/// Shared request state / 共享状态
///
/// The gateway holds the only shared resource, the engine handle.
pub struct AppState {
    pub gateway: SearchGateway,
}
