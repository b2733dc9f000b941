/// Middleware modules for the API server
///
/// - `resolve`: Resolve-User / Resolve-Todo request-context stages

pub mod resolve;
