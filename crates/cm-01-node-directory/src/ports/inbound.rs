//! # Driving Ports (Inbound API)
//!
//! The operations the transport boundary invokes for each inbound call.

use crate::domain::DirectoryError;
use crate::identity::PeerContext;

/// Primary API of the node directory.
///
/// # Example
///
/// ```rust,ignore
/// use cm_01_node_directory::ports::DirectoryApi;
///
/// fn lookup<T: DirectoryApi>(api: &T, address: &str) -> Vec<String> {
///     api.resolve(address).unwrap_or_default()
/// }
/// ```
pub trait DirectoryApi: Send + Sync {
    /// Register the caller's endpoints, replacing whatever it announced before.
    ///
    /// The caller's identity is taken from `peer`, the authentication context
    /// the transport attached to the call.
    ///
    /// # Errors
    ///
    /// - `Authentication` if `peer` is absent or not an account credential
    fn announce(
        &self,
        peer: Option<&PeerContext>,
        endpoints: Vec<String>,
    ) -> Result<(), DirectoryError>;

    /// Look up the endpoints last announced by `address`.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentity` if `address` is not a well-formed account address
    /// - `NotFound` if there is no live record for it
    fn resolve(&self, address: &str) -> Result<Vec<String>, DirectoryError>;
}
