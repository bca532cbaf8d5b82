//! # ActorClient Trait
//!
//! Common interface for resource‑specific clients: default `get`, `find` and `list` methods built
//! on top of a generic `ResourceClient`, with framework errors mapped into the resource's own
//! error type.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard read operations.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Voucher { id: u32, code: String }
/// #[derive(Debug)] struct VoucherCreate { code: String }
/// #[derive(Debug)] enum VoucherAction {}
/// #[derive(Debug)] struct VoucherError(String);
///
/// impl std::fmt::Display for VoucherError {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "{}", self.0)
///     }
/// }
/// impl std::error::Error for VoucherError {}
/// impl From<String> for VoucherError {
///     fn from(s: String) -> Self { VoucherError(s) }
/// }
///
/// #[async_trait]
/// impl ActorEntity for Voucher {
///     type Id = u32;
///     type Create = VoucherCreate;
///     type Action = VoucherAction;
///     type ActionResult = ();
///     type Filter = ();
///     type Context = ();
///     type Error = VoucherError;
///
///     fn from_create_params(id: u32, p: VoucherCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, code: p.code })
///     }
///     fn matches(&self, _: &()) -> bool { true }
///     fn unique_key(&self) -> Option<String> { Some(self.code.clone()) }
///     async fn handle_action(&mut self, _: VoucherAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// struct VoucherClient {
///     inner: ResourceClient<Voucher>,
/// }
///
/// #[async_trait]
/// impl ActorClient<Voucher> for VoucherClient {
///     type Error = VoucherError;
///
///     fn inner(&self) -> &ResourceClient<Voucher> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         VoucherError(e.to_string())
///     }
/// }
///
/// async fn usage(client: VoucherClient) {
///     // get(), find() and list() are provided automatically
///     let _ = client.get(1).await;
///     let _ = client.find("SPRING".to_string()).await;
///     let _ = client.list(()).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch an entity by its unique secondary key.
    #[tracing::instrument(skip(self))]
    async fn find(&self, key: String) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().find(key).await.map_err(Self::map_error)
    }

    /// Fetch every entity selected by `filter`.
    #[tracing::instrument(skip(self))]
    async fn list(&self, filter: T::Filter) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list(filter).await.map_err(Self::map_error)
    }
}
