//! # Mock Framework & Testing Guide
//!
//! The `MockClient<T>` type hands out a real `ResourceClient<T>` whose requests are answered from
//! a queue of expectations instead of an actor. It lets you script return values (and failures)
//! for unit tests without spawning the actor under the client.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **Determinism** | 100% Deterministic | Subject to scheduler |
//! | **State** | No real state (expectations) | Real state management |
//! | **Use Case** | Unit testing logic *around* the client | Testing the actor itself or full system |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires specific state) |
//!
//! ## Testing Strategies
//!
//! - **Pattern 0, client logic**: wrap `mock.client()` in your resource client and assert on what
//!   the wrapper does with scripted answers.
//! - **Pattern 1, single actor**: spawn a real `ResourceActor` with `()` context.
//! - **Pattern 2, actor with mocked dependencies**: spawn the real actor under test and inject
//!   mock clients as its context (see `tests/order_actor_test.rs` in the `loyalty-ledger` crate).
//! - **Pattern 3, full system**: start everything through the lifecycle orchestrator.
//!
//! ## Testing Failure Scenarios
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Account { id: u32 }
//! #[derive(Debug)] struct AccountCreate;
//! #[derive(Debug)] enum AccountAction {}
//! #[derive(Debug, thiserror::Error)] #[error("Err")] struct AccountError;
//!
//! #[async_trait]
//! impl ActorEntity for Account {
//!     type Id = u32; type Create = AccountCreate; type Action = AccountAction;
//!     type ActionResult = (); type Filter = (); type Context = (); type Error = AccountError;
//!     fn from_create_params(id: u32, _: AccountCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     fn matches(&self, _: &()) -> bool { true }
//!     async fn handle_action(&mut self, _: AccountAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Account>::new();
//!     let client = mock.client();
//!
//!     // Simulate a downstream failure
//!     mock.expect_get(1).return_err(FrameworkError::ActorClosed);
//!
//!     let result = client.get(1).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! ## Unexpected Requests
//!
//! A request that does not match the next expectation (wrong kind or wrong id) is not answered:
//! its response channel is dropped, so the caller sees [`FrameworkError::ActorDropped`], and
//! [`MockClient::verify`] panics afterwards. This makes "this dependency must not be called"
//! a plain `verify()` on a mock without expectations.
//!
//! ## Mocking Utilities
//!
//! Use [`create_mock_client`] to get a client and a receiver, or use the fluent [`MockClient`] API.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock client.
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Find {
        key: String,
        response: Result<Option<T>, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Create {
        response: Result<T, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

struct MockState<T: ActorEntity> {
    expectations: VecDeque<Expectation<T>>,
    unexpected: Vec<String>,
}

type Shared<T> = Arc<Mutex<MockState<T>>>;

fn lock<T: ActorEntity>(state: &Shared<T>) -> MutexGuard<'_, MockState<T>> {
    // A panicking test thread must not hide the recorded mismatches.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A mock client with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<Account>::new();
/// mock.expect_action(UserId(1)).return_ok(LedgerActionResult::Credited(balance));
///
/// let ledger = LedgerClient::new(mock.client());
/// // Use the client in tests...
/// mock.verify(); // Ensures all expectations were met and nothing else was called
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    state: Shared<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let state: Shared<T> = Arc::new(Mutex::new(MockState {
            expectations: VecDeque::new(),
            unexpected: Vec::new(),
        }));
        let task_state = state.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&task_state).expectations.pop_front();
                if let Some(mismatch) = answer(request, expectation) {
                    lock(&task_state).unexpected.push(mismatch);
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            state,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: T::Id) -> GetExpectationBuilder<T> {
        GetExpectationBuilder {
            id,
            state: self.state.clone(),
        }
    }

    /// Expects a `find` operation.
    pub fn expect_find(&mut self, key: impl Into<String>) -> FindExpectationBuilder<T> {
        FindExpectationBuilder {
            key: key.into(),
            state: self.state.clone(),
        }
    }

    /// Expects a `list` operation (the filter itself is not compared).
    pub fn expect_list(&mut self) -> ListExpectationBuilder<T> {
        ListExpectationBuilder {
            state: self.state.clone(),
        }
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> CreateExpectationBuilder<T> {
        CreateExpectationBuilder {
            state: self.state.clone(),
        }
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self, id: T::Id) -> ActionExpectationBuilder<T> {
        ActionExpectationBuilder {
            id,
            state: self.state.clone(),
        }
    }

    /// Verifies that all expectations were met and no unexpected request arrived.
    pub fn verify(&self) {
        let state = lock(&self.state);
        if !state.unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", state.unexpected);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

/// Answers `request` from `expectation`, or describes the mismatch.
fn answer<T: ActorEntity>(
    request: ResourceRequest<T>,
    expectation: Option<Expectation<T>>,
) -> Option<String> {
    match (request, expectation) {
        (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response }))
            if id == want =>
        {
            let _ = respond_to.send(response);
            None
        }
        (
            ResourceRequest::Find { key, respond_to },
            Some(Expectation::Find { key: want, response }),
        ) if key == want => {
            let _ = respond_to.send(response);
            None
        }
        (ResourceRequest::List { respond_to, .. }, Some(Expectation::List { response })) => {
            let _ = respond_to.send(response);
            None
        }
        (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
            let _ = respond_to.send(response);
            None
        }
        (
            ResourceRequest::Action { id, respond_to, .. },
            Some(Expectation::Action { id: want, response }),
        ) if id == want => {
            let _ = respond_to.send(response);
            None
        }
        (request, _) => Some(describe(&request)),
    }
}

fn describe<T: ActorEntity>(request: &ResourceRequest<T>) -> String {
    match request {
        ResourceRequest::Create { params, .. } => format!("Create({params:?})"),
        ResourceRequest::Get { id, .. } => format!("Get({id})"),
        ResourceRequest::Find { key, .. } => format!("Find({key})"),
        ResourceRequest::List { filter, .. } => format!("List({filter:?})"),
        ResourceRequest::Action { id, action, .. } => format!("Action({id}, {action:?})"),
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder<T: ActorEntity> {
    id: T::Id,
    state: Shared<T>,
}

impl<T: ActorEntity> GetExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: Option<T>) {
        lock(&self.state).expectations.push_back(Expectation::Get {
            id: self.id,
            response: Ok(value),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        lock(&self.state).expectations.push_back(Expectation::Get {
            id: self.id,
            response: Err(error),
        });
    }
}

/// Builder for `find` expectations.
pub struct FindExpectationBuilder<T: ActorEntity> {
    key: String,
    state: Shared<T>,
}

impl<T: ActorEntity> FindExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: Option<T>) {
        lock(&self.state).expectations.push_back(Expectation::Find {
            key: self.key,
            response: Ok(value),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        lock(&self.state).expectations.push_back(Expectation::Find {
            key: self.key,
            response: Err(error),
        });
    }
}

/// Builder for `list` expectations.
pub struct ListExpectationBuilder<T: ActorEntity> {
    state: Shared<T>,
}

impl<T: ActorEntity> ListExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, items: Vec<T>) {
        lock(&self.state)
            .expectations
            .push_back(Expectation::List { response: Ok(items) });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        lock(&self.state).expectations.push_back(Expectation::List {
            response: Err(error),
        });
    }
}

/// Builder for `create` expectations.
pub struct CreateExpectationBuilder<T: ActorEntity> {
    state: Shared<T>,
}

impl<T: ActorEntity> CreateExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, item: T) {
        lock(&self.state)
            .expectations
            .push_back(Expectation::Create { response: Ok(item) });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        lock(&self.state).expectations.push_back(Expectation::Create {
            response: Err(error),
        });
    }
}

/// Builder for `action` expectations.
pub struct ActionExpectationBuilder<T: ActorEntity> {
    id: T::Id,
    state: Shared<T>,
}

impl<T: ActorEntity> ActionExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, result: T::ActionResult) {
        lock(&self.state).expectations.push_back(Expectation::Action {
            id: self.id,
            response: Ok(result),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        lock(&self.state).expectations.push_back(Expectation::Action {
            id: self.id,
            response: Err(error),
        });
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// In client tests we don't want to spin up a full `ResourceActor`: the test plays the actor
/// instead, inspecting each request that arrives on `receiver` and answering it by hand. This
/// allows asserting on the exact payload a client sends (amounts, ids, action variants).
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ActorEntity;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Coupon {
        id: u32,
        code: String,
        redeemed: bool,
    }

    #[derive(Debug)]
    struct CouponCreate {
        code: String,
    }

    #[derive(Debug)]
    enum CouponAction {
        Redeem,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Coupon error")]
    struct CouponError;

    #[async_trait]
    impl ActorEntity for Coupon {
        type Id = u32;
        type Create = CouponCreate;
        type Action = CouponAction;
        type ActionResult = bool;
        type Filter = ();
        type Context = ();
        type Error = CouponError;

        fn from_create_params(id: u32, params: CouponCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                code: params.code,
                redeemed: false,
            })
        }

        fn matches(&self, _filter: &()) -> bool {
            true
        }

        async fn handle_action(
            &mut self,
            _action: CouponAction,
            _ctx: &Self::Context,
        ) -> Result<bool, Self::Error> {
            Ok(true)
        }
    }

    fn coupon(id: u32, code: &str) -> Coupon {
        Coupon {
            id,
            code: code.to_string(),
            redeemed: false,
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Coupon>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(CouponCreate {
                    code: "SPRING".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.code, "SPRING");
        responder.send(Ok(coupon(1, "SPRING"))).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_channel_helpers_see_get_and_action() {
        let (client, mut receiver) = create_mock_client::<Coupon>(10);

        let task = tokio::spawn(async move {
            let found = client.get(3).await?;
            let redeemed = client.perform_action(3, CouponAction::Redeem).await?;
            Ok::<_, FrameworkError>((found, redeemed))
        });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get");
        assert_eq!(id, 3);
        responder.send(Ok(Some(coupon(3, "AUTUMN")))).unwrap();

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action");
        assert_eq!(id, 3);
        assert!(matches!(action, CouponAction::Redeem));
        responder.send(Ok(true)).unwrap();

        let (found, redeemed) = task.await.unwrap().unwrap();
        assert_eq!(found.unwrap().code, "AUTUMN");
        assert!(redeemed);
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Coupon>::new();

        mock.expect_create().return_ok(coupon(1, "SPRING"));
        mock.expect_find("SPRING").return_ok(Some(coupon(1, "SPRING")));
        mock.expect_list().return_ok(vec![coupon(1, "SPRING")]);
        mock.expect_action(1).return_ok(true);

        let client = mock.client();

        let created = client
            .create(CouponCreate {
                code: "SPRING".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let found = client.find("SPRING".to_string()).await.unwrap();
        assert_eq!(found, Some(coupon(1, "SPRING")));

        assert_eq!(client.list(()).await.unwrap().len(), 1);
        assert!(client.perform_action(1, CouponAction::Redeem).await.unwrap());

        mock.verify();
    }

    #[tokio::test]
    async fn test_unexpected_request_is_dropped_and_reported() {
        let mut mock = MockClient::<Coupon>::new();
        mock.expect_get(1).return_ok(None);
        let client = mock.client();

        // Wrong id: the response channel is dropped instead of answered
        let result = client.get(2).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| mock.verify()));
        assert!(outcome.is_err());
    }
}
