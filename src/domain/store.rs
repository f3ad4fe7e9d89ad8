//! Document store port.
//!
//! Every record lives in an external JSON-document server. Collections are
//! flat lists of JSON objects addressed by a string `id`; the trait below is
//! the whole contract the rest of the crate relies on.

use async_trait::async_trait;
use serde_json::Value;

/// Collections held by the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Clients,
    Vehicles,
    Orders,
    StateHistory,
    Expenses,
    Revenues,
    Ratings,
    Reports,
}

impl Collection {
    /// URL path segment of the collection on the document server.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Clients => "clients",
            Self::Vehicles => "vehicles",
            Self::Orders => "orders",
            Self::StateHistory => "stateHistory",
            Self::Expenses => "expenses",
            Self::Revenues => "revenues",
            Self::Ratings => "ratings",
            Self::Reports => "reports",
        }
    }

    /// Singular noun used in error messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Users => "User",
            Self::Clients => "Client",
            Self::Vehicles => "Vehicle",
            Self::Orders => "Order",
            Self::StateHistory => "State history entry",
            Self::Expenses => "Expense",
            Self::Revenues => "Revenue",
            Self::Ratings => "Rating",
            Self::Reports => "Report",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Equality filters forwarded to the store (`?clientId=3&state=process`).
pub type Filters = Vec<(String, String)>;

/// Document store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store unreachable: {0}")]
    Transport(String),

    #[error("document store responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("document store misconfigured: {0}")]
    Config(String),
}

/// Access to the external JSON-document server.
///
/// Missing documents are reported as `None` / `false`; only transport,
/// server and decoding failures are errors.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents of a collection matching all equality filters.
    async fn list(&self, collection: Collection, filters: &[(String, String)]) -> Result<Vec<Value>, StoreError>;

    /// Fetch a single document.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError>;

    /// Insert a document; the store assigns an id when none is given.
    async fn create(&self, collection: Collection, doc: Value) -> Result<Value, StoreError>;

    /// Replace a document wholesale. `None` when the id does not exist.
    async fn replace(&self, collection: Collection, id: &str, doc: Value) -> Result<Option<Value>, StoreError>;

    /// Shallow-merge fields into a document. `None` when the id does not exist.
    async fn patch(&self, collection: Collection, id: &str, partial: Value) -> Result<Option<Value>, StoreError>;

    /// Delete a document; `false` when it did not exist.
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, StoreError>;

    /// Cheap reachability check used by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}
