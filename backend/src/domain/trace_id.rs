//! Correlation id for one HTTP request.
//!
//! The [`Trace`](crate::Trace) middleware runs each request inside
//! [`TraceId::scope`]; anything executing in that task, from handlers down
//! to [`Error`](crate::domain::Error) construction, can read it back with
//! [`TraceId::current`]. Spawned tasks do not inherit the scope.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// UUID identifying one request across log lines, headers and error bodies.
///
/// # Examples
/// ```
/// use records_backend::TraceId;
///
/// let id: TraceId = "7b4f2c1e-0000-4000-8000-000000000001".parse().unwrap();
/// assert_eq!(id.to_string(), "7b4f2c1e-0000-4000-8000-000000000001");
/// assert!("abc".parse::<TraceId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Random v4 id for a request that brought none.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current id.
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw.trim()).map(Self)
    }
}
