//! Server harness and shared world for the users API behaviour tests.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The server keeps records in memory
//! and is stopped when the [`WorldFixture`] drops, even if a step panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::Method;
use actix_web::{HttpServer, web};
use awc::Client;
use records_backend::domain::{TRACE_ID_HEADER, UserRecordsService};
use records_backend::inbound::http::health::HealthState;
use records_backend::inbound::http::state::HttpState;
use records_backend::outbound::memory::InMemoryUserRepository;
use records_backend::server::{AppDependencies, build_app};
use rstest::fixture;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

pub(crate) struct ApiWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
    pub(crate) stored_id: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<ApiWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

/// A recorded HTTP exchange.
pub(crate) struct Exchange {
    pub(crate) status: u16,
    pub(crate) trace_id: Option<String>,
    pub(crate) body: Value,
}

/// Send one request to the running server and capture the outcome.
///
/// Empty bodies (e.g. `204 No Content`) are recorded as `Value::Null`.
pub(crate) fn send(
    world: &SharedWorld,
    method: Method,
    path: &str,
    payload: Option<Value>,
) -> Exchange {
    let ctx = world.borrow();
    let url = format!("{}{path}", ctx.base_url);
    ctx.local.block_on(&ctx.runtime, async move {
        let request = Client::default().request(method, url);
        let mut response = match payload {
            Some(payload) => request.send_json(&payload).await.expect("request sent"),
            None => request.send().await.expect("request sent"),
        };
        let status = response.status().as_u16();
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let bytes = response.body().await.expect("response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        Exchange {
            status,
            trace_id,
            body,
        }
    })
}

/// Send a request and remember it as the world's latest response.
pub(crate) fn perform(world: &SharedWorld, method: Method, path: &str, payload: Option<Value>) {
    let exchange = send(world, method, path, payload);
    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(exchange.status);
    ctx.last_trace_id = exchange.trace_id;
    ctx.last_body = Some(exchange.body);
}

async fn spawn_records_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let repository = Arc::new(InMemoryUserRepository::default());
    let http_state = web::Data::new(HttpState::new(Arc::new(UserRecordsService::new(
        repository,
    ))));
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

#[fixture]
pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let (base_url, server) = local
        .block_on(&runtime, spawn_records_server())
        .expect("server should start");

    WorldFixture {
        world: Rc::new(RefCell::new(ApiWorld {
            runtime,
            local,
            base_url,
            server,
            last_status: None,
            last_body: None,
            last_trace_id: None,
            stored_id: None,
        })),
    }
}
