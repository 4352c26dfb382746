//! Shared world for the record management behaviour tests.
//!
//! A records server runs on a single-threaded Tokio runtime inside a
//! `LocalSet`; the client store talks to it over real HTTP through
//! [`HttpUsersApi`], wrapped so steps can count the calls it makes.

use std::cell::RefCell;
use std::future::Future;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{HttpServer, web};
use async_trait::async_trait;
use records_backend::domain::UserRecordsService;
use records_backend::inbound::http::health::HealthState;
use records_backend::inbound::http::state::HttpState;
use records_backend::outbound::memory::InMemoryUserRepository;
use records_backend::server::{AppDependencies, build_app};
use records_client::{
    ApiError, HttpUsersApi, UserChanges, UserDraft, UserForm, UserRecord, UserStore, UserTable,
    UsersApi,
};
use rstest::fixture;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use url::Url;

/// Operations the client sent, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    List,
    Create,
    Update,
    Delete,
}

/// [`UsersApi`] decorator recording each call before forwarding it.
pub(crate) struct RecordingUsersApi {
    inner: HttpUsersApi,
    calls: Mutex<Vec<Call>>,
}

impl RecordingUsersApi {
    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }

    pub(crate) fn count(&self, call: Call) -> usize {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|recorded| **recorded == call)
            .count()
    }
}

#[async_trait]
impl UsersApi for RecordingUsersApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        self.record(Call::List);
        self.inner.list_users().await
    }

    async fn create_user(&self, draft: &UserDraft) -> Result<UserRecord, ApiError> {
        self.record(Call::Create);
        self.inner.create_user(draft).await
    }

    async fn update_user(&self, id: &str, changes: &UserChanges) -> Result<UserRecord, ApiError> {
        self.record(Call::Update);
        self.inner.update_user(id, changes).await
    }

    async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.record(Call::Delete);
        self.inner.delete_user(id).await
    }
}

/// Server runtime and handle.
pub(crate) struct Harness {
    runtime: Runtime,
    local: LocalSet,
    server: ServerHandle,
}

impl Harness {
    /// Drive `future` to completion on the server's runtime.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.local.block_on(&self.runtime, future)
    }
}

/// Client-side state under test.
pub(crate) struct Client {
    pub(crate) store: UserStore<RecordingUsersApi>,
    pub(crate) form: UserForm,
    pub(crate) table: UserTable,
    pub(crate) list_calls_before_action: usize,
}

pub(crate) struct ClientWorld {
    pub(crate) harness: Harness,
    pub(crate) client: Client,
}

pub(crate) type SharedWorld = Rc<RefCell<ClientWorld>>;

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
        let server = ctx.harness.server.clone();
        ctx.harness.block_on(async move {
            server.stop(true).await;
        });
    }
}

async fn spawn_records_server() -> Result<(Url, ServerHandle), String> {
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

    let base_url = Url::parse(&format!("http://{addr}")).map_err(|err| err.to_string())?;
    Ok((base_url, handle))
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
    let api = RecordingUsersApi {
        inner: HttpUsersApi::new(&base_url, Duration::from_secs(5)).expect("http client"),
        calls: Mutex::new(Vec::new()),
    };
    let store = local.block_on(&runtime, UserStore::mount(api));

    WorldFixture {
        world: Rc::new(RefCell::new(ClientWorld {
            harness: Harness {
                runtime,
                local,
                server,
            },
            client: Client {
                store,
                form: UserForm::default(),
                table: UserTable::default(),
                list_calls_before_action: 0,
            },
        })),
    }
}
