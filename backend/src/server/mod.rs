//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use std::net::SocketAddr;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready, root};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{create_user, delete_user, list_users, update_user};
use crate::inbound::http::validation::json_error_handler;
use crate::middleware::{OpenCors, Trace};
use state_builders::{build_http_state, build_user_repository};

/// Shared state cloned into every worker's `App`.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
}

/// Assemble the application: middleware, `/api/users`, probes, and (in
/// debug builds) Swagger UI at `/docs`.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api")
        .service(list_users)
        .service(create_user)
        .service(update_user)
        .service(delete_user);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(OpenCors)
        .wrap(Trace)
        .service(api)
        .service(root)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// A server bound to its listener but not yet driven.
pub struct BoundServer {
    /// Future driving the listener; await it (or spawn it) to serve.
    pub server: Server,
    /// Address actually bound, useful when the configured port is `0`.
    pub local_addr: SocketAddr,
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when the record store cannot be prepared or
/// binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<BoundServer> {
    let repository = build_user_repository(&config).await?;
    let http_state = build_http_state(repository);
    let server_health_state = health_state.clone();

    let http_server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr())?;

    let local_addr = http_server
        .addrs()
        .first()
        .copied()
        .ok_or_else(|| std::io::Error::other("server bound no listeners"))?;
    let server = http_server.run();

    health_state.mark_ready();
    Ok(BoundServer { server, local_addr })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{Method, StatusCode, header};
    use actix_web::test;

    use std::sync::Arc;

    use crate::domain::TRACE_ID_HEADER;
    use crate::outbound::memory::InMemoryUserRepository;

    fn deps() -> AppDependencies {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: build_http_state(Arc::new(InMemoryUserRepository::default())),
        }
    }

    #[actix_web::test]
    async fn assembled_app_serves_users_with_trace_and_cors_headers() {
        let app = test::init_service(build_app(deps())).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/api/users").to_request())
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
        assert!(res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), b"[]");
    }

    #[actix_web::test]
    async fn assembled_app_answers_preflight() {
        let app = test::init_service(build_app(deps())).await;
        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/users/3fa85f64-5717-4562-b3fc-2c963f66afa6")
            .to_request();

        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn assembled_app_serves_root_and_probes() {
        let app = test::init_service(build_app(deps())).await;
        for uri in ["/", "/health/ready", "/health/live"] {
            let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
        }
    }
}
