use dioxus::prelude::*;
use shared_types::ClientConfig;

mod api_client;
mod auth;
mod guard;
mod platform;
mod routes;
mod session;
mod storage;

use auth::AuthState;
use routes::Route;

const PORTAL_CSS: Asset = asset!("/assets/portal.css");

fn main() {
    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        let config = server::config::load_config();

        if config.features.telemetry {
            server::telemetry::init_telemetry();
        }
        server::health::record_start_time();

        let guard = server::auth::middleware::GuardState::from_config(
            config,
            server::auth::jwt_secret(),
        );

        let health = axum::Router::new()
            .route("/health", axum::routing::get(server::health::health_check))
            .with_state(guard.clone());

        let mut router = dioxus::server::router(App).merge(health).layer(
            axum::middleware::from_fn_with_state(guard, server::auth::middleware::route_guard),
        );

        if config.features.telemetry {
            router = router.layer(server::telemetry::OtelTraceLayer);
        }

        let router = router
            .layer(tower_http::request_id::PropagateRequestIdLayer::x_request_id())
            .layer(tower_http::request_id::SetRequestIdLayer::x_request_id(
                tower_http::request_id::MakeRequestUuid,
            ));
        Ok(router)
    });

    #[cfg(not(feature = "server"))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Client configuration comes from the server; defaults keep the portal
    // usable when the call fails.
    let config_resource =
        use_server_future(move || async move { server::api::get_client_config().await })?;

    let config = config_resource
        .read()
        .as_ref()
        .cloned()
        .unwrap_or(Ok(ClientConfig::default()))
        .unwrap_or_default();

    let auth = use_context_provider(move || AuthState::new(platform::auth_service(config)));

    // Restore any stored session once at startup
    use_hook(move || {
        let mut auth = auth;
        spawn(async move {
            auth.rehydrate().await;
        });
    });

    rsx! {
        document::Link { rel: "stylesheet", href: PORTAL_CSS }
        SuspenseBoundary {
            fallback: |_| rsx! {
                div { class: "guard-loading",
                    p { "Loading..." }
                }
            },
            Router::<Route> {}
        }
    }
}
