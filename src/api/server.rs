use axum::{
    Router, ServiceExt,
    extract::Request,
    handler::HandlerWithoutStateExt,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    decompression::RequestDecompressionLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::{
    middleware::{cors, handle_errors, handle_panic},
    services::{
        create_product, delete_product, edit_product, get_product, handle_root, list_products,
        not_found,
    },
    state::AppState,
};
use crate::config::Config;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The routed application behind trailing-slash normalization
pub type App = NormalizePath<Router>;

/// Full application: product routes, static files, then the 404 fallback.
///
/// Trailing slashes are trimmed before routing, so `/products/` lists
/// products. Layers run outermost first: request decompression, tracing,
/// CORS, error reporting, panic recovery.
pub fn router(state: AppState) -> App {
    let public = ServeDir::new(&state.config.assets.public_dir)
        .append_index_html_on_directories(false)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    let routes = Router::new()
        .route("/", get(handle_root))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(edit_product).delete(delete_product),
        )
        .fallback_service(public)
        .method_not_allowed_fallback(not_found)
        .with_state(state.clone())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn_with_state(state, handle_errors))
        .layer(from_fn(cors))
        .layer(TraceLayer::new_for_http())
        // Automatically decompress gzip request bodies
        .layer(RequestDecompressionLayer::new());

    // Must wrap the router: a `Router::layer` runs only after routing
    NormalizePathLayer::trim_trailing_slash().layer(routes)
}

pub async fn run(config: Config) -> Result<(), AnyError> {
    let address = config.bind_addr();

    info!(
        data_file = %config.catalog.data_file.display(),
        cache = config.catalog.cache,
        public_dir = %config.assets.public_dir.display(),
        "Opening product catalog"
    );
    let app = router(AppState::new(config));

    let listener = TcpListener::bind(address).await?;
    info!(%address, "Catalog API listening");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(%err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
