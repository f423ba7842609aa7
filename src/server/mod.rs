use crate::config::Settings;
use crate::error::{LanderError, Result};
use crate::extract::{ExtractConfig, RoutingMode, extract_and_group_with_stats};
use crate::render::{PageView, Renderer};
use crate::runtime::ContainerSource;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info};
use warp::http::{Method, StatusCode};
use warp::path::FullPath;
use warp::reply::Response;
use warp::{Filter, Reply};

/// Read-only page settings shared by every request
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub title: String,
    pub hostname: String,
    pub mode: RoutingMode,
    pub extract: ExtractConfig,
}

impl From<&Settings> for DashboardConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            title: settings.title.clone(),
            hostname: settings.hostname.clone(),
            mode: RoutingMode::Traefik,
            extract: settings.extract_config(),
        }
    }
}

/// Builds the dashboard page from a fresh container listing
pub struct Dashboard {
    source: Arc<dyn ContainerSource>,
    renderer: Renderer,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(source: Arc<dyn ContainerSource>, renderer: Renderer, config: DashboardConfig) -> Self {
        Self {
            source,
            renderer,
            config,
        }
    }

    /// Query the runtime and render the page. Only runtime and render failures surface here.
    pub async fn render_page(&self) -> Result<String> {
        let records = self.source.fetch().await?;
        let (links, stats) =
            extract_and_group_with_stats(&records, self.config.mode, &self.config.extract);

        debug!(
            containers = stats.seen,
            opted_in = stats.opted_in,
            linked = stats.linked,
            mode_disabled = stats.mode_disabled,
            malformed = stats.malformed,
            "grouped containers"
        );

        let page = PageView::new(&self.config.title, &self.config.hostname, &links);
        Ok(self.renderer.render(&page)?)
    }
}

/// `GET /` renders the dashboard, `GET /health` answers liveness checks,
/// everything else is a 404.
pub fn routes(
    dashboard: Arc<Dashboard>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .and(warp::addr::remote())
        .and(with_dashboard(dashboard))
        .and_then(index_handler);

    let health = warp::path!("health")
        .and(warp::get())
        .map(|| {
            warp::reply::json(&serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
            }))
            .into_response()
        });

    let fallback = warp::any()
        .and(warp::method())
        .and(warp::path::full())
        .and(warp::addr::remote())
        .map(|method: Method, path: FullPath, remote: Option<SocketAddr>| {
            error!("{} {} {} not a valid request", peer(remote), method, path.as_str());
            error_page(StatusCode::NOT_FOUND, "Not found").into_response()
        });

    index
        .or(health)
        .unify()
        .or(fallback)
        .unify()
        .with(warp::trace::request())
}

fn with_dashboard(
    dashboard: Arc<Dashboard>,
) -> impl Filter<Extract = (Arc<Dashboard>,), Error = Infallible> + Clone {
    warp::any().map(move || dashboard.clone())
}

async fn index_handler(
    remote: Option<SocketAddr>,
    dashboard: Arc<Dashboard>,
) -> std::result::Result<Response, Infallible> {
    debug!("{} GET /", peer(remote));

    let response = match dashboard.render_page().await {
        Ok(html) => warp::reply::html(html).into_response(),
        Err(LanderError::Connection(e)) => {
            error!(endpoint = dashboard.source.endpoint(), "Failed to list containers: {}", e);
            error_page(StatusCode::BAD_GATEWAY, "Container runtime unavailable").into_response()
        }
        Err(e) => {
            error!("Failed to render dashboard: {}", e);
            error_page(StatusCode::INTERNAL_SERVER_ERROR, "Dashboard could not be rendered")
                .into_response()
        }
    };

    Ok(response)
}

fn error_page(status: StatusCode, message: &str) -> impl Reply {
    let body = format!(
        "<!DOCTYPE html>\n<html><head><title>{code}</title></head>\
         <body><h1>{code}</h1><p>{message}</p></body></html>\n",
        code = status.as_u16(),
    );
    warp::reply::with_status(warp::reply::html(body), status)
}

fn peer(remote: Option<SocketAddr>) -> String {
    remote.map_or_else(|| "-".to_string(), |addr| addr.to_string())
}

/// Serve the dashboard on `addr` until `shutdown` resolves
pub async fn serve<F>(dashboard: Arc<Dashboard>, addr: SocketAddr, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (bound, server) = warp::serve(routes(dashboard))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    info!("✅ Starting server on http://{}", bound);
    server.await;
    info!("Server stopped");
    Ok(())
}
