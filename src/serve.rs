//! HTTP server for the live dashboard
//!
//! `surveygauge serve data.csv` → loads the survey once, starts the server,
//! opens the browser. Every page view or `/api/state` call re-evaluates the
//! presenter against the count loaded at startup.

use crate::assets::{self, AssetLinks};
use crate::config::{self, DashboardConfig};
use crate::presenter::{PresentationState, ThresholdPresenter};
use crate::report::{self, Dashboard};
use crate::survey::SurveyCount;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tiny_http::{Header, Method, Request, Response, Server};

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }
}

impl ApiResponse<()> {
    fn failure(error: String) -> Self {
        Self { ok: false, data: None, error: Some(error) }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct StateParams {
    /// What-if count evaluated instead of the loaded one
    pub count: Option<i64>,
}

/// Immutable state shared by every request
pub struct Context {
    pub config: DashboardConfig,
    pub presenter: ThresholdPresenter,
    pub survey: SurveyCount,
}

impl Context {
    pub fn new(config: DashboardConfig, survey: SurveyCount) -> config::Result<Self> {
        config.validate()?;
        let presenter = config.presenter()?;
        Ok(Self { config, presenter, survey })
    }

    fn dashboard(&self) -> Result<Dashboard, String> {
        Dashboard::build(&self.config, &self.presenter, &self.survey, &AssetLinks::Served)
            .map_err(|e| e.to_string())
    }

    fn state(&self, params: &StateParams) -> Result<PresentationState, String> {
        let result = match params.count {
            Some(count) => self.presenter.evaluate(count),
            None => self.presenter.evaluate_survey(&self.survey),
        };
        result.map_err(|e| e.to_string())
    }
}

/// Response produced by [`route`], independent of the socket
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self { status, content_type, body: body.into() }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status, "application/json", body),
            Err(e) => Self::new(500, "text/plain", format!("Serialization error: {}", e)),
        }
    }

    fn not_found() -> Self {
        Self::new(404, "text/plain", "Not found")
    }
}

/// Start server, open browser, serve the dashboard
pub fn start(ctx: &Context, open_browser: bool) -> std::io::Result<()> {
    let addr = ctx.config.address();
    let server = Server::http(&addr).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let url = format!("http://{}", addr);

    eprintln!("\n\x1b[1;32m{}\x1b[0m", ctx.config.title);
    eprintln!("   {}", url);
    eprintln!(
        "   {} completed / {} target\n",
        report::format_thousands(ctx.survey.completed),
        report::format_thousands(ctx.presenter.target() as u64)
    );
    info!("Listening on {}", url);

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!("Could not open browser: {}", e);
        }
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, ctx) {
            warn!("Error: {}", e);
        }
    }

    Ok(())
}

fn handle_request(request: Request, ctx: &Context) -> std::io::Result<()> {
    let reply = route(ctx, request.method(), request.url());
    debug!("{} {} -> {}", request.method(), request.url(), reply.status);

    let header = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidData, "bad header"))?;
    let response = Response::from_data(reply.body)
        .with_status_code(reply.status)
        .with_header(header);
    request.respond(response)
}

/// Dispatch a request to its handler
pub fn route(ctx: &Context, method: &Method, url: &str) -> Reply {
    let mut parts = url.splitn(2, '?');
    let path = parts.next().unwrap_or("/");
    let query = parts.next().unwrap_or("");

    match (method, path) {
        // Dashboard page
        (&Method::Get, "/") | (&Method::Get, "/index.html") => match ctx.dashboard() {
            Ok(dashboard) => {
                let mut body = Vec::new();
                match report::html::write(&mut body, &dashboard) {
                    Ok(()) => Reply::new(200, "text/html; charset=utf-8", body),
                    Err(e) => Reply::new(500, "text/plain", e.to_string()),
                }
            }
            Err(e) => Reply::new(500, "text/plain", e),
        },

        // API: celebration state
        (&Method::Get, "/api/state") => {
            let params = match parse_params(query) {
                Ok(params) => params,
                Err(e) => return Reply::json(400, &ApiResponse::failure(e)),
            };
            match ctx.state(&params) {
                Ok(state) => Reply::json(200, &ApiResponse::success(state)),
                Err(e) => Reply::json(400, &ApiResponse::failure(e)),
            }
        }

        // API: full snapshot
        (&Method::Get, "/api/dashboard") => match ctx.dashboard() {
            Ok(dashboard) => Reply::json(200, &ApiResponse::success(dashboard)),
            Err(e) => Reply::json(500, &ApiResponse::failure(e)),
        },

        // No icon ships with the dashboard
        (&Method::Get, "/favicon.ico") => Reply::new(204, "image/x-icon", Vec::new()),

        (&Method::Get, p) if p.starts_with("/assets/") => {
            serve_asset(&ctx.config, &p["/assets/".len()..])
        }

        _ => Reply::not_found(),
    }
}

fn parse_params(query: &str) -> Result<StateParams, String> {
    if query.is_empty() {
        return Ok(StateParams::default());
    }
    serde_urlencoded::from_str::<StateParams>(query).map_err(|e| format!("Bad query: {}", e))
}

fn serve_asset(config: &DashboardConfig, name: &str) -> Reply {
    let path = match assets::resolve(&config.assets_dir, name) {
        Some(path) => path,
        None => return Reply::new(400, "text/plain", "Bad asset path"),
    };
    match std::fs::read(&path) {
        Ok(bytes) => Reply::new(200, assets::content_type(&path), bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Reply::not_found(),
        Err(e) => {
            warn!("Cannot read asset {}: {}", path.display(), e);
            Reply::new(500, "text/plain", "Cannot read asset")
        }
    }
}
