//! HTTP server implementation
//!
//! hyper http1 with TokioIo, one task per accepted connection.

use bytes::Bytes;
use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::billing::{CheckoutProvider, CheckoutService, StripeCheckout};
use crate::config::Args;
use crate::provisioning::ProfileTemplate;
use crate::routes::{self, BoxBody};
use crate::services::VpnService;
use crate::types::Result;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Accounts, sessions and devices
    pub vpn: VpnService,
    /// Checkout bridge
    pub checkout: CheckoutService,
    /// Whether the checkout provider has credentials
    pub checkout_configured: bool,
    pub started_at: Instant,
}

impl AppState {
    /// Build state with the Stripe-compatible provider from `args`
    pub fn new(args: Args) -> Result<Self> {
        let provider = StripeCheckout::new(
            &args.stripe.stripe_api_base,
            args.stripe_secret_key().map(str::to_string),
            args.request_timeout(),
        )?;
        let configured = provider.is_configured();

        let mut state = Self::with_provider(args, Arc::new(provider));
        state.checkout_configured = configured;
        Ok(state)
    }

    /// Build state around an injected checkout provider
    pub fn with_provider(args: Args, provider: Arc<dyn CheckoutProvider>) -> Self {
        let vpn = VpnService::new(
            ProfileTemplate::new(args.profile_domain.clone()),
            args.admin_key().map(str::to_string),
        );
        let checkout = CheckoutService::new(
            args.plan_catalog(),
            provider,
            args.stripe.checkout_success_url.clone(),
            args.stripe.checkout_cancel_url.clone(),
        );

        Self {
            args,
            vpn,
            checkout,
            checkout_configured: true,
            started_at: Instant::now(),
        }
    }
}

/// Bind `args.listen` and serve until the process exits
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "imuvpn listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    serve(listener, state).await
}

/// Accept loop over an already bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
pub async fn handle_request<B>(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<B>,
) -> std::result::Result<Response<BoxBody>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!(peer = %addr, method = %method, path = %path, "Request");

    let response = match (method, path.as_str()) {
        // CORS preflight
        (Method::OPTIONS, _) => routes::cors_preflight(),

        (Method::GET, "/") => routes::service_info(),
        (Method::GET, "/health") | (Method::GET, "/healthz") => routes::health_check(&state),
        (Method::GET, "/version") => routes::version_info(),

        (Method::POST, "/auth/signup") => routes::handle_signup(req, Arc::clone(&state)).await,
        (Method::POST, "/auth/login") => routes::handle_login(req, Arc::clone(&state)).await,
        (Method::GET, "/auth/me") => routes::handle_me(&req, &state),

        (Method::POST, "/wireguard/configs") => {
            routes::handle_provision(req, Arc::clone(&state)).await
        }
        (Method::GET, "/wireguard/configs") => routes::handle_list(&req, &state),

        (Method::GET, "/admin/metrics") => routes::handle_metrics(&req, &state),

        (Method::POST, "/billing/checkout") => {
            routes::handle_checkout(req, Arc::clone(&state)).await
        }

        _ => routes::not_found(&path),
    };

    Ok(response)
}
