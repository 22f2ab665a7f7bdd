use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

use rocket::{
    fairing::{Fairing, Info, Kind},
    http::StatusClass,
    Data, Orbit, Request, Response, Rocket,
};

/// A unique identifier tying a response log line back to its request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct RequestId(u64);

impl RequestId {
    /// Atomically take the next ID.
    fn next() -> RequestId {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        RequestId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fairing that logs every request and response, with the log level of the
/// response line chosen by its status class.
#[derive(Debug, Copy, Clone)]
pub struct LoggerFairing;

#[rocket::async_trait]
impl Fairing for LoggerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Logger",
            kind: Kind::Liftoff | Kind::Request | Kind::Response | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let config = rocket.config();
        info!("Serving on {}:{}", config.address, config.port);
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        let id = req.local_cache(RequestId::next);
        let client = req
            .client_ip()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        info!("{id} {} {} from {client}", req.method(), req.uri());
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let id = req.local_cache(RequestId::next);
        let status = res.status();
        let line = format!("{id} {} {} -> {status}", req.method(), req.uri());
        match status.class() {
            StatusClass::ServerError => error!("{line}"),
            StatusClass::ClientError => warn!("{line}"),
            _ => info!("{line}"),
        }
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        warn!("Shutdown requested, stopping gracefully...");
    }
}
