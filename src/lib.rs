#[macro_use]
extern crate log;
#[macro_use]
extern crate rocket;

use rocket::{Build, Rocket};

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;

use crate::catalog::{BuiltinCatalog, SharedCatalog};
use crate::config::ConfigFairing;
use crate::logging::LoggerFairing;
use crate::store::{MemoryStore, SharedStore};

/// Assemble the server: routes, config, logging, and the in-memory store
/// plus the built-in destination catalog as managed state. Both the store
/// and the catalog are injected behind traits, so either can be swapped for
/// a different backend without touching the handlers.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(ConfigFairing)
        .attach(LoggerFairing)
        .manage(Box::new(MemoryStore::new()) as SharedStore)
        .manage(Box::new(BuiltinCatalog) as SharedCatalog)
}

/// A client against a freshly built server, with its own empty store.
#[cfg(test)]
pub(crate) fn test_client() -> rocket::local::blocking::Client {
    rocket::local::blocking::Client::tracked(build()).expect("valid rocket instance")
}
