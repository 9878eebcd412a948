#![recursion_limit = "1024"]

#[macro_use]
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;

pub mod errors {
    error_chain! {
        foreign_links {
            Clap(::clap::Error);
            Io(::std::io::Error);
            Json(::serde_json::Error);
        }
    }
}

pub mod context;
pub mod counter;
pub mod env;
pub mod logging;
pub mod reporter;
pub mod runner;

pub use context::JobContext;
pub use counter::CounterSink;
pub use env::{EnvReader, Environment, Selection, Source};
pub use errors::*;
pub use reporter::{CounterReport, StatusReport};
