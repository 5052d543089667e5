#![allow(dead_code)]

pub mod app_builder;
pub mod gated_oracle;
pub mod server;
pub mod test_state;
pub mod websocket_client;

pub use app_builder::create_test_app;
pub use gated_oracle::GatedOracle;
pub use test_state::{build_test_state, names, test_config, TestArena};

// Logging is auto-installed for every test binary that includes `support`.
#[ctor::ctor]
fn init_logging() {
    arena_test_support::logging::init();
}
