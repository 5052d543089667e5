//! Objective oracle: the external pose classifier and its adapter.

pub mod adapter;
pub mod frame;
mod http;
pub mod scripted;
mod trait_def;

pub use adapter::OracleAdapter;
pub use frame::ImageFrame;
pub use http::{parse_confidence, HttpPoseOracle};
pub use scripted::{ScriptedOracle, ScriptedReply};
pub use trait_def::{OracleError, PoseOracle};
