//! WordPress adapter
//!
//! Site-side capabilities the bridge can provide on its own.

pub mod alerts;

pub use alerts::TracingAlertSink;
