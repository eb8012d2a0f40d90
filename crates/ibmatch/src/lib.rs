//! IB Match: resolves an IB diploma student's standing against university
//! program requirements and serves the results over HTTP.

pub mod db;
pub mod matching;
pub mod server;
pub mod types;
