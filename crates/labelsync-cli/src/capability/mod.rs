//! Narrow capabilities the transfer operations depend on
//!
//! Each capability is a trait so the pipeline can be driven by the real
//! network/filesystem or by instrumented doubles in tests.

pub mod fetch;
pub mod fs;

pub use fetch::{HttpFetch, ReqwestFetcher};
pub use fs::{LocalFs, TokioFs};
