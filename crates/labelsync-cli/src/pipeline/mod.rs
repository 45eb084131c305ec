//! Bounded-concurrency transfer pipeline
//!
//! A [`WorkSource`](crate::source::WorkSource) feeds the [`BoundedExecutor`],
//! which admits items through a capacity-`N` gate and runs one
//! [`TransferOperation`](crate::transfer::TransferOperation) per item. The
//! operation consults the [`DestinationIndex`] and every outcome goes to the
//! [`ProgressReporter`].

pub mod executor;
pub mod index;
pub mod reporter;

pub use executor::BoundedExecutor;
pub use index::{DestinationIndex, DirectoryMaterializer, ImplicitPrefix, Materialize};
pub use reporter::{ProgressReporter, RunSummary};
