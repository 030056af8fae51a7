//! Download workers.
//!
//! One [`Worker`] owns one byte range: it issues a ranged `GET`, requires a
//! `206 Partial Content` answer, and streams the body in fixed-size chunks
//! into the shared [`OutputFile`] at the range's offsets, advancing its
//! progress tracker by the bytes actually written.
//!
//! # Overview
//!
//! - `worker` - the [`Worker`] state machine and its spawned task
//! - `outcome` - [`Outcome`] and [`WorkerState`]
//! - `output` - the positional-write [`OutputFile`]
//! - `chunks` - regrouping of the response body into fixed-size chunks
//!
//! Workers check the download's cancellation token before writing each
//! chunk. A worker blocked on the network is woken by cancellation as well,
//! and drops its connection.

mod chunks;
pub mod outcome;
pub mod output;
pub mod worker;

pub use outcome::{Outcome, WorkerState};
pub use output::OutputFile;
pub use worker::{Worker, WorkerOptions};
