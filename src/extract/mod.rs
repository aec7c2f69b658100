//! # Extraction Pipeline Module
//!
//! This module orchestrates the batch extraction itself: deciding the artist
//! list, fanning it out over a fixed set of workers, and funneling every
//! produced row into the per-table writer tasks.
//!
//! ## Overview
//!
//! A run is a single pass, not a service. The [`driver`] assembles the
//! ingredients (credentials, artist list, output sinks, worker slices),
//! spawns one [`worker`] task per slice, and then just counts completions
//! and failures until every worker is done. Workers never talk to each
//! other; they share only the credential pool and the row channels.
//!
//! ## Concurrency Model
//!
//! ```text
//! Driver
//!   ├── discovery (once, primary credential)
//!   ├── Worker 1 ──┐
//!   ├── Worker 2 ──┼── CredentialPool (N tokens, acquire/release)
//!   ├── ...        │
//!   └── Worker W ──┘
//!         │ rows
//!         ▼
//!   TableSink tasks (one per output table)
//! ```
//!
//! Within a worker everything is sequential: one artist at a time, one album
//! at a time, one track at a time. Parallelism comes only from slicing the
//! artist list across workers, which keeps per-artist ordering trivial and
//! failure handling local.
//!
//! ## Failure Containment
//!
//! A failed artist costs exactly that artist; a failed album or track fetch
//! costs less. Every such failure becomes a structured error row collected
//! by the driver and written to the error table at the end of the run, and
//! the run's exit is successful either way.

pub mod driver;
pub mod worker;
