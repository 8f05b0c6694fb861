// Library target exists solely for criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// that bench harnesses can import types via `cubedex::engine::*` / `cubedex::cube::*`.
// Most code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used directly by benchmarks and integration tests
pub mod cube;
pub mod engine;
pub mod notation;
pub mod session;
pub mod store;

// Private: required transitively by the public modules (won't compile without them)
mod app;
mod config;
mod event;
mod transport;
mod ui;
