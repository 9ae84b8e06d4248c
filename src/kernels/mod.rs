// In: src/kernels/mod.rs

//! The transformation kernels the executor assembles into a pipeline.
//!
//! Each submodule owns one stage family: the pure uppercase text transform
//! and the streaming zstd codec wrappers. Kernels implement the
//! `pipeline::traits::Stage` contract and know nothing about sources, sinks,
//! or plan order.

pub mod upper;
pub mod zstd;
