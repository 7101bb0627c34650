#![deny(warnings, clippy::all)]

//! Core data structures and algorithms for an LTTng-style relay daemon's
//! live-trace-viewing subsystem: a generic refcounted-object substrate with
//! epoch-based reclamation ([`reclaim`]), a CTF Trace Object Model
//! ([`model`]), the session/trace/stream/viewer ownership graph built on
//! top of both ([`lifecycle`]), and a CTF 1.8 TSDL metadata emitter
//! ([`tsdl`]).
//!
//! This crate has no network or filesystem I/O of its own; a relay daemon
//! binary wires it to the wire protocol and storage it actually uses (see
//! `src/main.rs` for a minimal standalone demonstration).

pub mod lifecycle;
pub mod model;
pub mod reclaim;
pub mod tsdl;
