#![doc = "llmdoc-browser-core: core logic library for llmdoc-browser."]

//! This crate contains the business logic for browsing a repository's
//! LLM-oriented documentation (`claude.md`, `agents.md`, the `llmdoc/` tree):
//! classification of the flat tree listing, hierarchy reconstruction, display
//! ordering, and the generation-guarded load pipeline. Network clients and
//! CLI glue live in the `llmdoc-browser` crate.
//!
//! # Usage
//! Implement [`contract::RepoHost`] for your hosting API and drive a
//! [`session::RepoSession`], or call the pure functions in [`docs`], [`tree`]
//! and [`order`] directly.

pub mod contract;
pub mod docs;
pub mod order;
pub mod session;
pub mod tree;
