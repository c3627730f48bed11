//! kubedepot library
//!
//! Loads a directory of single-cluster kubeconfigs at startup and serves them,
//! alone or merged, over HTTP. This module exports the core components for
//! testing and integration.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod kubeconfig;
pub mod logging;
pub mod resolver;
pub mod store;
pub mod web;
