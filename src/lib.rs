// SPDX-License-Identifier: PMPL-1.0-or-later
//! Wcagbot - Consolidated WCAG Accessibility Report Generator
//!
//! Part of the gitbot-fleet ecosystem. Wcagbot consumes the axe-core result
//! documents produced for every (page, WCAG level) pair of an audit run and
//! synthesises them into one report: a detail table, summary counts and
//! two charts.
//!
//! ## Pipeline
//!
//! - **Store** ([`store`]): loads a result document by reference
//! - **Normalize** ([`normalize`]): one record per violation, first node only
//! - **Aggregate** ([`aggregate`]): fixed-shape level × impact counts
//! - **Chart** ([`chart`]): stacked bar and pie chart rendering
//! - **Report** ([`report`]): ordering, tables and the HTML document
//!
//! [`pipeline::generate_report`] runs all stages for a [`config::ReportConfig`].

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod store;

pub use error::{ReportError, Result};
