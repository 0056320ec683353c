//! Protocol layer for the external device store tool.
//!
//! This module builds tool arguments, interprets tool output and parses the
//! device report.

pub mod commands;
pub mod report;
pub mod response;
