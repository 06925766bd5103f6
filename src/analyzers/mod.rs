//! Survey response analytics.
//!
//! This module narrows a response snapshot by window and segment, computes
//! rating averages, the Net Promoter Score and the rating distribution, and
//! classifies the monthly satisfaction trend.

pub mod aggregate;
pub mod analyzer;
pub mod filter;
pub mod grade;
pub mod trend;
pub mod types;
pub mod utility;
