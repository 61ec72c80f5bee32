//! Analysis passes over the loaded dataset
//!
//! Every pass is a pure function: records and parameters in, report rows
//! out. Nothing here mutates the dataset or holds state between calls.

pub mod ensemble;
pub mod stats;
pub mod wrong_answers;
