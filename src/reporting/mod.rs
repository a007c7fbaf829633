//! Report rendering

pub mod report_writer;
