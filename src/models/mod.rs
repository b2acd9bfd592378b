//! Record types produced by the extraction pipeline

pub mod code_record;

pub use code_record::CodeRecord;
