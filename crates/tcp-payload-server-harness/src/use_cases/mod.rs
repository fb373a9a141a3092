mod collect_result;
pub mod ports;

pub use collect_result::CollectionBuilder;
