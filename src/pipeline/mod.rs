pub mod compare;
pub mod correlate;
pub mod embed;
pub mod enrich;
