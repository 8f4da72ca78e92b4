pub mod contingency;
pub mod result;
pub mod topset;
