pub mod asset;
pub mod contract;
pub mod protocol;
pub mod recommendation;
pub mod selection;
