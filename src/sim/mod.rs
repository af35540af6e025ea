pub mod batch;
pub mod delivery;
pub mod dispatch;
pub mod order;
pub mod tracker;
