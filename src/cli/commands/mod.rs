pub mod drivers;
pub mod transactions;
