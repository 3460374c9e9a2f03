pub mod audit;
pub mod notification;
