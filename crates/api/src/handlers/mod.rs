pub mod access;
pub mod notification;
