pub mod auth;
pub mod booking;
pub mod catalog;
pub mod gateway;
pub mod payment;
pub mod token;
