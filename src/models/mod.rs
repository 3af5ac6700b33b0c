pub mod payment;
pub mod sale;
