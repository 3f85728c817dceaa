pub mod campaigns;
pub mod health;
pub mod shop;
