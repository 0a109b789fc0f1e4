pub mod charts;
pub mod company;
pub mod health;
pub mod prices;
