pub mod cart;
pub mod errors;
pub mod menu;
pub mod ports;
