pub mod controls;
pub mod data;
pub mod errors;
