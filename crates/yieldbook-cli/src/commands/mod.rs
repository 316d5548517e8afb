pub mod investment;
pub mod portfolio;
