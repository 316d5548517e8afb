//! Property investment calculator: financing, itemised costs and returns.

pub mod costs;
pub mod engine;
pub mod input;

pub use costs::{CostCategory, CostLineItem};
pub use engine::{analyse_investment, analyse_investment_as_of, compute, InvestmentResult};
pub use input::{validate_input, InvestmentInput, PropertyStatus};
