pub mod aggregate;

pub use aggregate::OrderLine;
