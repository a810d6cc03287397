pub mod driver;
pub mod reports;
pub mod tester;

pub use tester::*;
