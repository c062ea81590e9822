pub mod basket;
pub mod calc;
pub mod datatype;
pub mod expenditure;
pub mod period;
pub mod report;
pub mod sync;

pub use basket::Basket;
pub use expenditure::Expenditures;
pub use period::Period;
