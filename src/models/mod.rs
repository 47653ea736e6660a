pub mod field;
pub mod filter;
pub mod report;
pub mod source;

pub use field::*;
pub use filter::*;
pub use report::*;
pub use source::*;
