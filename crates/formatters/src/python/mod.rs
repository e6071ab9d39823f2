mod driver;
mod interpreter;

pub use driver::*;
pub use interpreter::*;
