pub use crate::error::{print_error, ErrorType, GsError, GsResult};
pub use crate::suite::{load, GsUnit};

pub mod args;
pub mod assert;
pub mod cli;
pub mod dynamic;
pub mod equality;
pub mod error;
pub mod kind;
pub mod report;
pub mod scope;
pub mod suite;
pub mod util;
pub mod value;
