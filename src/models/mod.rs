pub mod cell;
pub mod messages;
pub mod spreadsheet;
pub mod health;
pub mod diagnostics;
pub mod error;

pub use cell::*;
pub use messages::*;
pub use spreadsheet::*;
pub use health::*;
pub use diagnostics::*;
pub use error::*;
