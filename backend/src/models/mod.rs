//! Domain types shared by the parsing and service layers.

pub mod cell;
pub mod diagnostics;
pub mod interval;
pub mod report;
pub mod request;
pub mod time;

pub use cell::*;
pub use diagnostics::*;
pub use interval::*;
pub use report::*;
pub use request::*;
pub use time::*;
