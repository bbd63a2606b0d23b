pub mod naming;

pub use naming::{lower_first, upper_first};
