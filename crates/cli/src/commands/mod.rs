pub mod call_graph;
pub mod contracts;
pub mod engines;
pub mod query;
pub mod util;

pub use call_graph::*;
pub use contracts::*;
pub use engines::*;
pub use query::*;
pub use util::*;
