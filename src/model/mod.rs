pub mod artist;
pub mod artwork;
pub mod common;
pub mod filter;
pub mod genre;
pub mod museum;
pub mod page;
pub mod sort;
pub mod stats;

pub use artist::*;
pub use artwork::*;
pub use common::{Id, Metadata};
pub use filter::*;
pub use genre::*;
pub use museum::*;
pub use page::*;
pub use sort::*;
pub use stats::*;
