//! Asset classification for foliocore.

pub mod resolver;
pub mod taxonomy;

pub use resolver::{ClassificationInput, Resolver};
pub use taxonomy::{
    CategoryEntry, CategoryTable, ClassTemplate, Classification, MatchKind, PrimaryClass,
    SecondaryClass, TickerOverrides,
};
