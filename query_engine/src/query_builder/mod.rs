//! Query builder utilities
//!
//! This module provides SELECT construction and page arithmetic.

pub mod builder;
pub mod filter;
pub mod join;
pub mod ordering;
pub mod pagination;
pub mod sql_generation;


pub use builder::{Limit, SelectQuery};
pub use filter::{ComparisonOperator, PatternKind, Predicate};
pub use join::{JoinClause, JoinType};
pub use ordering::SortOrder;
pub use pagination::Pagination;
