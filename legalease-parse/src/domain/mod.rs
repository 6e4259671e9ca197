pub mod interval;
pub mod schema;

pub use interval::Interval;
pub use schema::ColumnSet;
