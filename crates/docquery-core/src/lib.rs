pub mod driver;
pub use driver::Driver;

mod error;
pub use error::Error;

pub mod query;
pub use query::QueryModel;

pub mod schema;
pub use schema::Schema;

pub mod stmt;

/// A Result type alias that uses docquery's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
