//! Application-level schema

mod embedded;
pub use embedded::Embedded;

mod field;
pub use field::{Field, FieldId, FieldTy};

mod model;
pub use model::{Model, ModelId};

mod model_def;
pub use model_def::ModelDef;
pub(crate) use model_def::{FieldDef, FieldDefTy};

mod relation;
pub use relation::{BelongsTo, HasMany};

mod schema;
pub use schema::Schema;

use crate::stmt;
