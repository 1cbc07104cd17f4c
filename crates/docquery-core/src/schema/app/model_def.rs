use crate::stmt;

/// Declares a model to register with the schema builder.
///
/// # Examples
///
/// ```
/// use docquery_core::schema::app::ModelDef;
/// use docquery_core::stmt::Type;
///
/// let employee = ModelDef::new("Employee")
///     .key("id", Type::String)
///     .field("first_name", Type::String)
///     .embeds_many("specialties", "Specialty");
///
/// let specialty = ModelDef::embedded("Specialty").field("task", Type::String);
/// # let _ = (employee, specialty);
/// ```
#[derive(Debug, Clone)]
pub struct ModelDef {
    pub(crate) name: String,
    pub(crate) parent: Option<String>,
    pub(crate) embedded: bool,
    pub(crate) collection: Option<String>,
    pub(crate) fields: Vec<FieldDef>,
}

#[derive(Debug, Clone)]
pub(crate) struct FieldDef {
    pub(crate) name: String,
    pub(crate) primary_key: bool,
    pub(crate) ty: FieldDefTy,
}

#[derive(Debug, Clone)]
pub(crate) enum FieldDefTy {
    Primitive(stmt::Type),
    Embedded { target: String, many: bool },
    BelongsTo { target: String, foreign_key: String },
    HasMany { target: String, foreign_key: String },
}

impl ModelDef {
    /// A model stored in its own collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            embedded: false,
            collection: None,
            fields: vec![],
        }
    }

    /// A model only stored inside other documents.
    pub fn embedded(name: impl Into<String>) -> Self {
        Self {
            embedded: true,
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares this model a subtype of `parent`. Subtypes share the
    /// collection of their hierarchy root and inherit its fields.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Overrides the collection name derived from the model name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }

    /// Declares the primary key, stored as the document `_id`.
    pub fn key(self, name: impl Into<String>, ty: stmt::Type) -> Self {
        self.push(name, true, FieldDefTy::Primitive(ty))
    }

    pub fn field(self, name: impl Into<String>, ty: stmt::Type) -> Self {
        self.push(name, false, FieldDefTy::Primitive(ty))
    }

    pub fn embeds_one(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        self.push(name, false, FieldDefTy::Embedded { target, many: false })
    }

    pub fn embeds_many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        self.push(name, false, FieldDefTy::Embedded { target, many: true })
    }

    /// A navigation to `target` through the foreign key field `foreign_key`
    /// of this model.
    pub fn belongs_to(
        self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        let ty = FieldDefTy::BelongsTo {
            target: target.into(),
            foreign_key: foreign_key.into(),
        };
        self.push(name, false, ty)
    }

    /// A navigation to the `target` entities whose `foreign_key` field holds
    /// this model's primary key.
    pub fn has_many(
        self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        let ty = FieldDefTy::HasMany {
            target: target.into(),
            foreign_key: foreign_key.into(),
        };
        self.push(name, false, ty)
    }

    fn push(mut self, name: impl Into<String>, primary_key: bool, ty: FieldDefTy) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            primary_key,
            ty,
        });
        self
    }
}
