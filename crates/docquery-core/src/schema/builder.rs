use super::{
    app::{self, FieldDef, FieldDefTy, ModelDef},
    mapping, Mapping, Schema,
};
use crate::Result;

use heck::ToSnakeCase;
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct Builder {
    /// If set, prefix all collection names with this string
    collection_name_prefix: Option<String>,
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    /// Build options
    builder: &'a Builder,

    /// Definitions, indexed by model id
    defs: &'a [ModelDef],

    /// Maps model names to identifiers. Identifiers are reserved before the
    /// models are built so relations can point forward.
    model_lookup: IndexMap<&'a str, app::ModelId>,

    /// Parent of each model, by model id
    parents: Vec<Option<app::ModelId>>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.collection_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn build(&self, defs: &[ModelDef]) -> Result<Schema> {
        let mut builder = BuildSchema {
            builder: self,
            defs,
            model_lookup: IndexMap::new(),
            parents: vec![],
        };

        builder.reserve_ids()?;
        builder.resolve_parents()?;

        let mut app = app::Schema::default();

        for (index, def) in defs.iter().enumerate() {
            let model = builder.build_model(app::ModelId(index), def)?;
            app.models.insert(model.id, model);
        }

        builder.link_children(&mut app);
        builder.resolve_pairs(&mut app);
        builder.verify(&app)?;

        let mapping = builder.build_mapping(&app);

        Ok(Schema { app, mapping })
    }
}

impl<'a> BuildSchema<'a> {
    fn reserve_ids(&mut self) -> Result<()> {
        let defs = self.defs;

        for (index, def) in defs.iter().enumerate() {
            let prev = self.model_lookup.insert(def.name.as_str(), app::ModelId(index));

            if prev.is_some() {
                return Err(crate::Error::invalid_schema(format!(
                    "duplicate model name `{}`",
                    def.name
                )));
            }
        }

        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<app::ModelId> {
        self.model_lookup.get(name).copied().ok_or_else(|| {
            crate::Error::invalid_schema(format!("unknown model `{name}`"))
        })
    }

    fn resolve_parents(&mut self) -> Result<()> {
        let defs = self.defs;

        for def in defs {
            let parent = match &def.parent {
                Some(name) => Some(self.lookup(name)?),
                None => None,
            };
            self.parents.push(parent);
        }

        // Every chain of parents must end at a root
        for (index, def) in self.defs.iter().enumerate() {
            let mut current = self.parents[index];
            let mut steps = 0;

            while let Some(parent) = current {
                steps += 1;

                if parent.0 == index || steps > self.defs.len() {
                    return Err(crate::Error::invalid_schema(format!(
                        "model `{}` extends itself",
                        def.name
                    )));
                }

                if self.defs[parent.0].embedded != def.embedded {
                    return Err(crate::Error::invalid_schema(format!(
                        "model `{}` and its parent `{}` must both be embedded or not",
                        def.name, self.defs[parent.0].name
                    )));
                }

                current = self.parents[parent.0];
            }
        }

        Ok(())
    }

    /// Returns the definitions whose fields make up the model, root first.
    fn lineage(&self, id: app::ModelId) -> Vec<&'a ModelDef> {
        let mut ret = vec![];
        let mut current = Some(id);

        while let Some(id) = current {
            ret.push(&self.defs[id.0]);
            current = self.parents[id.0];
        }

        ret.reverse();
        ret
    }

    fn is_hierarchy_member(&self, id: app::ModelId) -> bool {
        self.parents[id.0].is_some() || self.parents.iter().any(|parent| *parent == Some(id))
    }

    /// Flattened field layout of a model: inherited fields first. The
    /// hierarchy root stores the discriminator after its own fields, so
    /// every member reads it at the same index.
    fn layout(&self, id: app::ModelId) -> Vec<(&'a str, Option<&'a FieldDef>)> {
        let polymorphic = self.is_hierarchy_member(id);
        let mut layout = vec![];

        for (depth, def) in self.lineage(id).into_iter().enumerate() {
            for field_def in &def.fields {
                layout.push((field_def.name.as_str(), Some(field_def)));
            }

            if depth == 0 && polymorphic {
                layout.push((mapping::DISCRIMINATOR_FIELD, None));
            }
        }

        layout
    }

    fn build_model(&self, id: app::ModelId, def: &ModelDef) -> Result<app::Model> {
        let layout = self.layout(id);
        let mut fields: Vec<app::Field> = vec![];
        let mut primary_key = None;

        for (index, (name, field_def)) in layout.iter().enumerate() {
            if fields.iter().any(|field| field.name == *name) {
                return Err(crate::Error::invalid_schema(format!(
                    "duplicate field `{name}` on model `{}`",
                    def.name
                )));
            }

            let field_id = id.field(index);

            let (ty, is_pk) = match field_def {
                Some(field_def) => (
                    self.build_field_ty(id, &layout, field_def)?,
                    field_def.primary_key,
                ),
                None => (app::FieldTy::Discriminator, false),
            };

            if is_pk {
                if primary_key.is_some() {
                    return Err(crate::Error::invalid_schema(format!(
                        "model `{}` declares more than one primary key",
                        def.name
                    )));
                }

                primary_key = Some(field_id);
            }

            fields.push(app::Field {
                id: field_id,
                name: name.to_string(),
                ty,
                primary_key: is_pk,
            });
        }

        Ok(app::Model {
            id,
            name: def.name.clone(),
            fields,
            parent: self.parents[id.0],
            children: vec![],
            discriminator: self.is_hierarchy_member(id).then(|| def.name.clone()),
            primary_key,
            embedded: def.embedded,
        })
    }

    fn build_field_ty(
        &self,
        id: app::ModelId,
        layout: &[(&str, Option<&FieldDef>)],
        field_def: &FieldDef,
    ) -> Result<app::FieldTy> {
        Ok(match &field_def.ty {
            FieldDefTy::Primitive(ty) => app::FieldTy::Primitive(ty.clone()),
            FieldDefTy::Embedded { target, many } => {
                // Any model may be embedded. Models with their own
                // collection are stored as denormalized copies.
                app::FieldTy::Embedded(app::Embedded {
                    target: self.lookup(target)?,
                    many: *many,
                    pair: None,
                })
            }
            FieldDefTy::BelongsTo {
                target,
                foreign_key,
            } => {
                let Some(index) = position(layout, foreign_key) else {
                    return Err(crate::Error::invalid_schema(format!(
                        "foreign key `{foreign_key}` of `{}` not found",
                        field_def.name
                    )));
                };

                app::FieldTy::BelongsTo(app::BelongsTo {
                    target: self.lookup(target)?,
                    foreign_key: id.field(index),
                })
            }
            FieldDefTy::HasMany {
                target,
                foreign_key,
            } => {
                let target = self.lookup(target)?;

                let Some(index) = position(&self.layout(target), foreign_key) else {
                    return Err(crate::Error::invalid_schema(format!(
                        "foreign key `{foreign_key}` of `{}` not found on `{}`",
                        field_def.name, self.defs[target.0].name
                    )));
                };

                app::FieldTy::HasMany(app::HasMany {
                    target,
                    foreign_key: target.field(index),
                })
            }
        })
    }

    fn link_children(&self, app: &mut app::Schema) {
        for (index, parent) in self.parents.iter().enumerate() {
            let Some(parent) = parent else { continue };

            if let Some(model) = app.models.get_mut(parent) {
                model.children.push(app::ModelId(index));
            }
        }
    }

    /// An embedded target's first `BelongsTo` navigation pointing back at
    /// the embedding model is populated from the in-memory parent.
    fn resolve_pairs(&self, app: &mut app::Schema) {
        let mut pairs = vec![];

        for model in app.models() {
            for field in &model.fields {
                let Some(embedded) = field.ty.as_embedded() else {
                    continue;
                };

                let pair = app
                    .model(embedded.target)
                    .fields
                    .iter()
                    .find(|target_field| {
                        target_field
                            .ty
                            .as_belongs_to()
                            .is_some_and(|rel| app.extends(model.id, rel.target))
                    })
                    .map(|target_field| target_field.id);

                pairs.push((field.id, pair));
            }
        }

        for (field_id, pair) in pairs {
            let Some(model) = app.models.get_mut(&field_id.model) else {
                continue;
            };

            if let app::FieldTy::Embedded(embedded) = &mut model.fields[field_id.index].ty {
                embedded.pair = pair;
            }
        }
    }

    fn verify(&self, app: &app::Schema) -> Result<()> {
        for model in app.models() {
            if !model.embedded && model.primary_key.is_none() {
                return Err(crate::Error::invalid_schema(format!(
                    "model `{}` has no primary key",
                    model.name
                )));
            }

            for field in &model.fields {
                let target = match &field.ty {
                    app::FieldTy::BelongsTo(rel) => rel.target,
                    app::FieldTy::HasMany(rel) => rel.target,
                    _ => continue,
                };

                if app.model(target).primary_key.is_none() {
                    return Err(crate::Error::invalid_schema(format!(
                        "relation `{}.{}` targets `{}`, which has no primary key",
                        model.name,
                        field.name,
                        app.model(target).name
                    )));
                }
            }
        }

        Ok(())
    }

    fn build_mapping(&self, app: &app::Schema) -> Mapping {
        let mut mapping = Mapping::default();

        for model in app.models() {
            let collection = match model.embedded {
                true => None,
                false => Some(self.collection_name(app, model.id)),
            };

            let fields = model
                .fields
                .iter()
                .map(|field| match &field.ty {
                    _ if field.primary_key => Some(mapping::ID_FIELD.to_string()),
                    app::FieldTy::Discriminator => Some(mapping::DISCRIMINATOR_FIELD.to_string()),
                    app::FieldTy::Primitive(_) | app::FieldTy::Embedded(_) => {
                        Some(field.name.clone())
                    }
                    app::FieldTy::BelongsTo(_) | app::FieldTy::HasMany(_) => None,
                })
                .collect();

            mapping.models.insert(
                model.id,
                mapping::Model {
                    id: model.id,
                    collection,
                    fields,
                },
            );
        }

        mapping
    }

    /// Subtypes share the collection of the hierarchy root.
    fn collection_name(&self, app: &app::Schema, id: app::ModelId) -> String {
        let root = &self.defs[app.root(id).0];

        let name = match &root.collection {
            Some(name) => name.clone(),
            None => pluralizer::pluralize(&root.name.to_snake_case(), 2, false),
        };

        match &self.builder.collection_name_prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name,
        }
    }
}

fn position(layout: &[(&str, Option<&FieldDef>)], name: &str) -> Option<usize> {
    layout.iter().position(|(field, _)| *field == name)
}
