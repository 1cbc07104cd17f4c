use docquery_core::{
    schema::app::{Embedded, FieldTy, Model, ModelId},
    stmt::{Type, Value},
    Result, Schema,
};

use bson::{Bson, Document};

/// Builds the entity record of a document.
///
/// Documents of a hierarchy are materialized as the model named by their
/// stored discriminator. Referenced navigations start unset.
pub(super) fn entity(schema: &Schema, model: ModelId, document: &Document) -> Result<Value> {
    let model = resolve_subtype(schema, model, document)?;
    let mapping = schema.mapping_for(model.id);

    let mut fields = Vec::with_capacity(model.fields.len());

    for field in &model.fields {
        let Some(name) = mapping.field_name(field.id) else {
            fields.push(Value::Null);
            continue;
        };

        let value = match &field.ty {
            FieldTy::Primitive(ty) => primitive(document.get(name), ty),
            FieldTy::Discriminator => primitive(document.get(name), &Type::String),
            FieldTy::Embedded(embedded) => self::embedded(schema, embedded, document.get(name)),
            FieldTy::BelongsTo(_) | FieldTy::HasMany(_) => Ok(Value::Null),
        };

        fields.push(value.map_err(|err| {
            err.context(docquery_core::err!("field `{}.{}`", model.name, field.name))
        })?);
    }

    Ok(Value::record_from_vec(fields))
}

fn resolve_subtype<'a>(schema: &'a Schema, id: ModelId, document: &Document) -> Result<&'a Model> {
    let model = schema.model(id);

    if !model.is_polymorphic() {
        return Ok(model);
    }

    let discriminator = match document.get(docquery_core::schema::mapping::DISCRIMINATOR_FIELD) {
        Some(Bson::String(discriminator)) => discriminator,
        None | Some(Bson::Null) => return Ok(model),
        Some(other) => {
            return Err(docquery_core::Error::invalid_result(format!(
                "discriminator of `{}` is not a string: {other:?}",
                model.name
            )))
        }
    };

    schema
        .app
        .models()
        .find(|candidate| {
            candidate.discriminator.as_deref() == Some(discriminator.as_str())
                && schema.app.extends(candidate.id, id)
        })
        .ok_or_else(|| {
            docquery_core::Error::invalid_result(format!(
                "`{discriminator}` is not `{}` or one of its subtypes",
                model.name
            ))
        })
}

fn primitive(bson: Option<&Bson>, ty: &Type) -> Result<Value> {
    Ok(match (bson, ty) {
        (None | Some(Bson::Null), _) => Value::Null,
        (Some(Bson::Boolean(value)), Type::Bool) => Value::Bool(*value),
        (Some(Bson::Int32(value)), Type::I64) => Value::I64(i64::from(*value)),
        (Some(Bson::Int64(value)), Type::I64) => Value::I64(*value),
        (Some(Bson::String(value)), Type::String) => Value::String(value.clone()),
        (Some(Bson::ObjectId(oid)), Type::String) => Value::String(oid.to_hex()),
        (Some(Bson::Binary(binary)), Type::Bytes) => Value::Bytes(binary.bytes.clone()),
        (Some(Bson::Array(items)), Type::List(item)) => Value::List(
            items
                .iter()
                .map(|value| primitive(Some(value), item))
                .collect::<Result<_>>()?,
        ),
        (Some(bson), ty) => {
            return Err(docquery_core::Error::invalid_result(format!(
                "cannot read {bson} as {ty:?}"
            )))
        }
    })
}

fn embedded(schema: &Schema, embedded: &Embedded, bson: Option<&Bson>) -> Result<Value> {
    match (bson, embedded.many) {
        (None | Some(Bson::Null), _) => Ok(Value::Null),
        (Some(Bson::Document(document)), false) => entity(schema, embedded.target, document),
        (Some(Bson::Array(items)), true) => items
            .iter()
            .map(|item| match item {
                Bson::Document(document) => entity(schema, embedded.target, document),
                other => Err(docquery_core::Error::invalid_result(format!(
                    "expected an embedded document, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        (Some(other), _) => Err(docquery_core::Error::invalid_result(format!(
            "expected embedded {}, got {other}",
            if embedded.many { "documents" } else { "document" }
        ))),
    }
}
