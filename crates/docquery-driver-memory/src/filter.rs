use bson::{Bson, Document};

/// Returns `true` if `document` satisfies every condition of `filter`.
///
/// Conditions are either a plain value, compared for equality, or a
/// `{ "$in": [...] }` membership test. A missing field compares as `null`.
pub(crate) fn matches(filter: &Document, document: &Document) -> bool {
    filter.iter().all(|(key, condition)| {
        let value = document.get(key).unwrap_or(&Bson::Null);

        match condition {
            Bson::Document(operator) if operator.contains_key("$in") => {
                match operator.get("$in") {
                    Some(Bson::Array(candidates)) => candidates.contains(value),
                    _ => false,
                }
            }
            condition => condition == value,
        }
    })
}
