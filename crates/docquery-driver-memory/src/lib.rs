mod filter;

use docquery_core::{
    async_trait,
    driver::{
        operation::{Delete, Find, Insert, Operation, Update},
        Driver, Response,
    },
    Result,
};

use bson::{oid::ObjectId, Document};
use std::{collections::HashMap, sync::Mutex};

/// A document store keeping every collection in memory.
#[derive(Debug, Default)]
pub struct Memory {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    fn collections(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<Document>>>> {
        self.collections
            .lock()
            .map_err(|_| docquery_core::err!("in-memory store lock poisoned"))
    }

    fn find(&self, op: Find) -> Result<Response> {
        let collections = self.collections()?;

        let documents = collections
            .get(&op.collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| filter::matches(&op.filter, document))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(Response::documents(documents))
    }

    fn insert(&self, op: Insert) -> Result<Response> {
        let mut collections = self.collections()?;
        let collection = collections.entry(op.collection).or_default();
        let count = op.documents.len() as u64;

        for mut document in op.documents {
            if !document.contains_key("_id") {
                document.insert("_id", ObjectId::new());
            }

            collection.push(document);
        }

        Ok(Response::count(count))
    }

    fn update(&self, op: Update) -> Result<Response> {
        let mut collections = self.collections()?;
        let mut count = 0;

        if let Some(documents) = collections.get_mut(&op.collection) {
            for document in documents
                .iter_mut()
                .filter(|document| filter::matches(&op.filter, document))
            {
                for (key, value) in &op.set {
                    document.insert(key.clone(), value.clone());
                }

                count += 1;
            }
        }

        Ok(Response::count(count))
    }

    fn delete(&self, op: Delete) -> Result<Response> {
        let mut collections = self.collections()?;

        let Some(documents) = collections.get_mut(&op.collection) else {
            return Ok(Response::count(0));
        };

        let before = documents.len();
        documents.retain(|document| !filter::matches(&op.filter, document));

        Ok(Response::count((before - documents.len()) as u64))
    }
}

#[async_trait]
impl Driver for Memory {
    async fn exec(&self, op: Operation) -> Result<Response> {
        tracing::trace!(collection = op.collection(), ?op, "executing operation");

        match op {
            Operation::Delete(op) => self.delete(op),
            Operation::Find(op) => self.find(op),
            Operation::Insert(op) => self.insert(op),
            Operation::Update(op) => self.update(op),
        }
    }
}
