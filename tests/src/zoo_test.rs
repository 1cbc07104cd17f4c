use crate::{
    logging_driver::{DriverOp, LoggingDriver},
    zoo::{self, Zoo},
};
use docquery::{query::QueryModel, stmt::Value, Db, OperatorProvider, Result};
use docquery_driver_memory::Memory;
use std::sync::{Arc, Mutex};

/// A seeded zoo database whose driver operations are logged.
pub struct ZooTest {
    pub db: Db,
    pub zoo: Zoo,
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl ZooTest {
    pub async fn new(provider: OperatorProvider) -> ZooTest {
        let mut builder = zoo::builder();
        builder.operator_provider(provider);
        ZooTest::with_builder(&mut builder).await
    }

    pub async fn sync() -> ZooTest {
        ZooTest::new(OperatorProvider::Sync).await
    }

    pub async fn with_builder(builder: &mut docquery::db::Builder) -> ZooTest {
        crate::init_tracing();

        let driver = LoggingDriver::new(Memory::new());
        let ops_log = driver.ops_log_handle();

        let db = builder.build(driver).await.unwrap();
        let zoo = Zoo::new(db.schema().clone());

        zoo::seed(&db, &zoo).await.unwrap();

        let test = ZooTest { db, zoo, ops_log };
        test.clear_ops();
        test
    }

    /// Driver operations executed since the last clear.
    pub fn ops(&self) -> Vec<DriverOp> {
        self.ops_log.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.ops_log.lock().unwrap().clear();
    }

    /// Runs a query and collects every value it yields.
    pub async fn try_all(&self, query: &QueryModel) -> Result<Vec<Value>> {
        self.db.query(query).await?.collect().await
    }

    pub async fn all(&self, query: &QueryModel) -> Vec<Value> {
        self.try_all(query).await.unwrap()
    }

    /// Runs a query producing a single value.
    pub async fn one(&self, query: &QueryModel) -> Value {
        let mut values = self.all(query).await;
        assert_eq!(values.len(), 1, "values={values:#?}");
        values.remove(0)
    }
}
