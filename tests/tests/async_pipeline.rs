use docquery::{
    query::{QueryModel, ResultOperator},
    stmt::Value,
    OperatorProvider,
};
use pretty_assertions::assert_eq;
use tests::ZooTest;

fn employees(test: &ZooTest) -> QueryModel {
    let mut query = QueryModel::builder();
    let e = query.from("e", test.zoo.entities("Employee"));
    query.select(test.zoo.get(e, "first_name"));
    query.build().unwrap()
}

#[tokio::test]
async fn async_results_are_pulled_lazily() {
    let test = ZooTest::new(OperatorProvider::Async).await;

    let mut stream = test.db.query(&employees(&test)).await.unwrap();

    assert!(!stream.is_buffered());
    assert!(test.ops().is_empty());

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first, Value::from("Taiga"));
    assert_eq!(test.ops().len(), 1);

    let rest = stream.collect().await.unwrap();
    assert_eq!(rest, [Value::from("Ellie"), Value::from("Alan")]);

    // The collection is read once per execution
    assert_eq!(test.ops().len(), 1);
}

#[tokio::test]
async fn sync_results_are_buffered() {
    let test = ZooTest::sync().await;

    let stream = test.db.query(&employees(&test)).await.unwrap();

    assert!(stream.is_buffered());
    assert_eq!(test.ops().len(), 1);

    let names = stream.collect().await.unwrap();
    assert_eq!(names.len(), 3);
}

#[tokio::test]
async fn dropped_async_results_never_reach_the_store() {
    let test = ZooTest::new(OperatorProvider::Async).await;

    let stream = test.db.query(&employees(&test)).await.unwrap();
    drop(stream);

    assert!(test.ops().is_empty());
}

#[tokio::test]
async fn async_failures_surface_while_pulling() {
    let test = ZooTest::new(OperatorProvider::Async).await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let en = query.from("en", zoo.entities("Enclosure"));
    query.select(en);
    query.result_operator(ResultOperator::Include(zoo.path("Enclosure", "name")));

    let stream = test.db.query(&query.build().unwrap()).await.unwrap();

    let err = stream.collect().await.unwrap_err();
    assert!(err.is_unsupported_feature(), "{err}");
}

#[tokio::test]
async fn async_scalar_results_yield_one_value() {
    let test = ZooTest::new(OperatorProvider::Async).await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select(e);
    query.result_operator(ResultOperator::Count);

    let compiled = test.db.compile(&query.build().unwrap()).unwrap();
    assert!(!compiled.is_sequence());

    let values = test.db.exec(&compiled).await.unwrap().collect().await.unwrap();
    assert_eq!(values, [Value::I64(3)]);
}
