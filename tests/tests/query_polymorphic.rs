use bson::doc;
use docquery::{
    query::{QueryModel, ResultOperator},
    stmt::{Expr, Method, Type, Value},
    OperatorProvider,
};
use pretty_assertions::assert_eq;
use tests::ZooTest;

fn names(test: &ZooTest, animals: &[Value]) -> Vec<String> {
    animals
        .iter()
        .map(|animal| {
            test.zoo
                .read_str(animal, "Animal", "name")
                .unwrap()
                .to_string()
        })
        .collect()
}

fn animals_of_type(test: &ZooTest, model: &str) -> QueryModel {
    let mut query = QueryModel::builder();
    let a = query.from("a", test.zoo.entities("Animal"));
    query.select(a);
    query.result_operator(ResultOperator::OfType(test.zoo.model(model)));
    query.build().unwrap()
}

#[tokio::test]
async fn of_type_filters_on_the_discriminator() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let query = animals_of_type(&test, "Otter");
    let compiled = test.db.compile(&query).unwrap();

    let Expr::Cast(cast) = &compiled.expr else {
        panic!("expected a cast; expr={:#?}", compiled.expr);
    };
    assert_eq!(cast.ty, Type::list(zoo.model("Otter")));

    let filter = cast.expr.as_call().unwrap();
    assert_eq!(filter.method, Method::Where);

    let Expr::InList(in_list) = &*filter.args[1].as_func().unwrap().body else {
        panic!("expected a discriminator test; expr={:#?}", compiled.expr);
    };
    assert_eq!(
        *in_list.list,
        Expr::list(["Otter", "SeaOtter", "EurasianOtter"])
    );

    let otters = test.all(&query).await;
    assert_eq!(names(&test, &otters), ["Kelpie", "Splash"]);
}

#[tokio::test]
async fn of_type_materializes_subtype_fields() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let tigers = test.all(&animals_of_type(&test, "Tiger")).await;

    let stripes: Vec<_> = tigers
        .iter()
        .map(|tiger| zoo.read(tiger, "Tiger", "stripes").clone())
        .collect();
    assert_eq!(stripes, [Value::I64(120), Value::I64(95)]);
}

#[tokio::test]
async fn of_type_of_the_source_model_is_a_no_op() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let compiled = test.db.compile(&animals_of_type(&test, "Animal")).unwrap();

    let scan = zoo.schema().scan(zoo.model("Animal")).unwrap();
    assert_eq!(compiled.expr, Expr::Scan(scan));
}

#[tokio::test]
async fn of_type_after_where() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let a = query.from("a", zoo.entities("Animal"));
    query.filter(Expr::gt(zoo.get(a.clone(), "height"), 100_i64));
    query.select(a);
    query.result_operator(ResultOperator::OfType(zoo.model("Tiger")));

    let tigers = test.all(&query.build().unwrap()).await;
    assert_eq!(names(&test, &tigers), ["Shere Khan", "Wanderer"]);
}

#[tokio::test]
async fn of_type_then_count_over_async_pipeline() {
    let test = ZooTest::new(OperatorProvider::Async).await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let a = query.from("a", zoo.entities("Animal"));
    query.select(a);
    query.result_operator(ResultOperator::OfType(zoo.model("Otter")));
    query.result_operator(ResultOperator::Count);

    let count = test.one(&query.build().unwrap()).await;
    assert_eq!(count, Value::I64(2));
}

#[tokio::test]
async fn subtype_source_reads_its_discriminators_only() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let o = query.from("o", zoo.entities("Otter"));
    query.select(o);

    let otters = test.all(&query.build().unwrap()).await;
    assert_eq!(names(&test, &otters), ["Kelpie", "Splash"]);

    let ops = test.ops();
    assert_eq!(ops.len(), 1);

    let find = ops[0].operation.as_find().unwrap();
    assert_eq!(find.collection, "animals");
    assert_eq!(
        find.filter,
        doc! { "_t": { "$in": ["Otter", "SeaOtter", "EurasianOtter"] } }
    );
}

#[tokio::test]
async fn root_source_reads_every_document() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let a = query.from("a", zoo.entities("Animal"));
    query.select(a);

    let animals = test.all(&query.build().unwrap()).await;
    assert_eq!(animals.len(), 5);

    let find = test.ops()[0].operation.as_find().unwrap().clone();
    assert!(find.filter.is_empty());
}
