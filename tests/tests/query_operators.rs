use docquery::{
    query::{QueryModel, ResultOperator},
    stmt::{Direction, Expr, Value},
    OperatorProvider,
};
use pretty_assertions::assert_eq;
use tests::ZooTest;

fn strings(values: &[Value]) -> Vec<&str> {
    values
        .iter()
        .map(|value| value.as_str().expect("expected a string"))
        .collect()
}

fn pair(lhs: &str, rhs: impl Into<Value>) -> Value {
    Value::record_from_vec(vec![lhs.into(), rhs.into()])
}

/// `from e in Employees order by e.age <direction> select e.first_name`
fn employee_names_by_age(test: &ZooTest, direction: Direction) -> docquery::query::Builder {
    let mut query = QueryModel::builder();
    let e = query.from("e", test.zoo.entities("Employee"));
    query.order_by(test.zoo.get(e.clone(), "age"), direction);
    query.select(test.zoo.get(e, "first_name"));
    query
}

#[tokio::test]
async fn where_filters_entities() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.filter(Expr::lt(zoo.get(e.clone(), "age"), 40_i64));
    query.select(zoo.get(e, "first_name"));

    let names = test.all(&query.build().unwrap()).await;
    assert_eq!(strings(&names), ["Taiga", "Ellie"]);
}

#[tokio::test]
async fn ordered_comparisons_with_missing_fields_are_false() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let a = query.from("a", zoo.entities("Animal"));
    query.filter(Expr::or(
        Expr::lt(zoo.get(a.clone(), "enclosure_id"), "en2"),
        Expr::ge(zoo.get(a.clone(), "enclosure_id"), "en2"),
    ));
    query.select(zoo.get(a, "name"));

    // The orphan has no enclosure id
    let names = test.all(&query.build().unwrap()).await;
    assert_eq!(strings(&names), ["Shere Khan", "Nanook", "Kelpie", "Splash"]);
}

#[tokio::test]
async fn order_by_descending() {
    let test = ZooTest::sync().await;

    let query = employee_names_by_age(&test, Direction::Desc).build().unwrap();

    let names = test.all(&query).await;
    assert_eq!(strings(&names), ["Alan", "Taiga", "Ellie"]);
}

#[tokio::test]
async fn order_by_secondary_key() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let a = query.from("a", zoo.entities("Animal"));
    query.filter(Expr::not(Expr::is_null(zoo.get(a.clone(), "enclosure_id"))));
    query.order_by(zoo.get(a.clone(), "enclosure_id"), Direction::Asc);
    query.order_by(zoo.get(a.clone(), "height"), Direction::Desc);
    query.select(zoo.get(a, "name"));

    let names = test.all(&query.build().unwrap()).await;
    assert_eq!(strings(&names), ["Shere Khan", "Nanook", "Splash", "Kelpie"]);
}

#[tokio::test]
async fn skip_and_take() {
    let test = ZooTest::sync().await;

    let mut query = employee_names_by_age(&test, Direction::Desc);
    query.result_operator(ResultOperator::Skip(1));
    query.result_operator(ResultOperator::Take(1));

    let names = test.all(&query.build().unwrap()).await;
    assert_eq!(strings(&names), ["Taiga"]);
}

#[tokio::test]
async fn element_operators() {
    let test = ZooTest::sync().await;

    let mut query = employee_names_by_age(&test, Direction::Asc);
    query.result_operator(ResultOperator::First);
    assert_eq!(test.one(&query.build().unwrap()).await, Value::from("Ellie"));

    let mut query = employee_names_by_age(&test, Direction::Asc);
    query.result_operator(ResultOperator::Skip(3));
    query.result_operator(ResultOperator::FirstOrDefault);
    assert_eq!(test.one(&query.build().unwrap()).await, Value::Null);

    let mut query = employee_names_by_age(&test, Direction::Asc);
    query.result_operator(ResultOperator::Skip(2));
    query.result_operator(ResultOperator::Single);
    assert_eq!(test.one(&query.build().unwrap()).await, Value::from("Alan"));

    let mut query = employee_names_by_age(&test, Direction::Asc);
    query.result_operator(ResultOperator::Skip(3));
    query.result_operator(ResultOperator::SingleOrDefault);
    assert_eq!(test.one(&query.build().unwrap()).await, Value::Null);
}

#[tokio::test]
async fn element_operator_errors() {
    let test = ZooTest::sync().await;

    let mut query = employee_names_by_age(&test, Direction::Asc);
    query.result_operator(ResultOperator::Skip(3));
    query.result_operator(ResultOperator::First);

    let err = test.try_all(&query.build().unwrap()).await.unwrap_err();
    assert!(err.is_record_not_found(), "{err}");

    let mut query = employee_names_by_age(&test, Direction::Asc);
    query.result_operator(ResultOperator::Single);

    let err = test.try_all(&query.build().unwrap()).await.unwrap_err();
    assert!(err.is_too_many_records(), "{err}");
}

#[tokio::test]
async fn any_count_and_distinct() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.filter(Expr::gt(zoo.get(e.clone(), "age"), 40_i64));
    query.select(e);
    query.result_operator(ResultOperator::Any);
    assert_eq!(test.one(&query.build().unwrap()).await, Value::Bool(true));

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.filter(Expr::gt(zoo.get(e.clone(), "age"), 50_i64));
    query.select(e);
    query.result_operator(ResultOperator::Any);
    assert_eq!(test.one(&query.build().unwrap()).await, Value::Bool(false));

    let mut query = QueryModel::builder();
    let a = query.from("a", zoo.entities("Animal"));
    query.select(a);
    query.result_operator(ResultOperator::Count);
    assert_eq!(test.one(&query.build().unwrap()).await, Value::I64(5));

    let mut query = QueryModel::builder();
    let a = query.from("a", zoo.entities("Animal"));
    query.filter(Expr::not(Expr::is_null(zoo.get(a.clone(), "enclosure_id"))));
    query.select(zoo.get(a, "enclosure_id"));
    query.result_operator(ResultOperator::Distinct);

    let ids = test.all(&query.build().unwrap()).await;
    assert_eq!(strings(&ids), ["en1", "en2", "en3"]);
}

#[tokio::test]
async fn all_tests_every_item() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    for (age, expected) in [(25_i64, true), (30_i64, false)] {
        let mut query = QueryModel::builder();
        let e = query.from("e", zoo.entities("Employee"));
        query.select(zoo.get(e.clone(), "first_name"));
        query.result_operator(ResultOperator::All(Expr::gt(zoo.get(e, "age"), age)));

        assert_eq!(
            test.one(&query.build().unwrap()).await,
            Value::Bool(expected)
        );
    }
}

#[tokio::test]
async fn group_by_key() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let a = query.from("a", zoo.entities("Animal"));
    query.select(a.clone());
    query.result_operator(ResultOperator::GroupBy {
        key: zoo.get(a.clone(), "enclosure_id"),
        element: zoo.get(a, "name"),
    });

    let groups = test.all(&query.build().unwrap()).await;

    assert_eq!(
        groups,
        [
            pair("en1", vec![Value::from("Shere Khan")]),
            pair("en2", vec![Value::from("Nanook")]),
            pair("en3", vec![Value::from("Kelpie"), Value::from("Splash")]),
            Value::record_from_vec(vec![Value::Null, vec![Value::from("Wanderer")].into()]),
        ]
    );
}

#[tokio::test]
async fn join_pairs_matching_items() {
    for provider in [OperatorProvider::Sync, OperatorProvider::Async] {
        let test = ZooTest::new(provider).await;
        let zoo = &test.zoo;

        let mut query = QueryModel::builder();
        let en = query.from("en", zoo.entities("Enclosure"));
        let a = query.join(
            "a",
            zoo.entities("Animal"),
            zoo.get(en.clone(), "id"),
            |a| zoo.get(a, "enclosure_id"),
        );
        query.select((zoo.get(en, "name"), zoo.get(a, "name")));

        let rows = test.all(&query.build().unwrap()).await;

        assert_eq!(
            rows,
            [
                pair("Big Cats", "Shere Khan"),
                pair("Arctic", "Nanook"),
                pair("Otter Pond", "Kelpie"),
                pair("Otter Pond", "Splash"),
            ],
            "provider={provider:?}"
        );
    }
}

#[tokio::test]
async fn group_join_collects_matches() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    let approved = query.group_join(
        "approved",
        zoo.entities("Enclosure"),
        zoo.get(e.clone(), "id"),
        |en| zoo.get(en, "weekly_schedule.approver_id"),
    );
    query.select((zoo.get(e, "first_name"), approved));

    let rows = test.all(&query.build().unwrap()).await;

    let approved: Vec<_> = rows
        .iter()
        .map(|row| {
            let row = row.expect_record();
            let names: Vec<_> = row[1]
                .expect_list()
                .iter()
                .map(|enclosure| zoo.read_str(enclosure, "Enclosure", "name").unwrap())
                .collect();
            (row[0].as_str().unwrap(), names)
        })
        .collect();

    assert_eq!(
        approved,
        [
            ("Taiga", vec!["Big Cats"]),
            ("Ellie", vec!["Arctic"]),
            ("Alan", vec![]),
        ]
    );
}

#[tokio::test]
async fn additional_from_flattens_embedded_collections() {
    for provider in [OperatorProvider::Sync, OperatorProvider::Async] {
        let test = ZooTest::new(provider).await;
        let zoo = &test.zoo;

        let mut query = QueryModel::builder();
        let e = query.from("e", zoo.entities("Employee"));
        let s = query.additional_from("s", zoo.get(e.clone(), "specialties"));
        query.filter(Expr::ne(zoo.get(s.clone(), "animal_type"), "Otter"));
        query.select((zoo.get(e, "first_name"), zoo.get(s, "task")));

        let rows = test.all(&query.build().unwrap()).await;

        assert_eq!(
            rows,
            [pair("Taiga", "Feeding"), pair("Taiga", "Training")],
            "provider={provider:?}"
        );
    }
}
