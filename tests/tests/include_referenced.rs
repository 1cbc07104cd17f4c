use docquery::{
    query::{QueryModel, ResultOperator},
    stmt::{AssignSource, Expr, Value},
    OperatorProvider,
};
use pretty_assertions::assert_eq;
use tests::ZooTest;

fn enclosures_with(test: &ZooTest, path: &str) -> QueryModel {
    let mut query = QueryModel::builder();
    let en = query.from("en", test.zoo.entities("Enclosure"));
    query.select(en);
    query.result_operator(ResultOperator::Include(test.zoo.path("Enclosure", path)));
    query.build().unwrap()
}

fn assignees(test: &ZooTest, enclosure: &Value) -> Vec<Option<String>> {
    test.zoo
        .read(enclosure, "Enclosure", "weekly_schedule.assignments")
        .expect_list()
        .iter()
        .map(|assignment| {
            match test.zoo.read(assignment, "ZooAssignment", "assignee") {
                Value::Null => None,
                employee => test
                    .zoo
                    .read_str(employee, "Employee", "first_name")
                    .map(str::to_string),
            }
        })
        .collect()
}

#[tokio::test]
async fn include_reference_of_embedded_documents_joins_employees() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let query = enclosures_with(&test, "weekly_schedule.assignments.assignee");
    let compiled = test.db.compile(&query).unwrap();

    let mut joins = vec![];
    compiled.expr.contains_expr(|expr| {
        if let Expr::Assign(assign) = expr {
            joins.push(assign.clone());
        }
        false
    });

    assert_eq!(joins.len(), 1);
    let assign = &joins[0];
    assert_eq!(assign.path, zoo.path("Enclosure", "weekly_schedule.assignments"));
    assert_eq!(assign.navigation, zoo.field("ZooAssignment", "assignee"));

    let AssignSource::Join(join) = &assign.source else {
        panic!("expected a join; assign={assign:#?}");
    };

    let employees = zoo.schema().scan(zoo.model("Employee")).unwrap();
    assert_eq!(*join.inner, Expr::Scan(employees));
    assert_eq!(join.outer_key, zoo.field("ZooAssignment", "assignee_id"));
    assert_eq!(join.inner_key, zoo.field("Employee", "id"));
    assert!(!join.many);
}

#[tokio::test]
async fn include_reference_assigns_matches_only() {
    let test = ZooTest::sync().await;

    let query = enclosures_with(&test, "weekly_schedule.assignments.assignee");
    let enclosures = test.all(&query).await;

    let collections: Vec<_> = test
        .ops()
        .iter()
        .map(|op| op.operation.collection().to_string())
        .collect();
    assert_eq!(collections, ["enclosures", "employees"]);

    assert_eq!(
        assignees(&test, &enclosures[0]),
        [Some("Taiga".to_string()), Some("Ellie".to_string())]
    );

    // An id without a matching employee is left unset
    assert_eq!(assignees(&test, &enclosures[1]), [None]);

    // So is a missing id
    assert_eq!(assignees(&test, &enclosures[2]), [None]);
}

#[tokio::test]
async fn include_reference_over_async_pipeline() {
    let test = ZooTest::new(OperatorProvider::Async).await;

    let query = enclosures_with(&test, "weekly_schedule.assignments.assignee");
    let enclosures = test.all(&query).await;

    assert_eq!(enclosures.len(), 3);
    assert_eq!(
        assignees(&test, &enclosures[0]),
        [Some("Taiga".to_string()), Some("Ellie".to_string())]
    );
    assert_eq!(assignees(&test, &enclosures[1]), [None]);
}

#[tokio::test]
async fn include_back_reference_then_join() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let query = enclosures_with(&test, "animals.enclosure");
    let enclosures = test.all(&query).await;

    for enclosure in &enclosures {
        for animal in zoo.read(enclosure, "Enclosure", "animals").expect_list() {
            assert_eq!(
                zoo.read_str(animal, "Animal", "enclosure.id"),
                zoo.read_str(animal, "Animal", "enclosure_id")
            );
        }
    }
}

#[tokio::test]
async fn include_has_many() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let enclosures = test.all(&enclosures_with(&test, "residents")).await;

    let residents: Vec<Vec<&str>> = enclosures
        .iter()
        .map(|enclosure| {
            zoo.read(enclosure, "Enclosure", "residents")
                .expect_list()
                .iter()
                .map(|animal| zoo.read_str(animal, "Animal", "name").unwrap())
                .collect()
        })
        .collect();

    assert_eq!(
        residents,
        [
            vec!["Shere Khan"],
            vec!["Nanook"],
            vec!["Kelpie", "Splash"]
        ]
    );
}

#[tokio::test]
async fn select_reference_of_the_source() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let a = query.from("a", zoo.entities("Animal"));
    query.select(zoo.get(a, "enclosure"));

    let enclosures = test.all(&query.build().unwrap()).await;

    let names: Vec<_> = enclosures
        .iter()
        .map(|enclosure| match enclosure {
            Value::Null => None,
            enclosure => zoo.read_str(enclosure, "Enclosure", "name"),
        })
        .collect();

    assert_eq!(
        names,
        [
            Some("Big Cats"),
            Some("Arctic"),
            Some("Otter Pond"),
            Some("Otter Pond"),
            None
        ]
    );
}

#[tokio::test]
async fn select_reference_owned_by_an_embedded_document() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let en = query.from("en", zoo.entities("Enclosure"));
    query.select((
        zoo.get(en.clone(), "name"),
        zoo.get(en, "weekly_schedule.approver.first_name"),
    ));

    let rows = test.all(&query.build().unwrap()).await;

    assert_eq!(
        rows,
        [
            Value::record_from_vec(vec!["Big Cats".into(), "Taiga".into()]),
            Value::record_from_vec(vec!["Arctic".into(), "Ellie".into()]),
            Value::record_from_vec(vec!["Otter Pond".into(), Value::Null]),
        ]
    );
}

#[tokio::test]
async fn select_has_many_of_the_source() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let en = query.from("en", zoo.entities("Enclosure"));
    query.select(zoo.get(en, "residents"));

    let residents = test.all(&query.build().unwrap()).await;

    let counts: Vec<_> = residents
        .iter()
        .map(|animals| animals.expect_list().len())
        .collect();
    assert_eq!(counts, [1, 1, 2]);
}

#[tokio::test]
async fn include_reference_of_grouped_entities() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let a = query.from("a", zoo.entities("Animal"));
    query.select(a.clone());
    query.result_operator(ResultOperator::Include(zoo.path("Animal", "enclosure")));
    query.result_operator(ResultOperator::GroupBy {
        key: zoo.get(a.clone(), "enclosure_id"),
        element: a,
    });

    let query = query.build().unwrap();

    let compiled = test.db.compile(&query).unwrap();
    assert!(compiled.expr.contains_expr(Expr::is_assign));

    let groups = test.all(&query).await;

    let enclosures: Vec<Vec<Option<&str>>> = groups
        .iter()
        .map(|group| {
            group.expect_record()[1]
                .expect_list()
                .iter()
                .map(|animal| match zoo.read(animal, "Animal", "enclosure") {
                    Value::Null => None,
                    enclosure => zoo.read_str(enclosure, "Enclosure", "name"),
                })
                .collect()
        })
        .collect();

    assert_eq!(
        enclosures,
        [
            vec![Some("Big Cats")],
            vec![Some("Arctic")],
            vec![Some("Otter Pond"), Some("Otter Pond")],
            vec![None],
        ]
    );
}
