use docquery::{
    query::{QueryModel, QuerySourceId},
    stmt::{Expr, Type, Value},
    DefaultMemberAccessBindingVisitorFactory, MemberAccessBindingVisitorFactory,
    OperatorProvider, QuerySourceMapping,
};
use pretty_assertions::assert_eq;
use tests::{zoo, ZooTest};

const A: QuerySourceId = QuerySourceId(0);

#[test]
fn reference_key_reads_the_foreign_key() {
    let (_, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut mapping = QuerySourceMapping::new();
    mapping.insert(A, Expr::arg(0, zoo.model("Animal")));

    let animal = Expr::query_source(A, zoo.model("Animal"));
    let key = zoo.get(animal, "enclosure.id");

    let bound = DefaultMemberAccessBindingVisitorFactory
        .create(zoo.schema(), &mapping, false)
        .rewrite(key)
        .unwrap();

    assert_eq!(
        bound,
        Expr::member(
            Expr::arg(0, zoo.model("Animal")),
            zoo.field("Animal", "enclosure_id"),
            Type::String
        )
    );
}

#[test]
fn reference_key_is_kept_in_projections() {
    let (_, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut mapping = QuerySourceMapping::new();
    mapping.insert(A, Expr::arg(0, zoo.model("Animal")));

    let key = zoo.get(Expr::query_source(A, zoo.model("Animal")), "enclosure.id");

    let bound = DefaultMemberAccessBindingVisitorFactory
        .create(zoo.schema(), &mapping, true)
        .rewrite(key)
        .unwrap();

    let expected = zoo.get(Expr::arg(0, zoo.model("Animal")), "enclosure.id");
    assert_eq!(bound, expected);
}

#[test]
fn non_key_reads_of_a_reference_are_kept() {
    let (_, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut mapping = QuerySourceMapping::new();
    mapping.insert(A, Expr::arg(0, zoo.model("Animal")));

    let name = zoo.get(Expr::query_source(A, zoo.model("Animal")), "enclosure.name");

    let bound = DefaultMemberAccessBindingVisitorFactory
        .create(zoo.schema(), &mapping, false)
        .rewrite(name)
        .unwrap();

    let expected = zoo.get(Expr::arg(0, zoo.model("Animal")), "enclosure.name");
    assert_eq!(bound, expected);
}

#[test]
fn references_inside_lambdas_are_shifted() {
    let (_, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut mapping = QuerySourceMapping::new();
    mapping.insert(A, Expr::arg(0, zoo.model("Animal")));

    let animal = Expr::query_source(A, zoo.model("Animal"));
    let lambda = Expr::lambda(Type::Model(zoo.model("Employee")), animal);

    let bound = DefaultMemberAccessBindingVisitorFactory
        .create(zoo.schema(), &mapping, false)
        .rewrite(lambda)
        .unwrap();

    let Expr::Arg(arg) = &*bound.as_func().unwrap().body else {
        panic!("expected an argument; expr={bound:#?}");
    };
    assert_eq!(arg.position, 0);
    assert_eq!(arg.nesting, 1);
}

#[tokio::test]
async fn where_on_reference_key_needs_no_join() {
    let test = ZooTest::sync().await;
    let zoo = &test.zoo;

    let mut query = QueryModel::builder();
    let a = query.from("a", zoo.entities("Animal"));
    query.filter(Expr::eq(zoo.get(a.clone(), "enclosure.id"), "en3"));
    query.select(zoo.get(a, "name"));

    let query = query.build().unwrap();
    let compiled = test.db.compile(&query).unwrap();

    let enclosure = zoo.field("Animal", "enclosure");
    assert!(!compiled
        .expr
        .contains_expr(|expr| matches!(expr.as_member(), Some(member) if member.field == enclosure)));

    let names = test.all(&query).await;
    assert_eq!(names, [Value::from("Kelpie"), Value::from("Splash")]);
    assert_eq!(test.ops().len(), 1);
}
