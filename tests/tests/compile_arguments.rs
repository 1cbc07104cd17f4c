use docquery::{
    query::{QueryModel, QuerySourceId, ResultOperator},
    stmt::{Expr, Type},
    DefaultCompensatorFactory, DefaultEntityQueryableVisitorFactory,
    DefaultMemberAccessBindingVisitorFactory, DefaultProjectionVisitorFactory, Dependencies,
    OperatorProvider, Translation,
};
use tests::zoo;

#[test]
fn dependencies_require_every_collaborator() {
    let err = Dependencies::builder().build().unwrap_err();
    assert!(err.is_invalid_argument());

    let err = Dependencies::builder()
        .entity_queryable_visitor_factory(DefaultEntityQueryableVisitorFactory)
        .member_access_binding_visitor_factory(DefaultMemberAccessBindingVisitorFactory)
        .projection_visitor_factory(DefaultProjectionVisitorFactory)
        .operator_provider(OperatorProvider::Sync)
        .build()
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("compensator"), "{err}");

    let err = Dependencies::builder()
        .entity_queryable_visitor_factory(DefaultEntityQueryableVisitorFactory)
        .member_access_binding_visitor_factory(DefaultMemberAccessBindingVisitorFactory)
        .projection_visitor_factory(DefaultProjectionVisitorFactory)
        .compensator_factory(DefaultCompensatorFactory)
        .build()
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("operator provider"), "{err}");
}

#[test]
fn dependencies_with_defaults_keep_the_provider() {
    let dependencies = Dependencies::builder()
        .operator_provider(OperatorProvider::Async)
        .with_defaults()
        .build()
        .unwrap();

    assert_eq!(dependencies.operator_provider(), OperatorProvider::Async);
}

#[test]
fn query_model_requires_a_main_from_clause() {
    let mut query = QueryModel::builder();
    query.select(Expr::from(1_i64));

    let err = query.build().unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn query_model_requires_a_select_clause() {
    let (_, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    query.from("e", zoo.entities("Employee"));

    let err = query.build().unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn query_model_rejects_a_second_main_from_clause() {
    let (_, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.from("a", zoo.entities("Animal"));
    query.select(e);

    let err = query.build().unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn query_model_rejects_an_empty_include_path() {
    let (_, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select(e);
    query.result_operator(ResultOperator::Include(vec![]));

    let err = query.build().unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn unknown_source_reference_is_rejected() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    query.from("e", zoo.entities("Employee"));

    let unknown = Expr::query_source(QuerySourceId(7), zoo.model("Employee"));
    query.select(zoo.get(unknown, "first_name"));

    let err = compiler.compile(&query.build().unwrap()).unwrap_err();
    assert!(err.is_invalid_statement());
}

#[test]
fn embedded_models_cannot_be_queried_directly() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let s = query.from("s", zoo.entities("Specialty"));
    query.select(s);

    let err = compiler.compile(&query.build().unwrap()).unwrap_err();
    assert!(err.is_invalid_statement());
}

#[test]
fn main_from_clause_cannot_be_visited_twice() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select(e);
    let query = query.build().unwrap();

    let state = compiler
        .visit_main_from_clause(Translation::default(), &query)
        .unwrap();
    let before = state.clone();

    let err = compiler.visit_main_from_clause(state, &query).unwrap_err();
    assert!(err.is_invalid_statement());

    // A failed visit leaves earlier states untouched
    assert_eq!(before.current_parameter, Some(Type::Model(zoo.model("Employee"))));
}

#[test]
fn of_type_requires_a_subtype() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let t = query.from("t", zoo.entities("Tiger"));
    query.select(t);
    query.result_operator(ResultOperator::OfType(zoo.model("Otter")));

    let err = compiler.compile(&query.build().unwrap()).unwrap_err();
    assert!(err.is_invalid_statement());
}

#[test]
fn of_type_requires_entities() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select(zoo.get(e, "first_name"));
    query.result_operator(ResultOperator::OfType(zoo.model("Tiger")));

    let err = compiler.compile(&query.build().unwrap()).unwrap_err();
    assert!(err.is_invalid_statement());
}
