use docquery::{
    query::{QueryModel, ResultOperator},
    stmt::{AssignSource, Expr, Method, Type},
    OperatorProvider,
};
use pretty_assertions::assert_eq;
use tests::zoo;

fn method(expr: &Expr) -> &Method {
    &expr.as_call().expect("expected a method call").method
}

#[test]
fn identity_select_appends_nothing() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select(e);

    let compiled = compiler.compile(&query.build().unwrap()).unwrap();

    let scan = zoo.schema().scan(zoo.model("Employee")).unwrap();
    assert_eq!(compiled.expr, Expr::Scan(scan));
    assert_eq!(compiled.ty, Type::list(zoo.model("Employee")));
}

#[test]
fn identity_select_over_async_pipeline() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Async);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select(e);

    let compiled = compiler.compile(&query.build().unwrap()).unwrap();

    let scan = zoo.schema().scan(zoo.model("Employee")).unwrap();
    assert_eq!(compiled.expr, Expr::to_async(Expr::Scan(scan)));
    assert!(compiled.ty.is_stream());
}

#[test]
fn identity_select_after_where() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.filter(Expr::gt(zoo.get(e.clone(), "age"), 30_i64));
    query.select(e);

    let compiled = compiler.compile(&query.build().unwrap()).unwrap();

    assert_eq!(method(&compiled.expr), &Method::Where);
}

#[test]
fn member_projection_appends_select() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select(zoo.get(e, "first_name"));

    let compiled = compiler.compile(&query.build().unwrap()).unwrap();

    let call = compiled.expr.as_call().unwrap();
    assert_eq!(call.method, Method::Select);
    assert!(call.args[0].is_scan());

    let selector = call.args[1].as_func().unwrap();
    let member = selector.body.as_member().unwrap();
    assert!(member.base.is_identity_arg());
    assert_eq!(member.field, zoo.field("Employee", "first_name"));

    assert_eq!(compiled.ty, Type::list(Type::String));
}

#[test]
fn record_projection_appends_select() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select((zoo.get(e.clone(), "first_name"), zoo.get(e, "age")));

    let compiled = compiler.compile(&query.build().unwrap()).unwrap();

    assert_eq!(method(&compiled.expr), &Method::Select);
    assert_eq!(
        compiled.ty,
        Type::list(Type::Record(vec![Type::String, Type::I64]))
    );
}

#[test]
fn group_by_suppresses_select() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select(zoo.get(e.clone(), "first_name"));
    query.result_operator(ResultOperator::GroupBy {
        key: zoo.get(e.clone(), "age"),
        element: zoo.get(e, "first_name"),
    });

    let compiled = compiler.compile(&query.build().unwrap()).unwrap();

    let call = compiled.expr.as_call().unwrap();
    assert_eq!(call.method, Method::GroupBy);

    // The grouping reads the entities directly
    assert!(call.args[0].is_scan());
    assert!(!compiled
        .expr
        .contains_expr(|expr| matches!(expr.as_call(), Some(call) if call.method == Method::Select)));

    assert_eq!(
        compiled.ty,
        Type::list(Type::grouping(Type::I64, Type::String))
    );
}

#[test]
fn all_suppresses_select() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select(zoo.get(e.clone(), "first_name"));
    query.result_operator(ResultOperator::All(Expr::gt(zoo.get(e, "age"), 18_i64)));

    let compiled = compiler.compile(&query.build().unwrap()).unwrap();

    let call = compiled.expr.as_call().unwrap();
    assert_eq!(call.method, Method::All);
    assert!(call.args[0].is_scan());
    assert_eq!(compiled.ty, Type::Bool);
}

#[test]
fn include_of_plain_embedded_navigation_appends_nothing() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select(e);
    query.result_operator(ResultOperator::Include(
        zoo.path("Employee", "specialties"),
    ));

    let compiled = compiler.compile(&query.build().unwrap()).unwrap();

    // Specialties arrive with the employee document
    let scan = zoo.schema().scan(zoo.model("Employee")).unwrap();
    assert_eq!(compiled.expr, Expr::Scan(scan));
}

#[test]
fn include_of_embedded_navigation_with_back_reference() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let mut query = QueryModel::builder();
    let en = query.from("en", zoo.entities("Enclosure"));
    query.select(en);
    query.result_operator(ResultOperator::Include(zoo.path("Enclosure", "animals")));

    let compiled = compiler.compile(&query.build().unwrap()).unwrap();

    let call = compiled.expr.as_call().unwrap();
    assert_eq!(call.method, Method::Select);

    let Expr::Assign(assign) = &*call.args[1].as_func().unwrap().body else {
        panic!("expected an assignment; expr={:#?}", compiled.expr);
    };

    assert!(assign.base.is_identity_arg());
    assert_eq!(assign.path, zoo.path("Enclosure", "animals"));
    assert_eq!(assign.navigation, zoo.field("Animal", "enclosure"));
    assert_eq!(assign.source, AssignSource::Parent);
}
