use docquery::{
    query::{QueryModel, QuerySourceId},
    stmt::{self, Expr, Type, Value},
    OperatorProvider, QueryCompiler, Translation,
};
use pretty_assertions::assert_eq;
use tests::zoo::{self, Zoo};

const E: QuerySourceId = QuerySourceId(0);

fn adapters(expr: &Expr) -> usize {
    let mut count = 0;
    stmt::visit::for_each_expr(expr, |expr| {
        if expr.is_to_async() {
            count += 1;
        }
    });
    count
}

/// A pipeline over employees that has already been started.
fn started(compiler: &QueryCompiler, zoo: &Zoo) -> Translation {
    let root = compiler
        .replace_clause_references(&Translation::default(), &zoo.entities("Employee"), Some(E), false)
        .unwrap();

    Translation::root(root, E, Type::Model(zoo.model("Employee")))
}

fn employee(zoo: &Zoo) -> Expr {
    Expr::query_source(E, zoo.model("Employee"))
}

#[test]
fn pipeline_root_is_wrapped_once() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Async);

    let expr = compiler
        .replace_clause_references(&Translation::default(), &zoo.entities("Employee"), Some(E), false)
        .unwrap();

    let scan = zoo.schema().scan(zoo.model("Employee")).unwrap();
    assert_eq!(expr, Expr::to_async(Expr::Scan(scan)));
    assert_eq!(expr.ty(), Type::stream(zoo.model("Employee")));
}

#[test]
fn sync_provider_never_wraps() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Sync);

    let root = compiler
        .replace_clause_references(&Translation::default(), &zoo.entities("Employee"), Some(E), false)
        .unwrap();
    assert_eq!(adapters(&root), 0);

    let state = Translation::root(root, E, Type::Model(zoo.model("Employee")));
    let specialties = zoo.get(employee(&zoo), "specialties");

    let expr = compiler
        .replace_clause_references(&state, &specialties, None, false)
        .unwrap();
    assert_eq!(adapters(&expr), 0);
}

#[test]
fn sequences_continuing_an_async_pipeline_are_wrapped() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Async);
    let state = started(&compiler, &zoo);

    let specialties = zoo.get(employee(&zoo), "specialties");
    let expr = compiler
        .replace_clause_references(&state, &specialties, None, false)
        .unwrap();

    let bound = Expr::member(
        Expr::arg(0, zoo.model("Employee")),
        zoo.field("Employee", "specialties"),
        Type::list(zoo.model("Specialty")),
    );
    assert_eq!(expr, Expr::to_async(bound));
}

#[test]
fn strings_are_never_wrapped() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Async);
    let state = started(&compiler, &zoo);

    let name = zoo.get(employee(&zoo), "first_name");
    let expr = compiler
        .replace_clause_references(&state, &name, None, false)
        .unwrap();

    assert_eq!(adapters(&expr), 0);
    assert_eq!(expr.ty(), Type::String);
}

#[test]
fn bytes_are_never_wrapped() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Async);
    let state = started(&compiler, &zoo);

    let bytes = Expr::Value(Value::Bytes(vec![1, 2, 3]));
    let expr = compiler
        .replace_clause_references(&state, &bytes, None, false)
        .unwrap();

    assert_eq!(expr, bytes);
}

#[test]
fn projections_are_never_wrapped() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Async);
    let state = started(&compiler, &zoo);

    let specialties = zoo.get(employee(&zoo), "specialties");
    let expr = compiler
        .replace_clause_references(&state, &specialties, None, true)
        .unwrap();

    assert_eq!(adapters(&expr), 0);

    let expr = compiler
        .replace_clause_references(&Translation::default(), &zoo.entities("Employee"), Some(E), true)
        .unwrap();

    assert_eq!(adapters(&expr), 0);
}

#[test]
fn async_sequences_are_not_wrapped_twice() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Async);
    let state = started(&compiler, &zoo);

    let already = Expr::to_async(zoo.entities("Animal"));
    let expr = compiler
        .replace_clause_references(&state, &already, None, false)
        .unwrap();

    assert_eq!(adapters(&expr), 1);
    assert!(expr.is_to_async());
}

#[test]
fn nested_sequences_of_a_sync_pipeline_are_not_wrapped() {
    let (sync, zoo) = zoo::compiler(OperatorProvider::Sync);
    let (compiler, _) = zoo::compiler(OperatorProvider::Async);

    // Built for the synchronous pipeline, then continued asynchronously
    let root = sync
        .replace_clause_references(&Translation::default(), &zoo.entities("Employee"), Some(E), false)
        .unwrap();
    let state = Translation::root(root, E, Type::Model(zoo.model("Employee")));

    let specialties = zoo.get(employee(&zoo), "specialties");
    let expr = compiler
        .replace_clause_references(&state, &specialties, None, false)
        .unwrap();

    assert_eq!(adapters(&expr), 0);
}

#[test]
fn compiled_query_has_one_adapter() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Async);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.filter(Expr::gt(zoo.get(e.clone(), "age"), 30_i64));
    query.select((zoo.get(e.clone(), "first_name"), zoo.get(e, "age")));

    let compiled = compiler.compile(&query.build().unwrap()).unwrap();

    assert_eq!(adapters(&compiled.expr), 1);
    assert_eq!(
        compiled.ty,
        Type::stream(Type::Record(vec![Type::String, Type::I64]))
    );
}

#[test]
fn string_projection_is_not_wrapped() {
    let (compiler, zoo) = zoo::compiler(OperatorProvider::Async);

    let mut query = QueryModel::builder();
    let e = query.from("e", zoo.entities("Employee"));
    query.select(zoo.get(e, "first_name"));

    let compiled = compiler.compile(&query.build().unwrap()).unwrap();

    // Only the pipeline root is adapted
    let call = compiled.expr.as_call().unwrap();
    assert!(call.args[0].is_to_async());
    assert_eq!(adapters(&call.args[1]), 0);
    assert_eq!(compiled.ty, Type::stream(Type::String));
}
