use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use julian::prelude::*;

/// A three-level hierarchy where every constructor forwards to its parent.
fn hierarchy() -> Type {
    let forward = || {
        evaluator(|_, args| Ok(vec![Argument::find(args, "x").cloned().unwrap_or(Value::Int(0))]))
    };
    let init = |v: i32| executable(move |_, _| Ok(Value::Int(v)));

    let base = ClassType::builder("Base")
        .field(FieldDecl::new("a", Type::int()))
        .initializer(Initializer::new("a", init(1)))
        .constructor(ConstructorMember::new(
            vec![Parameter::new("x", Type::float())],
            Arc::new(NoopBody),
        ))
        .build();
    let middle = ClassType::builder("Middle")
        .parent(base)
        .field(FieldDecl::new("b", Type::int()))
        .initializer(Initializer::new("b", init(2)))
        .constructor(
            ConstructorMember::new(vec![Parameter::new("x", Type::int())], Arc::new(NoopBody))
                .with_forward(ForwardInfo::super_(forward())),
        )
        .build();
    let leaf = ClassType::builder("Leaf")
        .parent(middle)
        .constructor(ConstructorMember::new(
            vec![Parameter::new("s", Type::string())],
            Arc::new(NoopBody),
        ))
        .constructor(
            ConstructorMember::new(vec![Parameter::new("x", Type::int())], Arc::new(NoopBody))
                .with_forward(ForwardInfo::super_(forward())),
        )
        .build();
    Type::Class(leaf)
}

fn bench_construct(c: &mut Criterion) {
    let ty = hierarchy();
    let mut group = c.benchmark_group("construct");

    let cached = Engine::new();
    let mut rt = cached.new_thread();
    group.bench_function("forward_chain_cached", |b| {
        b.iter(|| {
            cached
                .construct_object(&mut rt, black_box(&ty), vec![Value::Int(7)])
                .unwrap()
        })
    });

    let uncached = Engine::with_config(EngineConfig::default().with_constructor_cache(false));
    let mut rt = uncached.new_thread();
    group.bench_function("forward_chain_uncached", |b| {
        b.iter(|| {
            uncached
                .construct_object(&mut rt, black_box(&ty), vec![Value::Int(7)])
                .unwrap()
        })
    });

    group.finish();
}

fn bench_invoke(c: &mut Criterion) {
    let engine = Engine::new();
    let mut rt = engine.new_thread();
    let add = FunctionType::new(
        "add",
        vec![Parameter::new("a", Type::float()), Parameter::new("b", Type::float())],
        ReturnType::typed(Type::float()),
        executable(|_, args| {
            let sum: f64 = args
                .iter()
                .filter_map(|a| a.value.as_float().or(a.value.as_int().map(f64::from)))
                .sum();
            Ok(Value::Float(sum))
        }),
    );

    c.bench_function("invoke_promoted_args", |b| {
        b.iter(|| {
            engine
                .invoke_function(&mut rt, &add, vec![Value::Int(1), Value::Int(2)], None)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_construct, bench_invoke);
criterion_main!(benches);
