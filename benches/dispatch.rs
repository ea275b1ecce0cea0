//! Benchmarks for call dispatch
//!
//! This benchmark measures:
//! - Registry execution (validation + handler) for valid and invalid calls
//! - Cache key derivation for small and wide parameter objects

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};

use mcp_runtime::cache::CacheKey;
use mcp_runtime::registry::ToolRegistry;
use mcp_runtime::types::{
    FunctionCall, FunctionDefinition, ParameterSchema, Parameters, PropertySchema,
};

fn registry() -> ToolRegistry {
    let registry = ToolRegistry::new();
    registry
        .register(
            FunctionDefinition::new(
                "add",
                "Add two numbers",
                ParameterSchema::new()
                    .required_property("a", PropertySchema::number("First operand"))
                    .required_property("b", PropertySchema::number("Second operand")),
            ),
            |p: &Parameters| -> Result<Value, String> {
                Ok(json!(p["a"].as_f64().unwrap_or(0.0) + p["b"].as_f64().unwrap_or(0.0)))
            },
        )
        .unwrap();
    mcp_runtime::tools::register_all(&registry).unwrap();
    registry
}

fn bench_registry_execute(c: &mut Criterion) {
    let registry = registry();
    let mut group = c.benchmark_group("registry_execute");

    let cases = [
        ("add_valid", FunctionCall::from_json("add", json!({"a": 2, "b": 3}))),
        ("add_missing_param", FunctionCall::from_json("add", json!({"a": 2}))),
        ("unknown", FunctionCall::from_json("missing", json!({}))),
        (
            "calculator",
            FunctionCall::from_json("calculator", json!({"operation": "power", "a": 2, "b": 8})),
        ),
    ];
    for (label, call) in &cases {
        group.bench_with_input(BenchmarkId::new("execute", label), call, |b, call| {
            b.iter(|| registry.execute(black_box(call)))
        });
    }

    group.finish();
}

fn bench_cache_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_key");

    let small: Parameters = json!({"b": 3, "a": 2}).as_object().cloned().unwrap();
    let wide: Parameters = (0..64)
        .map(|i| (format!("field_{i:02}"), json!({"nested": [i, i + 1], "label": "x"})))
        .collect();

    for (label, params) in [("small", &small), ("wide", &wide)] {
        group.throughput(Throughput::Elements(params.len() as u64));
        group.bench_with_input(BenchmarkId::new("for_call", label), params, |b, params| {
            b.iter(|| CacheKey::for_call(black_box("add"), black_box(params)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_registry_execute, bench_cache_key);
criterion_main!(benches);
