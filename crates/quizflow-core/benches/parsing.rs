use criterion::{black_box, criterion_group, criterion_main, Criterion};

use std::fmt::Write;
use std::path::PathBuf;

use quizflow_core::parser;

fn make_toml(flow_count: usize) -> String {
    let mut toml = String::from(
        r#"
[questionnaire]
id = "bench"
title = "Bench"
category = "bench"

[[initial_questions]]
id = "start"
type = "scale"
prompt = "How much?"

[initial_questions.scale]
min = 1
max = 10
"#,
    );

    for i in 0..flow_count {
        write!(
            toml,
            r#"
[[initial_questions.conditions]]
name = "band{i}"
min = {i}
next_flow = "flow{i}"

[[question_flows.flow{i}]]
id = "f{i}q"
type = "single"
prompt = "Flow {i}?"

[[question_flows.flow{i}.options]]
value = "yes"
label = "Yes"
weight = 2

[[question_flows.flow{i}.options]]
value = "no"
label = "No"
weight = -1
"#
        )
        .unwrap();
    }

    toml
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_definition");
    let path = PathBuf::from("bench.toml");

    for flow_count in [1usize, 10, 50] {
        let toml = make_toml(flow_count);
        group.bench_function(format!("flows={flow_count}"), |b| {
            b.iter(|| parser::parse_definition_str(black_box(&toml), &path))
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_definition");
    let path = PathBuf::from("bench.toml");

    for flow_count in [10usize, 50] {
        let definition = parser::parse_definition_str(&make_toml(flow_count), &path).unwrap();
        group.bench_function(format!("flows={flow_count}"), |b| {
            b.iter(|| parser::validate_definition(black_box(&definition)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_validate);
criterion_main!(benches);
