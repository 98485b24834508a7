use criterion::{Criterion, criterion_group, criterion_main};
use pycs_csharp::{TranslateOptions, translate, translate_source};
use pycs_syntax::read_python;
use std::hint::black_box;

const CALCULATOR: &str = r#"
import math

class Calculator:
    """Keeps a running total."""

    def __init__(self):
        self.result = 0

    def add(self, x, y):
        return x + y

    def divide(self, x, y):
        if y == 0:
            raise ValueError("Cannot divide by zero")
        return x / y

    def history(self):
        for entry in self.entries:
            yield entry

def main():
    calc = Calculator()
    total = 0
    for i in range(10):
        try:
            total += calc.divide(i, i - 5)
        except ValueError as e:
            print(f"skipped {i}: {e}")
        else:
            continue
    while total > 100:
        total //= 2
    else:
        print(total ** 2)

main()
"#;

fn bench_read(c: &mut Criterion) {
    c.bench_function("read_python", |b| {
        b.iter(|| black_box(read_python(black_box(CALCULATOR))));
    });
}

fn bench_translate(c: &mut Criterion) {
    let options = TranslateOptions::default();
    let module = match read_python(CALCULATOR) {
        Ok(module) => module,
        Err(err) => panic!("benchmark source does not parse: {err}"),
    };

    c.bench_function("translate_module", |b| {
        b.iter(|| black_box(translate(black_box(&module), &options)));
    });

    c.bench_function("translate_source", |b| {
        b.iter(|| black_box(translate_source(black_box(CALCULATOR), &options)));
    });
}

criterion_group!(benches, bench_read, bench_translate);
criterion_main!(benches);
