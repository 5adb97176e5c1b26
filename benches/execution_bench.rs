use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dfascript::{lexicon, Interpreter, Lexicon, Scanner};

const PROGRAM: &str = r#"
    # compound interest, ten steps
    rate = 0.05;
    balance = 1000;
    balance = balance * (1 + rate) ** 10;
    IF(balance >= 1500) PRINT('rich: ' + balance);
    IF(balance < 1500) PRINT('saving: ' + balance);
    stars = '*' * 20;
    PRINT(stars);
"#;

fn lexer_benchmark(c: &mut Criterion) {
    lexicon().unwrap();

    c.bench_function("tokenize program", |b| {
        b.iter(|| Scanner::new(black_box(PROGRAM)).unwrap().scan_tokens())
    });

    c.bench_function("build standard lexicon", |b| {
        b.iter(|| Lexicon::standard().unwrap())
    });
}

fn interpreter_benchmark(c: &mut Criterion) {
    c.bench_function("interpret program", |b| {
        b.iter(|| {
            let mut interpreter = Interpreter::new();
            interpreter.compile(black_box(PROGRAM)).unwrap();
            interpreter
        })
    });

    let long: String = (0..500).map(|i| format!("x = x + {};", i)).collect();
    c.bench_function("interpret 500 assignments", |b| {
        b.iter(|| {
            let mut interpreter = Interpreter::new();
            interpreter.compile(black_box(&long)).unwrap();
            interpreter
        })
    });
}

criterion_group!(benches, lexer_benchmark, interpreter_benchmark);
criterion_main!(benches);
