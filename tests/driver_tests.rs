use exprflow::driver::Driver;
use exprflow::parallel::DEFAULT_MULTITHREAD_THRESHOLD;

fn run(source: &str) -> (String, String, i32) {
    run_with_threshold(source, DEFAULT_MULTITHREAD_THRESHOLD)
}

fn run_with_threshold(source: &str, threshold: usize) -> (String, String, i32) {
    let mut driver = Driver::new(threshold);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = driver.run(source.as_bytes(), &mut stdout, &mut stderr);
    (
        String::from_utf8(stdout).unwrap(),
        String::from_utf8(stderr).unwrap(),
        code,
    )
}

#[test]
fn scenario_var_then_out() {
    let (stdout, stderr, code) = run("var n = 5\nout n");
    assert_eq!(stdout, "5");
    assert!(stderr.is_empty());
    assert_eq!(code, 0);
}

#[test]
fn scenario_range_out() {
    let (stdout, stderr, code) = run("out {1, 3}");
    assert_eq!(stdout, "{1, 2, 3}");
    assert!(stderr.is_empty());
    assert_eq!(code, 0);
}

#[test]
fn scenario_reduce_sum() {
    let (stdout, _stderr, code) = run("var s = reduce({1, 100}, 0, a b -> a + b)\nout s");
    assert_eq!(stdout, "5050");
    assert_eq!(code, 0);
}

#[test]
fn scenario_map_square() {
    let (stdout, _stderr, code) = run("out map({1, 4}, x -> x * x)");
    assert_eq!(stdout, "{1, 4, 9, 16}");
    assert_eq!(code, 0);
}

#[test]
fn scenario_division_by_zero() {
    let (stdout, stderr, code) = run("out 1 / 0");
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("ERROR:1,"));
    assert!(stderr.contains("division by zero"));
    assert_eq!(code, 1);
}

#[test]
fn scenario_reduce_product() {
    let (stdout, _stderr, code) = run("var p = reduce({1, 10}, 1, a b -> a * b)\nout p");
    assert_eq!(stdout, "3628800");
    assert_eq!(code, 0);
}

#[test]
fn invariant_running_twice_is_identical() {
    let program = "var s = reduce({1, 500}, 0, a b -> a + b)\nout s";
    let first = run_with_threshold(program, 8);
    let second = run_with_threshold(program, 8);
    assert_eq!(first, second);
}

#[test]
fn invariant_map_identity_materializes_input() {
    let (sequential, _, _) = run_with_threshold("out map({1, 20}, x -> x)", 1000);
    let (parallel, _, _) = run_with_threshold("out map({1, 20}, x -> x)", 1);
    assert_eq!(sequential, "{1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20}");
    assert_eq!(sequential, parallel);
}

#[test]
fn invariant_reduce_sum_matches_regardless_of_slice_count() {
    let program = "out reduce({1, 97}, 0, a b -> a + b)";
    let (threshold_1, _, _) = run_with_threshold(program, 1);
    let (threshold_16, _, _) = run_with_threshold(program, 16);
    let (threshold_1000, _, _) = run_with_threshold(program, 1000);
    assert_eq!(threshold_1, "4753");
    assert_eq!(threshold_1, threshold_16);
    assert_eq!(threshold_1, threshold_1000);
}

#[test]
fn invariant_map_produces_same_size_as_input() {
    let (stdout, _, _) = run_with_threshold("out map({1, 50}, x -> x + 1)", 4);
    let elements: Vec<&str> = stdout.trim_matches(|c| c == '{' || c == '}').split(", ").collect();
    assert_eq!(elements.len(), 50);
    assert_eq!(elements[0], "2");
    assert_eq!(elements[49], "51");
}

#[test]
fn invariant_division_by_zero_never_crashes_host() {
    let (_, stderr, code) = run_with_threshold("out map({1, 40}, x -> x / 0)", 4);
    assert_eq!(code, 1);
    assert!(stderr.contains("division by zero"));
}

#[test]
fn invariant_range_string_form() {
    let (stdout, _, _) = run("out {1, 5}");
    assert_eq!(stdout, "{1, 2, 3, 4, 5}");
}

#[test]
fn parse_errors_continue_surfacing_after_first_error() {
    let program = "out 1 / 0\nvar x = 1 +\nout 5";
    let (stdout, stderr, code) = run(program);
    assert!(stdout.is_empty());
    assert_eq!(stderr.lines().count(), 2);
    assert_eq!(code, 1);
}

#[test]
fn earlier_successful_bindings_survive_a_later_error() {
    let program = "var n = 5\nvar bad = n / 0\nvar m = n + 1\nout m";
    let (stdout, stderr, code) = run(program);
    // `m` is never bound because execution stops after the first error, but
    // the diagnostic for the division still appears and exit is nonzero.
    assert!(stdout.is_empty());
    assert!(stderr.contains("division by zero"));
    assert_eq!(code, 1);
}

#[test]
fn nested_map_and_reduce() {
    let (stdout, _, code) = run("out reduce(map({1, 5}, x -> x * x), 0, a b -> a + b)");
    assert_eq!(stdout, "55");
    assert_eq!(code, 0);
}

#[test]
fn float_promotion_in_output() {
    let (stdout, _, code) = run("out 1 / 2.0");
    assert_eq!(stdout, "0.5");
    assert_eq!(code, 0);
}

#[test]
fn print_literal_has_no_trailing_newline_added() {
    let (stdout, _, _) = run(r#"print "hello, world""#);
    assert_eq!(stdout, "hello, world");
}

#[test]
fn blank_lines_between_statements_are_skipped() {
    let (stdout, _, code) = run("\n\nvar n = 1\n\nout n\n\n");
    assert_eq!(stdout, "1");
    assert_eq!(code, 0);
}
