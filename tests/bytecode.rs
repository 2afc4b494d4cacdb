#[path = "common/mod.rs"]
mod common;

#[test]
fn arithmetic_precedence() {
    prints!("clox", "print 1 + 2 * 3;\nprint (1 + 2) * 3;", "7", "9");
}

#[test]
fn short_circuit_and_skips_compiling_the_divide_at_runtime() {
    prints!("clox", "print false and (1/0);", "false");
}

#[test]
fn short_circuit_or_evaluates_right_when_left_is_falsy() {
    prints!("clox", r#"var a = nil; print a or "b";"#, "b");
}

#[test]
fn for_loop_accumulates() {
    prints!(
        "clox",
        "var total = 0; for (var i = 0; i < 5; i = i + 1) { total = total + i; } print total;",
        "10"
    );
}

#[test]
fn while_loop_counts_up() {
    prints!("clox", "var i = 0; while (i < 3) { i = i + 1; } print i;", "3");
}

#[test]
fn block_scope_shadows_without_mutating_outer() {
    prints!(
        "clox",
        r#"var a = "outer"; { var a = "inner"; print a; } print a;"#,
        "inner",
        "outer"
    );
}

#[test]
fn string_concatenation() {
    prints!("clox", r#"print "foo" + "bar";"#, "foobar");
}

#[test]
fn assigning_an_undefined_global_is_a_runtime_error() {
    fails!("clox", "x = 1;", 70);
}

#[test]
fn reading_an_undefined_global_is_a_runtime_error() {
    fails!("clox", "print x;", 70);
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    fails!("clox", "print 1 / 0;", 70);
}

#[test]
fn local_read_in_its_own_initializer_is_a_compile_error() {
    fails!("clox", "{ var a = a; }", 65);
}

#[test]
fn mismatched_parens_are_a_compile_error() {
    fails!("clox", "print (1 + 2;", 65);
}
