#[path = "common/mod.rs"]
mod common;

#[test]
fn arithmetic_precedence() {
    prints!("tlox", "print 1 + 2 * 3;\nprint (1 + 2) * 3;", "7", "9");
}

#[test]
fn short_circuit_or_evaluates_right_when_left_is_falsy() {
    prints!("tlox", r#"var a = nil; print a or "b";"#, "b");
}

#[test]
fn short_circuit_and_skips_right_when_left_is_falsy() {
    prints!("tlox", "print false and (1/0);", "false");
}

#[test]
fn block_scope_shadows_without_mutating_outer() {
    prints!(
        "tlox",
        r#"var a = "outer"; { var a = "inner"; print a; } print a;"#,
        "inner",
        "outer"
    );
}

#[test]
fn closures_capture_their_own_environment() {
    prints!(
        "tlox",
        r#"
        fun makeCounter() {
            var i = 0;
            fun count() {
                i = i + 1;
                return i;
            }
            return count;
        }
        var c = makeCounter();
        print c();
        print c();
        print c();
        "#,
        "1",
        "2",
        "3"
    );
}

#[test]
fn nested_closures_each_see_their_own_captured_variable() {
    prints!(
        "tlox",
        r#"
        fun outer() {
            var a = "a";
            fun middle() {
                var b = "b";
                fun inner() {
                    var c = "c";
                    print a;
                    print b;
                    print c;
                }
                inner();
            }
            middle();
        }
        outer();
        "#,
        "a",
        "b",
        "c"
    );
}

#[test]
fn classes_support_init_and_this() {
    prints!(
        "tlox",
        r#"
        class Greeter {
            init(name) { this.name = name; }
            hello() { return "hi " + this.name; }
        }
        print Greeter("lox").hello();
        "#,
        "hi lox"
    );
}

#[test]
fn fields_shadow_methods_of_the_same_name() {
    prints!(
        "tlox",
        r#"
        class Box {
            value() { return "method"; }
        }
        var b = Box();
        b.value = "field";
        print b.value;
        "#,
        "field"
    );
}

#[test]
fn resolver_rejects_reading_a_variable_in_its_own_initializer() {
    fails!("tlox", "{ var x = x; }", 65);
}

#[test]
fn resolver_rejects_return_outside_a_function() {
    fails!("tlox", "return 1;", 65);
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    fails!("tlox", "print 1 / 0;", 70);
}

#[test]
fn calling_a_non_callable_is_a_runtime_error() {
    fails!("tlox", "var a = 1; a();", 70);
}

#[test]
fn native_clock_is_callable_and_numeric() {
    prints!("tlox", "print clock() >= 0;", "true");
}
