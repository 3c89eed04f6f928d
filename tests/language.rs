//! End-to-end language behaviour through the library API.

mod common;

use common::{run, run_ok};

#[test]
fn test_variables_and_arithmetic() {
    assert_eq!(run_ok("var a = 1; var b = 2; say a + b;"), "3\n");
    assert_eq!(run_ok("say 1 + 2 * 3;"), "7\n");
    assert_eq!(run_ok("say (1 + 2) * 3;"), "9\n");
    assert_eq!(run_ok("say 1 - 2 - 3;"), "-4\n");
    assert_eq!(run_ok("var x; say x;"), "null\n");
}

#[test]
fn test_display_formats() {
    assert_eq!(run_ok("say null;"), "null\n");
    assert_eq!(run_ok("say true; say false;"), "true\nfalse\n");
    assert_eq!(run_ok("say 1; say 1.5; say -0.25;"), "1\n1.5\n-0.25\n");
    assert_eq!(run_ok("say \"hi\";"), "\"hi\"\n");

    let vector = run_ok("say vec{1};");
    assert!(vector.starts_with("<vector 0x"), "got {}", vector);
    let map = run_ok("say map{};");
    assert!(map.starts_with("<map 0x"), "got {}", map);
    let class = run_ok("class C {} say C;");
    assert!(class.starts_with("<class 'C' 0x"), "got {}", class);
    let fun = run_ok("fun f() {} say f;");
    assert!(fun.starts_with("<function 'f' 0x"), "got {}", fun);
    let anon = run_ok("say fun() {};");
    assert!(anon.starts_with("<function (anonymous) 0x"), "got {}", anon);
}

#[test]
fn test_truthiness() {
    assert_eq!(run_ok("if 0 -> say \"yes\";"), "\"yes\"\n");
    assert_eq!(run_ok("if \"\" { say 1; }"), "1\n");
    assert_eq!(run_ok("if null { say 1; } else { say 2; }"), "2\n");
    assert_eq!(run_ok("if false { say 1; } else { say 2; }"), "2\n");
    assert_eq!(run_ok("say !null; say !0;"), "true\nfalse\n");
}

#[test]
fn test_comparisons() {
    assert_eq!(run_ok("say 1 < 2; say 2 <= 2; say 3 > 4; say 4 >= 4;"), "true\ntrue\nfalse\ntrue\n");
    assert_eq!(run_ok("say 1 == 1; say 1 != 1;"), "true\nfalse\n");
    assert_eq!(run_ok("say \"a\" == \"a\"; say \"a\" != \"b\";"), "true\ntrue\n");
    assert_eq!(run_ok("say true == true; say true != false;"), "true\ntrue\n");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(run_ok("say \"foo\" + \"bar\";"), "\"foobar\"\n");
    assert_eq!(run_ok("var s = \"a\"; s = s + \"b\"; say s;"), "\"ab\"\n");
}

#[test]
fn test_loops() {
    assert_eq!(run_ok("for (var i = 0; i < 3; i = i + 1) -> say i;"), "0\n1\n2\n");
    assert_eq!(run_ok("for var i = 0; i < 2; i = i + 1 { say i; }"), "0\n1\n");
    assert_eq!(
        run_ok("var total = 0; for (var i = 1; i <= 10; i = i + 1) -> total = total + i; say total;"),
        "55\n"
    );
}

#[test]
fn test_loop_variable_is_scoped_to_the_loop() {
    let (result, _) = run("for (var i = 0; i < 1; i = i + 1) -> say i; say i;");
    assert!(result.is_err(), "loop variable should not leak");
}

#[test]
fn test_nested_loops_with_break() {
    let source = r#"
        for (var i = 0; i < 3; i = i + 1) {
            for (var j = 0; j < 3; j = j + 1) {
                if j === 1 -> break;
                say i * 10 + j;
            }
        }
    "#;
    assert_eq!(run_ok(source), "0\n10\n20\n");
}

#[test]
fn test_vectors() {
    assert_eq!(run_ok("var v = vec{1, 2, 3}; v.push(4); say v.length();"), "4\n");
    assert_eq!(run_ok("say vec{1, 2, 3}[1];"), "2\n");
    assert_eq!(run_ok("var v = vec{1, 2, 3}; say v[1:3].length();"), "2\n");
    assert_eq!(run_ok("var v = vec{vec{1}, vec{2}}; say v[1][0];"), "2\n");
    assert_eq!(run_ok("var v = vec{}; v.push(null); say v.length();"), "1\n");
}

#[test]
fn test_maps() {
    assert_eq!(
        run_ok("var m = map{\"a\": 1, 2: \"b\"}; say m[\"a\"]; say m[2];"),
        "1\n\"b\"\n"
    );
    assert_eq!(run_ok("var m = map{}; say m.size();"), "0\n");
    assert_eq!(
        run_ok("var m = map{\"a\": 1}; m[\"b\"] = 2; say m.size();"),
        "2\n"
    );
    assert_eq!(
        run_ok("var m = map{\"k\": 1}; say m.keys()[0]; say m.values()[0];"),
        "\"k\"\n1\n"
    );
    // keys() returns a fresh vector, not a view
    assert_eq!(
        run_ok("var m = map{\"k\": 1}; var ks = m.keys(); ks.push(\"x\"); say m.size();"),
        "1\n"
    );
}

#[test]
fn test_string_methods() {
    assert_eq!(run_ok("var s = \"abc\"; say s.reverse();"), "\"cba\"\n");
    assert_eq!(run_ok("say \"aBc\".to_upper_case();"), "\"ABC\"\n");
    assert_eq!(run_ok("say \"AbC\".to_lower_case();"), "\"abc\"\n");
    // case mapping is ASCII-only
    assert_eq!(run_ok("say \"héllo\".to_upper_case();"), "\"HéLLO\"\n");
    assert_eq!(run_ok("say \"néédle\".reverse();"), "\"eldéén\"\n");
}

#[test]
fn test_number_and_boolean_methods() {
    assert_eq!(run_ok("say 1.5.to_string();"), "\"1.5\"\n");
    assert_eq!(run_ok("say true.to_string();"), "\"true\"\n");
    assert_eq!(run_ok("var n = 42; say n.to_string();"), "\"42\"\n");
}

#[test]
fn test_functions() {
    assert_eq!(run_ok("fun add(a, b) { return a + b; } say add(2, 3);"), "5\n");
    assert_eq!(run_ok("fun f() { return; } say f();"), "null\n");
    assert_eq!(run_ok("fun f() { say 1; } say f();"), "1\nnull\n");
    assert_eq!(run_ok("var f = fun(x) { return x * 2; }; say f(21);"), "42\n");
}

#[test]
fn test_higher_order_functions() {
    let source = r#"
        fun twice(f, x) { return f(f(x)); }
        fun inc(n) { return n + 1; }
        say twice(inc, 5);
    "#;
    assert_eq!(run_ok(source), "7\n");
}

#[test]
fn test_closures() {
    let source = r#"
        fun make_counter() {
            var count = 0;
            return fun() {
                count = count + 1;
                return count;
            };
        }
        var a = make_counter();
        var b = make_counter();
        say a(); say a(); say b();
    "#;
    assert_eq!(run_ok(source), "1\n2\n1\n");
}

#[test]
fn test_classes() {
    let source = r#"
        class Point {
            init new(x, y) {
                self.x = x;
                self.y = y;
            }
            fun len2() { return self.x * self.x + self.y * self.y; }
            fun scale(k) {
                self.x = self.x * k;
                self.y = self.y * k;
            }
        }
        var p = Point.new(3, 4);
        say p.len2();
        p.scale(2);
        say p.len2();
    "#;
    assert_eq!(run_ok(source), "25\n100\n");
}

#[test]
fn test_multiple_initializers() {
    let source = r#"
        class Temp {
            init zero() { self.deg = 0; }
            init of(d) { self.deg = d; }
            fun deg() { return self.deg; }
        }
        say Temp.zero().deg();
        say Temp.of(21).deg();
    "#;
    assert_eq!(run_ok(source), "0\n21\n");
}

#[test]
fn test_methods_call_methods() {
    let source = r#"
        class C {
            init new() { self.n = 2; }
            fun double() { return self.n * 2; }
            fun quad() { return self.double() * 2; }
        }
        say C.new().quad();
    "#;
    assert_eq!(run_ok(source), "8\n");
}

#[test]
fn test_anonymous_class_value() {
    let source = r#"
        var Maker = class { init new() { self.ok = true; } fun ok() { return self.ok; } };
        say Maker.new().ok();
    "#;
    assert_eq!(run_ok(source), "true\n");
}

#[test]
fn test_bound_methods_are_first_class() {
    let source = r#"
        var v = vec{1};
        var push = v.push;
        push(2);
        say v.length();
    "#;
    assert_eq!(run_ok(source), "2\n");
}

#[test]
fn test_universal_identifiers() {
    assert_eq!(run_ok("var `my var` = 7; say `my var`;"), "7\n");
}

#[test]
fn test_say_instance_and_exception_forms() {
    let instance = run_ok("class C { init new() {} } say C.new();");
    assert!(instance.starts_with("<instance 0x"), "got {}", instance);
    assert!(instance.contains("of <class 'C'"), "got {}", instance);

    let exception = run_ok("try { throw \"x\"; } catch e { say e; }");
    assert!(exception.starts_with("<exception \"x\" 0x"), "got {}", exception);
}

#[test]
fn test_clock_returns_plausible_seconds() {
    let output = run_ok("say clock() > 1000000000;");
    assert_eq!(output, "true\n");
}

#[test]
fn test_mixed_program() {
    let source = r#"
        var out = vec{};
        for (var i = 1; i <= 15; i = i + 1) {
            if i == 3 or i == 6 or i == 9 or i == 12 or i == 15 {
                out.push("fizz");
            } else {
                out.push(i);
            }
        }
        say out.length();
        say out[2];
    "#;
    assert_eq!(run_ok(source), "15\n\"fizz\"\n");
}

#[test]
fn test_map_of_vectors() {
    let source = r#"
        var groups = map{};
        groups["evens"] = vec{};
        groups["odds"] = vec{};
        for (var i = 0; i < 6; i = i + 1) {
            if i === 0 or i === 2 or i === 4 {
                groups["evens"].push(i);
            } else {
                groups["odds"].push(i);
            }
        }
        say groups["evens"].length();
        say groups["odds"].length();
    "#;
    assert_eq!(run_ok(source), "3\n3\n");
}
