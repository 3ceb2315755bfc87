#[cfg(test)]
mod interpreter_tests {
    use pretty_assertions::assert_eq;

    use rox::lox::{self, RunOutcome};
    use rox::sink::{CapturedOutput, Diagnostics, ErrorSink};
    use rox::value::Value;

    struct Run {
        outcome: RunOutcome,
        output: Vec<String>,
        errors: Vec<String>,
    }

    fn run(source: &str) -> Run {
        let mut errors = Diagnostics::new();
        let mut output = CapturedOutput::new();

        let outcome = lox::run(source, &mut errors, &mut output);

        Run {
            outcome,
            output: output.lines().to_vec(),
            errors: errors.messages(),
        }
    }

    /// Runs a program that must succeed and returns what it printed.
    fn output(source: &str) -> Vec<String> {
        let run = run(source);
        assert_eq!(run.errors, Vec::<String>::new());
        assert_eq!(run.outcome, RunOutcome::Success);
        run.output
    }

    fn runtime_error(source: &str) -> (Vec<String>, String) {
        let run = run(source);
        assert_eq!(run.outcome, RunOutcome::RuntimeError);
        assert_eq!(run.errors.len(), 1);
        (run.output, run.errors[0].clone())
    }

    // ───────────────────────── expressions ─────────────────────────

    #[test]
    fn test_arithmetic_and_display() {
        assert_eq!(
            output("print 1 + 2 * 3; print 7 / 2; print -(4); print 10 - 2.5; print 3 == 3.0;"),
            vec!["7", "3.5", "-4", "7.5", "true"]
        );
    }

    #[test]
    fn test_number_display_switches_to_exponent_form() {
        assert_eq!(
            output(
                "print 100000000000000000000; print 12345678; print 1234567; print -25000000;
                 print 0.0001; print 0.001; print 1 / 0; print -1 / 0;"
            ),
            vec![
                "1.0E20",
                "1.2345678E7",
                "1234567",
                "-2.5E7",
                "1.0E-4",
                "0.001",
                "Infinity",
                "-Infinity"
            ]
        );
    }

    #[test]
    fn test_division_by_zero_is_not_an_error() {
        assert_eq!(output("print 1 / 0 > 1000000;"), vec!["true"]);
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(
            output("print !null; print !0; print !\"\"; print !false; if (0) print \"zero\";"),
            vec!["true", "false", "false", "true", "zero"]
        );
    }

    #[test]
    fn test_equality_has_no_coercion() {
        assert_eq!(
            output("print null == null; print null == false; print 1 == \"1\"; print \"a\" == \"a\"; print 2 != 3;"),
            vec!["true", "false", "false", "true", "true"]
        );
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(
            output("print null or \"yes\"; print 1 or boom; print false and boom; print 1 and 2;"),
            vec!["yes", "1", "false", "2"]
        );
    }

    #[test]
    fn test_string_concatenation_and_coercion() {
        assert_eq!(
            output("print \"n=\" + 4; print 4 + \"x\"; print \"a\" + \"b\"; print \"v\" + null;"),
            vec!["n=4", "4x", "ab", "vnil"]
        );
    }

    #[test]
    fn test_plus_without_string_operand_fails() {
        let (printed, message) = runtime_error("print 1; print 4 + true; print 2;");

        assert_eq!(printed, vec!["1"]);
        assert_eq!(
            message,
            "Operands of '+' must be two numbers or include a string.\n[line 1]"
        );
    }

    #[test]
    fn test_operand_type_errors() {
        assert_eq!(
            runtime_error("print -\"a\";").1,
            "Operand of '-' must be a number.\n[line 1]"
        );
        assert_eq!(
            runtime_error("print 1 < \"a\";").1,
            "Operands of '<' must be numbers.\n[line 1]"
        );
        assert_eq!(
            runtime_error("\n\nprint true * 2;").1,
            "Operands of '*' must be numbers.\n[line 3]"
        );
    }

    #[test]
    fn test_evaluate_single_expression() {
        let mut errors = Diagnostics::new();
        let mut output = CapturedOutput::new();

        let value = lox::evaluate("(1 + 2) * \"x\" == null", &mut errors, &mut output);
        assert_eq!(value, None);
        assert_eq!(RunOutcome::from_sink(&errors), RunOutcome::RuntimeError);

        let mut errors = Diagnostics::new();
        let value = lox::evaluate("\"a\" + 1 + 2", &mut errors, &mut output);
        assert_eq!(value, Some(Value::String("a12".to_string())));
        assert!(errors.errors().is_empty());
    }

    // ───────────────────────── variables and scope ─────────────────────────

    #[test]
    fn test_globals_and_assignment() {
        assert_eq!(
            output("var a; print a; a = 1; var b = a = 2; print a; print b; var a = \"again\"; print a;"),
            vec!["nil", "2", "2", "again"]
        );
    }

    #[test]
    fn test_undefined_variable() {
        assert_eq!(
            runtime_error("print missing;").1,
            "Undefined variable 'missing'.\n[line 1]"
        );
        assert_eq!(
            runtime_error("missing = 1;").1,
            "Undefined variable 'missing'.\n[line 1]"
        );
    }

    #[test]
    fn test_block_shadowing() {
        assert_eq!(
            output("var a = \"outer\"; { var a = \"inner\"; print a; } print a;"),
            vec!["inner", "outer"]
        );
    }

    #[test]
    fn test_initializer_reading_another_outer_variable() {
        assert_eq!(output("var b = 1; { var a = b + 2; print a; }"), vec!["3"]);
    }

    #[test]
    fn test_initializer_reading_its_own_name_is_static() {
        let run = run("var a = 1; { var a = a + 2; print a; }");

        assert_eq!(run.outcome, RunOutcome::StaticError);
        assert_eq!(run.output, Vec::<String>::new());
        assert_eq!(
            run.errors,
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );

        assert_eq!(self::run("{ var a = a; }").outcome, RunOutcome::StaticError);
    }

    #[test]
    fn test_resolved_binding_is_not_affected_by_later_shadowing() {
        assert_eq!(
            output(
                "var a = \"global\";
                 {
                   fun show() { print a; }
                   show();
                   var a = \"block\";
                   show();
                 }"
            ),
            vec!["global", "global"]
        );
    }

    // ───────────────────────── control flow ─────────────────────────

    #[test]
    fn test_if_else_and_while() {
        assert_eq!(
            output(
                "if (1 > 2) print \"no\"; else print \"yes\";
                 var i = 0;
                 while (i < 3) { print i; i = i + 1; }"
            ),
            vec!["yes", "0", "1", "2"]
        );
    }

    #[test]
    fn test_for_loop() {
        assert_eq!(
            output(
                "var a = 0; var temp;
                 for (var b = 1; a < 30; b = temp + b) { print a; temp = a; a = b; }"
            ),
            vec!["0", "1", "1", "2", "3", "5", "8", "13", "21"]
        );
    }

    // ───────────────────────── functions ─────────────────────────

    #[test]
    fn test_recursion() {
        assert_eq!(
            output(
                "fun fib(n) { if (n < 2) return n; return fib(n - 2) + fib(n - 1); }
                 print fib(15);"
            ),
            vec!["610"]
        );
    }

    #[test]
    fn test_return_unwinds_loops() {
        assert_eq!(
            output(
                "fun first(limit) { for (var i = 0; ; i = i + 1) { if (i >= limit) return i; } }
                 print first(4);
                 fun nothing() { return; }
                 print nothing();
                 fun implicit() {}
                 print implicit();"
            ),
            vec!["4", "nil", "nil"]
        );
    }

    #[test]
    fn test_closures_capture_by_reference() {
        assert_eq!(
            output("var a = 5; fun addFive(b) { return a + b; } a = 10; print addFive(4);"),
            vec!["14"]
        );
    }

    #[test]
    fn test_nested_closures() {
        assert_eq!(
            output(
                "fun run(a) { var b = 1; fun addB(c) { return c + b + a; } return addB(5); }
                 print run(1);"
            ),
            vec!["7"]
        );
    }

    #[test]
    fn test_counter_closure_keeps_state() {
        assert_eq!(
            output(
                "fun makeCounter() { var i = 0; fun count() { i = i + 1; print i; } return count; }
                 var counter = makeCounter();
                 counter(); counter();
                 var other = makeCounter();
                 other();"
            ),
            vec!["1", "2", "1"]
        );
    }

    #[test]
    fn test_arity_mismatch() {
        let (printed, message) =
            runtime_error("fun f(a) { print a; } print \"before\"; f(1, 2); print \"after\";");

        assert_eq!(printed, vec!["before"]);
        assert_eq!(message, "Expected 1 arguments but got 2.\n[line 1]");
    }

    #[test]
    fn test_calling_a_non_callable() {
        assert_eq!(
            runtime_error("\"text\"();").1,
            "Can only call functions and classes.\n[line 1]"
        );
    }

    #[test]
    fn test_arguments_evaluate_left_to_right() {
        assert_eq!(
            output(
                "var log = \"\";
                 fun mark(x) { log = log + x; return x; }
                 fun three(a, b, c) {}
                 three(mark(1), mark(2), mark(3));
                 print log;"
            ),
            vec!["123"]
        );
    }

    #[test]
    fn test_function_display_and_clock() {
        assert_eq!(
            output("fun f() {} print f; print clock; print clock() > 0;"),
            vec!["<fn f>", "<native fn>", "true"]
        );
    }

    // ───────────────────────── classes ─────────────────────────

    #[test]
    fn test_fields_and_methods() {
        assert_eq!(
            output(
                "class Bagel { eat() { print \"Crunch \" + this.kind; } }
                 var b = Bagel();
                 b.kind = \"sesame\";
                 print b.kind;
                 b.eat();
                 print Bagel;
                 print b;"
            ),
            vec!["sesame", "Crunch sesame", "Bagel", "Bagel instance"]
        );
    }

    #[test]
    fn test_bound_method_remembers_this() {
        assert_eq!(
            output(
                "class Person { sayName() { print this.name; } }
                 var jane = Person(); jane.name = \"Jane\";
                 var bill = Person(); bill.name = \"Bill\";
                 bill.sayName = jane.sayName;
                 bill.sayName();"
            ),
            vec!["Jane"]
        );
    }

    #[test]
    fn test_init_returns_instance() {
        assert_eq!(
            output(
                "class Point {
                   init(x, y) { this.x = x; this.y = y; if (x > 100) return; }
                   sum() { return this.x + this.y; }
                 }
                 var p = Point(1, 2);
                 print p.sum();
                 print p.init(200, 1);
                 print Point(300, 0).x;"
            ),
            vec!["3", "Point instance", "300"]
        );
    }

    #[test]
    fn test_class_arity_comes_from_init() {
        assert_eq!(
            runtime_error("class A { init(a, b) {} } A(1);").1,
            "Expected 2 arguments but got 1.\n[line 1]"
        );
        assert_eq!(
            runtime_error("class B {} B(1);").1,
            "Expected 0 arguments but got 1.\n[line 1]"
        );
    }

    #[test]
    fn test_property_errors() {
        assert_eq!(
            runtime_error("class A {} print A().missing;").1,
            "Undefined property 'missing'.\n[line 1]"
        );
        assert_eq!(
            runtime_error("var x = 1; print x.y;").1,
            "Only instances have properties.\n[line 1]"
        );
        assert_eq!(
            runtime_error("var x = \"s\"; x.y = 2;").1,
            "Only instances have fields.\n[line 1]"
        );
    }

    #[test]
    fn test_method_access_binds_fresh_closure() {
        assert_eq!(
            output("class A { m() {} } var a = A(); print a.m == a.m; var m = a.m; print m == m;"),
            vec!["false", "true"]
        );
    }

    #[test]
    fn test_fields_shadow_methods() {
        assert_eq!(
            output("class A { m() { return 1; } } var a = A(); print a.m(); a.m = 2; print a.m;"),
            vec!["1", "2"]
        );
    }

    #[test]
    fn test_inherited_method() {
        assert_eq!(
            output(
                "class Doughnut { cook() { print \"Fry until golden brown.\"; } }
                 class BostonCream < Doughnut {}
                 BostonCream().cook();"
            ),
            vec!["Fry until golden brown."]
        );
    }

    #[test]
    fn test_super_calls() {
        assert_eq!(
            output(
                "class Doughnut { cook() { print \"Fry until golden brown.\"; } }
                 class BostonCream < Doughnut {
                   cook() { super.cook(); print \"Pipe full of custard and coat with chocolate.\"; }
                 }
                 BostonCream().cook();"
            ),
            vec![
                "Fry until golden brown.",
                "Pipe full of custard and coat with chocolate."
            ]
        );
    }

    #[test]
    fn test_super_skips_overrides_in_deep_chains() {
        assert_eq!(
            output(
                "class A { method() { print \"A method\"; } }
                 class B < A { method() { print \"B method\"; } test() { super.method(); } }
                 class C < B {}
                 C().test();"
            ),
            vec!["A method"]
        );
    }

    #[test]
    fn test_superclass_must_be_a_class() {
        assert_eq!(
            runtime_error("var NotAClass = \"so not\"; class Sub < NotAClass {}").1,
            "Superclass must be a class.\n[line 1]"
        );
    }

    #[test]
    fn test_methods_can_reference_their_class() {
        assert_eq!(
            output(
                "class Node { make() { return Node(); } }
                 print Node().make();"
            ),
            vec!["Node instance"]
        );
    }

    #[test]
    fn test_instances_compare_by_identity() {
        assert_eq!(
            output("class A {} var a = A(); var b = A(); print a == a; print a == b; print A == A;"),
            vec!["true", "false", "true"]
        );
    }

    // ───────────────────────── pipeline ─────────────────────────

    #[test]
    fn test_comments_are_ignored() {
        assert_eq!(output("// comment\nprint 1;"), vec!["1"]);
        assert_eq!(output("/* block */ print 1;"), vec!["1"]);
    }

    #[test]
    fn test_unterminated_block_comment_blocks_execution() {
        let run = run("print 1;\n/* never closed");

        assert_eq!(run.outcome, RunOutcome::StaticError);
        assert_eq!(run.output, Vec::<String>::new());
        assert_eq!(
            run.errors,
            vec!["[line 2] Error: Unterminated block comment."]
        );
    }

    #[test]
    fn test_static_errors_prevent_execution() {
        let run = run("print \"side effect\";\nprint ;");

        assert_eq!(run.outcome, RunOutcome::StaticError);
        assert_eq!(run.outcome.exit_code(), 65);
        assert_eq!(run.output, Vec::<String>::new());
        assert_eq!(
            run.errors,
            vec!["[line 2] Error at ';': Expected expression."]
        );
    }

    #[test]
    fn test_source_must_be_utf8() {
        assert_eq!(lox::source_text(b"print 1;").ok(), Some("print 1;"));
        assert!(matches!(
            lox::source_text(&[0x70, 0xff]),
            Err(rox::error::LoxError::Utf8(_))
        ));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RunOutcome::Success.exit_code(), 0);
        assert_eq!(RunOutcome::StaticError.exit_code(), 65);
        assert_eq!(RunOutcome::RuntimeError.exit_code(), 70);
    }

    #[test]
    fn test_reruns_are_independent() {
        let program = "var count = 0;
                       fun bump() { count = count + 1; return count; }
                       bump(); bump();
                       print count;";

        let first = run(program);
        let second = run(program);

        assert_eq!(first.output, vec!["2"]);
        assert_eq!(first.output, second.output);
        assert!(first.errors.is_empty());
        assert!(second.errors.is_empty());
    }
}
