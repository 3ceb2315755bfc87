#[cfg(test)]
mod parser_tests {
    use pretty_assertions::assert_eq;

    use rox::ast_printer::AstPrinter;
    use rox::expr::Expr;
    use rox::lox;
    use rox::parser::Parser;
    use rox::scanner::Scanner;
    use rox::sink::{Diagnostics, ErrorSink};
    use rox::stmt::Stmt;

    fn parse(source: &str) -> (Vec<Stmt>, Diagnostics) {
        let mut errors = Diagnostics::new();
        let statements = lox::parse(source, &mut errors);
        (statements, errors)
    }

    fn printed(source: &str) -> Vec<String> {
        let (statements, errors) = parse(source);
        assert!(!errors.had_error(), "{:?}", errors.messages());
        statements.iter().map(AstPrinter::print_stmt).collect()
    }

    fn expression(source: &str) -> String {
        let mut errors = Diagnostics::new();
        let tokens = Scanner::new(source).scan_tokens(&mut errors);
        let expr = Parser::new(&tokens, &mut errors)
            .parse_expression()
            .expect("expression should parse");
        AstPrinter::print(&expr)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(expression("1 + 2 * 3"), "(+ 1.0 (* 2.0 3.0))");
        assert_eq!(expression("(1 + 2) * 3"), "(* (group (+ 1.0 2.0)) 3.0)");
        assert_eq!(expression("-1 < 2 == !true"), "(== (< (- 1.0) 2.0) (! true))");
        assert_eq!(expression("a or b and c"), "(or a (and b c))");
    }

    #[test]
    fn test_binary_is_left_associative() {
        assert_eq!(expression("1 - 2 - 3"), "(- (- 1.0 2.0) 3.0)");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(expression("a = b = 1"), "(= a (= b 1.0))");
    }

    #[test]
    fn test_literals() {
        assert_eq!(expression("null"), "nil");
        assert_eq!(expression("\"hi\""), "hi");
        assert_eq!(expression("12.5"), "12.5");
    }

    #[test]
    fn test_calls_and_properties() {
        assert_eq!(expression("f(1)(2, 3)"), "(call (call f 1.0) 2.0 3.0)");
        assert_eq!(expression("a.b.c = 4"), "(= (. (. a b) c) 4.0)");
        assert_eq!(expression("super.cook"), "(super cook)");
    }

    #[test]
    fn test_statements() {
        assert_eq!(
            printed("var a = 1; var b; print a; { a; }"),
            vec![
                "(var a 1.0)",
                "(var b)",
                "(print a)",
                "(block (; a))",
            ]
        );
    }

    #[test]
    fn test_if_and_while() {
        assert_eq!(
            printed("if (a) print 1; else print 2; while (b) b = false;"),
            vec![
                "(if-else a (print 1.0) (print 2.0))",
                "(while b (; (= b false)))",
            ]
        );
    }

    #[test]
    fn test_for_is_desugared() {
        assert_eq!(
            printed("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec!["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
        );

        assert_eq!(printed("for (;;) print 1;"), vec!["(while true (print 1.0))"]);
    }

    #[test]
    fn test_functions_and_classes() {
        assert_eq!(
            printed("fun add(a, b) { return a + b; } class B < A { init(x) { this.x = x; } }"),
            vec![
                "(fun add(a b) (return (+ a b)))",
                "(class B < A (method init(x) (; (= (. this x) x))))",
            ]
        );
    }

    #[test]
    fn test_variable_ids_are_distinct() {
        let (statements, _) = parse("a; a = b;");

        let Stmt::Expression(Expr::Variable { id: first, .. }) = &statements[0] else {
            panic!("expected variable statement");
        };
        let Stmt::Expression(Expr::Assign { id: second, value, .. }) = &statements[1] else {
            panic!("expected assignment statement");
        };
        let Expr::Variable { id: third, .. } = value.as_ref() else {
            panic!("expected variable value");
        };

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[test]
    fn test_error_recovery_keeps_later_statements() {
        let (statements, errors) = parse("var = 1; print 2; print (3;\nprint 4;");

        assert_eq!(
            errors.messages(),
            vec![
                "[line 1] Error at '=': Expected variable name.",
                "[line 1] Error at ';': Expected ')' after expression.",
            ]
        );

        let printed: Vec<String> = statements.iter().map(AstPrinter::print_stmt).collect();
        assert_eq!(printed, vec!["(print 2.0)", "(print 4.0)"]);
    }

    #[test]
    fn test_error_at_end() {
        let (_, errors) = parse("print 1");

        assert_eq!(
            errors.messages(),
            vec!["[line 1] Error at end: Expected ';' after value."]
        );
    }

    #[test]
    fn test_invalid_assignment_target() {
        let (statements, errors) = parse("1 + 2 = 3; print 4;");

        assert_eq!(
            errors.messages(),
            vec!["[line 1] Error at '=': Invalid assignment target."]
        );
        // the statement itself is still complete
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_too_many_arguments() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));

        let (statements, errors) = parse(&source);

        assert_eq!(errors.errors().len(), 1);
        assert!(errors.messages()[0].ends_with("Can't have more than 255 arguments."));
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_too_many_parameters() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let (_, errors) = parse(&source);

        assert_eq!(
            errors.messages(),
            vec!["[line 1] Error at 'p255': Can't have more than 255 parameters."]
        );
    }

    #[test]
    fn test_parse_expression_rejects_trailing_input() {
        let mut errors = Diagnostics::new();
        let tokens = Scanner::new("1 2").scan_tokens(&mut errors);

        assert!(Parser::new(&tokens, &mut errors).parse_expression().is_none());
        assert_eq!(
            errors.messages(),
            vec!["[line 1] Error at '2': Expected end of expression."]
        );
    }
}
