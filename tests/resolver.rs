#[cfg(test)]
mod resolver_tests {
    use pretty_assertions::assert_eq;

    use rox::expr::{Expr, ExprId};
    use rox::lox;
    use rox::resolver::{Locals, Resolver};
    use rox::sink::{Diagnostics, ErrorSink};
    use rox::stmt::Stmt;

    fn resolve(source: &str) -> (Vec<Stmt>, Locals, Diagnostics) {
        let mut errors = Diagnostics::new();
        let statements = lox::parse(source, &mut errors);
        assert!(!errors.had_error(), "{:?}", errors.messages());

        let locals = Resolver::new(&mut errors).resolve(&statements);
        (statements, locals, errors)
    }

    fn messages(source: &str) -> Vec<String> {
        resolve(source).2.messages()
    }

    /// Id of the variable printed by the first `print` found in `stmt`.
    fn printed_variable(stmt: &Stmt) -> Option<ExprId> {
        match stmt {
            Stmt::Print(Expr::Variable { id, .. }) => Some(*id),
            Stmt::Block(statements) => statements.iter().find_map(printed_variable),
            Stmt::Function(decl) => decl.body.iter().find_map(printed_variable),
            _ => None,
        }
    }

    #[test]
    fn test_local_distances() {
        let (statements, locals, errors) = resolve("{ var a = 1; { { print a; } } }");

        assert!(!errors.had_error());

        let id = printed_variable(&statements[0]).expect("print a");
        assert_eq!(locals.get(id), Some(2));
    }

    #[test]
    fn test_globals_are_not_recorded() {
        let (statements, locals, _) = resolve("var a = 1; print a; { print a; }");

        let id = printed_variable(&statements[2]).expect("print a");
        assert_eq!(locals.get(id), None);
        assert!(locals.is_empty());
    }

    #[test]
    fn test_parameter_distance() {
        let (statements, locals, _) = resolve("fun f(x) { print x; }");

        let id = printed_variable(&statements[0]).expect("print x");
        assert_eq!(locals.get(id), Some(0));
    }

    #[test]
    fn test_own_initializer_is_an_error() {
        assert_eq!(
            messages("var a = 1; { var a = a + 2; }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_global_own_initializer_is_allowed() {
        assert!(messages("var a = a;").is_empty());
    }

    #[test]
    fn test_redeclaration_in_local_scope() {
        assert_eq!(
            messages("{ var a = 1; var a = 2; }"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );

        // globals may be redeclared
        assert!(messages("var a = 1; var a = 2;").is_empty());
    }

    #[test]
    fn test_duplicate_parameters() {
        assert_eq!(
            messages("fun f(a, a) {}"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn test_return_outside_function() {
        assert_eq!(
            messages("return 1;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn test_return_value_from_initializer() {
        assert_eq!(
            messages("class A { init() { return 1; } }"),
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );

        // a bare return is fine
        assert!(messages("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn test_this_outside_class() {
        assert_eq!(
            messages("print this;\nfun f() { this; }"),
            vec![
                "[line 1] Error at 'this': Can't use 'this' outside of a class.",
                "[line 2] Error at 'this': Can't use 'this' outside of a class.",
            ]
        );
    }

    #[test]
    fn test_super_misuse() {
        assert_eq!(
            messages("super.x;\nclass A { f() { super.f(); } }"),
            vec![
                "[line 1] Error at 'super': Can't use 'super' outside of a class.",
                "[line 2] Error at 'super': Can't use 'super' in a class with no superclass.",
            ]
        );
    }

    #[test]
    fn test_class_inheriting_from_itself() {
        assert_eq!(
            messages("class A < A {}"),
            vec!["[line 1] Error at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn test_all_errors_are_reported() {
        let errors = messages("return;\n{ var b; var b; }\nprint this;");

        assert_eq!(errors.len(), 3);
    }
}
