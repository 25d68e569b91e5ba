use super::{Binary, Expr, ExprVisitor, Grouping, Literal, Unary};

/// Renders an expression tree in fully parenthesized prefix form, e.g. `(* (- 123) (group 45.67))`.
pub struct Printer;

impl Printer {
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    fn parenthesize(&mut self, name: &str, expressions: &[&Expr]) -> String {
        let mut s = format!("({}", name);
        for expr in expressions {
            s.push(' ');
            s.push_str(&self.print(expr));
        }
        s + ")"
    }
}

impl ExprVisitor<String> for Printer {
    fn visit_binary(&mut self, binary: &Binary) -> String {
        self.parenthesize(&binary.operator.lexeme, &[&*binary.left, &*binary.right])
    }

    fn visit_grouping(&mut self, grouping: &Grouping) -> String {
        self.parenthesize("group", &[&*grouping.0])
    }

    fn visit_literal(&mut self, literal: &Literal) -> String {
        literal.0.to_string()
    }

    fn visit_unary(&mut self, unary: &Unary) -> String {
        self.parenthesize(&unary.operator.lexeme, &[&*unary.right])
    }
}

#[cfg(test)]
mod test {
    use crate::lox::{
        ast::Expr,
        scanner::tokens::{Token, TokenType, Value},
    };

    use super::Printer;

    fn number(n: f64) -> Expr {
        Expr::literal(Value::Number(n))
    }

    fn minus() -> Token {
        Token::new(TokenType::Minus, "-".to_owned(), None, 0)
    }

    #[test]
    fn test_ast_printer() {
        let operator = Token::new(TokenType::Star, "*".to_owned(), None, 0);
        let expr = Expr::binary(
            Expr::unary(minus(), number(123.)),
            operator,
            Expr::grouping(number(45.67)),
        );
        let mut printer = Printer;
        assert_eq!(printer.print(&expr), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn test_literals() {
        let mut printer = Printer;
        assert_eq!(printer.print(&Expr::literal(Value::Nil)), "nil");
        assert_eq!(printer.print(&Expr::literal(Value::Boolean(true))), "true");
        assert_eq!(
            printer.print(&Expr::literal(Value::String("hi there".to_owned()))),
            "hi there"
        );
        assert_eq!(printer.print(&number(0.25)), "0.25");
    }

    #[test]
    fn test_print_is_deterministic() {
        let expr = Expr::grouping(Expr::binary(number(1.), minus(), number(2.)));
        let mut printer = Printer;
        let first = printer.print(&expr);
        let second = printer.print(&expr);
        assert_eq!(first, second);
        assert_eq!(first, "(group (- 1 2))");
    }

    #[test]
    fn test_different_trees_print_differently() {
        let mut printer = Printer;
        let one_two = printer.print(&Expr::binary(number(1.), minus(), number(2.)));
        let two_one = printer.print(&Expr::binary(number(2.), minus(), number(1.)));
        assert_eq!(one_two, "(- 1 2)");
        assert_eq!(two_one, "(- 2 1)");
        assert_ne!(one_two, two_one);

        let nested = printer.print(&Expr::unary(minus(), Expr::unary(minus(), number(1.))));
        assert_eq!(nested, "(- (- 1))");
    }
}
