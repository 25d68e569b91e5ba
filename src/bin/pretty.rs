use loxfront::lox::{
    ast::{printer::Printer, Expr},
    scanner::{Token, TokenType, Value},
};

fn main() {
    let expr = Expr::binary(
        Expr::unary(
            Token::new(TokenType::Minus, "-".to_owned(), None, 0),
            Expr::literal(Value::Number(123.)),
        ),
        Token::new(TokenType::Star, "*".to_owned(), None, 0),
        Expr::grouping(Expr::literal(Value::Number(45.67))),
    );

    println!("{}", Printer.print(&expr));
}
