use crate::lox::scanner::tokens::{Token, Value};

pub mod printer;

/// An expression tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(Binary),
    Grouping(Grouping),
    Literal(Literal),
    Unary(Unary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

impl Binary {
    pub fn new(left: Expr, operator: Token, right: Expr) -> Self {
        Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grouping(pub Box<Expr>);

impl Grouping {
    pub fn new(expression: Expr) -> Self {
        Grouping(Box::new(expression))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal(pub Value);

impl Literal {
    pub fn new(value: Value) -> Self {
        Literal(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: Token,
    pub right: Box<Expr>,
}

impl Unary {
    pub fn new(operator: Token, right: Expr) -> Self {
        Unary {
            operator,
            right: Box::new(right),
        }
    }
}

impl Expr {
    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary(Binary::new(left, operator, right))
    }

    pub fn grouping(expression: Expr) -> Self {
        Expr::Grouping(Grouping::new(expression))
    }

    pub fn literal(value: Value) -> Self {
        Expr::Literal(Literal::new(value))
    }

    pub fn unary(operator: Token, right: Expr) -> Self {
        Expr::Unary(Unary::new(operator, right))
    }

    /// Hand this node to the `visitor` method for its own variant and return what it returns.
    pub fn accept<T, V>(&self, visitor: &mut V) -> T
    where
        V: ExprVisitor<T> + ?Sized,
    {
        match self {
            Expr::Binary(binary) => visitor.visit_binary(binary),
            Expr::Grouping(grouping) => visitor.visit_grouping(grouping),
            Expr::Literal(literal) => visitor.visit_literal(literal),
            Expr::Unary(unary) => visitor.visit_unary(unary),
        }
    }
}

/// An operation over expression trees, one method per node variant.
///
/// New operations only need to implement this trait; the node types stay untouched.
pub trait ExprVisitor<T> {
    fn visit_binary(&mut self, binary: &Binary) -> T;
    fn visit_grouping(&mut self, grouping: &Grouping) -> T;
    fn visit_literal(&mut self, literal: &Literal) -> T;
    fn visit_unary(&mut self, unary: &Unary) -> T;
}
