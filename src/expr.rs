use std::cell::Cell;

use crate::literal::Literal;
use crate::token::Token;

thread_local! {
    static NEXT_ID: Cell<u64> = Cell::new(0);
}

fn next_id() -> u64 {
    NEXT_ID.with(|cell| {
        let id = cell.get();
        cell.set(id + 1);
        id
    })
}

#[derive(Debug, Clone)]
pub struct VariableData {
    pub id: u64,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct AssignData {
    pub id: u64,
    pub name: Token,
    /// `Some(op)` for a compound assignment (`+=` etc): `value` is the right-hand
    /// operand alone, and the interpreter reads the current binding, applies `op`,
    /// then writes the result back — reading the target exactly once.
    pub op: Option<Token>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct UnaryData {
    pub id: u64,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryData {
    pub id: u64,
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct LogicalData {
    pub id: u64,
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct GroupingData {
    pub id: u64,
    pub expression: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallData {
    pub id: u64,
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct GetData {
    pub id: u64,
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct SetData {
    pub id: u64,
    pub object: Box<Expr>,
    pub name: Token,
    /// See [`AssignData::op`]: `Some(op)` means `value` is the right-hand operand
    /// of a compound assignment, applied against the field's current value after
    /// `object` is evaluated exactly once.
    pub op: Option<Token>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct ThisData {
    pub id: u64,
    pub keyword: Token,
}

#[derive(Debug, Clone)]
pub struct SuperData {
    pub id: u64,
    pub keyword: Token,
    pub method: Token,
}

#[derive(Debug, Clone)]
pub struct RangeData {
    pub id: u64,
    pub start: Box<Expr>,
    pub stop: Box<Expr>,
}

/// An expression node. Every variant other than `Literal` carries a stable
/// `id`, assigned once at construction, used by the resolver's side-table to
/// key on node identity rather than structural shape.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    Variable(VariableData),
    Assign(AssignData),
    Unary(UnaryData),
    Binary(BinaryData),
    Logical(LogicalData),
    Grouping(GroupingData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    This(ThisData),
    Super(SuperData),
    Range(RangeData),
}

impl Expr {
    pub fn id(&self) -> u64 {
        match self {
            Expr::Literal(_) => u64::MAX,
            Expr::Variable(d) => d.id,
            Expr::Assign(d) => d.id,
            Expr::Unary(d) => d.id,
            Expr::Binary(d) => d.id,
            Expr::Logical(d) => d.id,
            Expr::Grouping(d) => d.id,
            Expr::Call(d) => d.id,
            Expr::Get(d) => d.id,
            Expr::Set(d) => d.id,
            Expr::This(d) => d.id,
            Expr::Super(d) => d.id,
            Expr::Range(d) => d.id,
        }
    }

    pub fn variable(name: Token) -> Expr {
        Expr::Variable(VariableData { id: next_id(), name })
    }

    pub fn assign(name: Token, op: Option<Token>, value: Expr) -> Expr {
        Expr::Assign(AssignData { id: next_id(), name, op, value: Box::new(value) })
    }

    pub fn unary(operator: Token, right: Expr) -> Expr {
        Expr::Unary(UnaryData { id: next_id(), operator, right: Box::new(right) })
    }

    pub fn binary(left: Expr, operator: Token, right: Expr) -> Expr {
        Expr::Binary(BinaryData { id: next_id(), left: Box::new(left), operator, right: Box::new(right) })
    }

    pub fn logical(left: Expr, operator: Token, right: Expr) -> Expr {
        Expr::Logical(LogicalData { id: next_id(), left: Box::new(left), operator, right: Box::new(right) })
    }

    pub fn grouping(expression: Expr) -> Expr {
        Expr::Grouping(GroupingData { id: next_id(), expression: Box::new(expression) })
    }

    pub fn call(callee: Expr, paren: Token, arguments: Vec<Expr>) -> Expr {
        Expr::Call(CallData { id: next_id(), callee: Box::new(callee), paren, arguments })
    }

    pub fn get(object: Expr, name: Token) -> Expr {
        Expr::Get(GetData { id: next_id(), object: Box::new(object), name })
    }

    pub fn set(object: Expr, name: Token, op: Option<Token>, value: Expr) -> Expr {
        Expr::Set(SetData { id: next_id(), object: Box::new(object), name, op, value: Box::new(value) })
    }

    pub fn this(keyword: Token) -> Expr {
        Expr::This(ThisData { id: next_id(), keyword })
    }

    pub fn super_(keyword: Token, method: Token) -> Expr {
        Expr::Super(SuperData { id: next_id(), keyword, method })
    }

    pub fn range(start: Expr, stop: Expr) -> Expr {
        Expr::Range(RangeData { id: next_id(), start: Box::new(start), stop: Box::new(stop) })
    }

    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Literal(l) => visitor.visit_literal_expr(l),
            Expr::Variable(d) => visitor.visit_variable_expr(d),
            Expr::Assign(d) => visitor.visit_assign_expr(d),
            Expr::Unary(d) => visitor.visit_unary_expr(d),
            Expr::Binary(d) => visitor.visit_binary_expr(d),
            Expr::Logical(d) => visitor.visit_logical_expr(d),
            Expr::Grouping(d) => visitor.visit_grouping_expr(d),
            Expr::Call(d) => visitor.visit_call_expr(d),
            Expr::Get(d) => visitor.visit_get_expr(d),
            Expr::Set(d) => visitor.visit_set_expr(d),
            Expr::This(d) => visitor.visit_this_expr(d),
            Expr::Super(d) => visitor.visit_super_expr(d),
            Expr::Range(d) => visitor.visit_range_expr(d),
        }
    }
}

pub trait ExprVisitor<T> {
    fn visit_literal_expr(&mut self, data: &Literal) -> T;
    fn visit_variable_expr(&mut self, data: &VariableData) -> T;
    fn visit_assign_expr(&mut self, data: &AssignData) -> T;
    fn visit_unary_expr(&mut self, data: &UnaryData) -> T;
    fn visit_binary_expr(&mut self, data: &BinaryData) -> T;
    fn visit_logical_expr(&mut self, data: &LogicalData) -> T;
    fn visit_grouping_expr(&mut self, data: &GroupingData) -> T;
    fn visit_call_expr(&mut self, data: &CallData) -> T;
    fn visit_get_expr(&mut self, data: &GetData) -> T;
    fn visit_set_expr(&mut self, data: &SetData) -> T;
    fn visit_this_expr(&mut self, data: &ThisData) -> T;
    fn visit_super_expr(&mut self, data: &SuperData) -> T;
    fn visit_range_expr(&mut self, data: &RangeData) -> T;
}

/// A declared parameter, with an optional default evaluated once at
/// function-declaration time in the defining environment.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Token,
    pub default: Option<Expr>,
}
