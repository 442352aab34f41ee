use crate::expr::{
    AssignData, BinaryData, CallData, Expr, ExprVisitor, GetData, GroupingData, LogicalData,
    RangeData, SetData, SuperData, ThisData, UnaryData, VariableData,
};
use crate::literal::Literal;
use crate::stmt::{
    BlockData, ClassData, ExpressionData, ForData, FunctionData, IfData, PrintData, ReturnData,
    Stmt, StmtVisitor, VarData, WhileData,
};

/// Returns a string representation of the expression in paranthesize.
macro_rules! parenthesize {
    ( $self:ident, $name:expr, $( $x:expr ),+ ) => {
        {
            let mut string = String::new();
            string += "(";
            string += $name;
            $(
                string += " ";
                string += &$x.accept($self);
            )*
            string += ")";

            string
        }
    };
}

pub struct ASTPrinter;

impl ASTPrinter {
    /// Prints the expression using visitor pattern.
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    /// Prints a whole program, one parenthesized form per statement.
    pub fn print_program(&mut self, statements: &[Stmt]) -> String {
        statements.iter().map(|stmt| stmt.accept(self)).collect::<Vec<String>>().join("\n")
    }
}

impl ExprVisitor<String> for ASTPrinter {
    fn visit_literal_expr(&mut self, data: &Literal) -> String {
        data.to_string()
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> String {
        data.name.lexeme.clone()
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> String {
        let op = data.op.as_ref().map(|t| t.lexeme.as_str()).unwrap_or("=");
        parenthesize!(self, format!("{op} {}", &data.name.lexeme).as_str(), &data.value)
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> String {
        parenthesize!(self, &data.operator.lexeme, &data.right)
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> String {
        parenthesize!(self, &data.operator.lexeme, &data.left, &data.right)
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> String {
        parenthesize!(self, &data.operator.lexeme, &data.left, &data.right)
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> String {
        parenthesize!(self, "group", &data.expression)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> String {
        let mut string = String::new();
        string += &data.callee.accept(self);
        string += "(";
        for (i, arg) in data.arguments.iter().enumerate() {
            if i > 0 {
                string += " ";
            }
            string += &arg.accept(self);
        }
        string += ")";
        string
    }

    fn visit_get_expr(&mut self, data: &GetData) -> String {
        format!("(get {} {})", data.object.accept(self), data.name.lexeme)
    }

    fn visit_set_expr(&mut self, data: &SetData) -> String {
        let op = data.op.as_ref().map(|t| t.lexeme.as_str()).unwrap_or("=");
        format!("(set{op} {} {} {})", data.object.accept(self), data.name.lexeme, data.value.accept(self))
    }

    fn visit_this_expr(&mut self, _data: &ThisData) -> String {
        String::from("this")
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> String {
        format!("(super {})", data.method.lexeme)
    }

    fn visit_range_expr(&mut self, data: &RangeData) -> String {
        parenthesize!(self, "range", &data.start, &data.stop)
    }
}

impl StmtVisitor<String> for ASTPrinter {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> String {
        parenthesize!(self, "expr", &data.expr)
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> String {
        parenthesize!(self, "print", &data.expr)
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> String {
        match &data.initializer {
            Some(initializer) => format!("(var {} = {})", data.name.lexeme, initializer.accept(self)),
            None => format!("(var {})", data.name.lexeme),
        }
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> String {
        let mut string = String::from("{");
        for stmt in &data.statements {
            string += " ";
            string += &stmt.accept(self);
        }
        string += " }";
        string
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> String {
        let mut string = String::from("(if");
        for (condition, branch) in &data.conditions {
            string += " ";
            string += &condition.accept(self);
            string += " ";
            string += &branch.accept(self);
        }
        if let Some(else_branch) = &data.else_branch {
            string += " else ";
            string += &else_branch.accept(self);
        }
        string += ")";
        string
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> String {
        parenthesize!(self, "while", &data.condition, &data.body)
    }

    fn visit_for_stmt(&mut self, data: &ForData) -> String {
        format!(
            "(for {} of {} {})",
            data.iter_var.lexeme,
            data.iterable.accept(self),
            data.body.accept(self)
        )
    }

    fn visit_function_stmt(&mut self, data: &FunctionData) -> String {
        let mut string = String::new();
        string += "(declare ";
        string += &data.name.lexeme;
        string += "(";
        for (i, param) in data.params.iter().enumerate() {
            if i > 0 {
                string += " ";
            }
            string += &param.name.lexeme;
            if let Some(default) = &param.default {
                string += "=";
                string += &default.accept(self);
            }
        }
        string += ") { ";
        string += &data.body.iter().map(|stmt| stmt.accept(self)).collect::<Vec<String>>().join(" ");
        string += " })";
        string
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> String {
        match &data.value {
            Some(value) => parenthesize!(self, "return", value),
            None => String::from("(return)"),
        }
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> String {
        let mut string = String::from("(class ");
        string += &data.name.lexeme;
        if let Some(superclass) = &data.superclass {
            string += " < ";
            string += &superclass.accept(self);
        }
        string += " ";
        string += &data.methods.iter().map(|stmt| stmt.accept(self)).collect::<Vec<String>>().join(" ");
        string += ")";
        string
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn print_source(source: &str) -> String {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();
        let mut parser = Parser::new(tokens);
        let statements = parser.parse();
        ASTPrinter.print_program(&statements)
    }

    #[test]
    fn precedence_is_visible_in_the_parenthesized_form() {
        assert_eq!(print_source("1 + 2 * 3;"), "(expr (+ 1 (* 2 3)))");
    }

    #[test]
    fn grouping_overrides_precedence() {
        assert_eq!(print_source("(1 + 2) * 3;"), "(expr (* (group (+ 1 2)) 3))");
    }

    #[test]
    fn same_shape_reparsed_twice_prints_identically() {
        let a = print_source("a.b(1, 2).c = 3;");
        let b = print_source("a.b(1, 2).c = 3;");
        assert_eq!(a, b);
    }
}
