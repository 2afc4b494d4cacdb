use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{Error, RuntimeError};
use crate::expr::{Expr, ExprVisitor};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::{Token, Type};

/// What propagates out of statement execution besides a clean finish:
/// either a `return` unwinding out of the enclosing call, or an error.
/// Both travel the same `Result::Err` channel so `?` threads them uniformly.
pub enum Unwind {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

/// Walks the AST against a chain of environments anchored by `globals`.
/// Variable and `this` references resolved by the `Resolver` are looked up
/// by recorded depth; everything else falls back to a global lookup.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<Token, usize>,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::globals() {
            globals.borrow_mut().define(native.name, Object::from(native));
        }

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new() }
    }

    /// Records that `name`, at the AST position it appears, resolves to the
    /// environment `depth` hops up from wherever it's evaluated.
    pub fn resolve(&mut self, name: &Token, depth: usize) {
        self.locals.insert(name.clone(), depth);
    }

    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(Unwind::Error(error)) = self.execute(statement) {
                error.throw();
                return;
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        expr.accept(self)
    }

    /// Executes `statements` with `environment` as the active scope, then
    /// restores whatever scope was active before, on every exit path.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> Result<(), Unwind> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(());
        for stmt in statements {
            if let Err(unwind) = self.execute(stmt) {
                result = Err(unwind);
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn lookup_variable(&self, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(name) {
            Some(distance) => self.environment.borrow().get_at(*distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn number_operand(operator: &Token, operand: &Object) -> Result<f64, RuntimeError> {
        match operand {
            Object::Literal(Literal::Number(n)) => Ok(*n),
            _ => Err(RuntimeError { token: operator.clone(), message: "Operand must be a number.".to_string() }),
        }
    }

    fn number_operands(operator: &Token, left: &Object, right: &Object) -> Result<(f64, f64), RuntimeError> {
        match (left, right) {
            (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Ok((*l, *r)),
            _ => Err(RuntimeError { token: operator.clone(), message: "Operands must be numbers.".to_string() }),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprVisitor<Result<Object, Unwind>> for Interpreter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> Result<Object, Unwind> {
        Ok(Object::from(literal.clone()))
    }

    fn visit_logical_expr(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        let Expr::Logical(logical) = expr else { unreachable!() };

        let left = self.evaluate(&logical.left)?;

        if logical.operator.r#type == Type::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(&logical.right)
    }

    fn visit_unary_expr(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        let Expr::Unary(unary) = expr else { unreachable!() };

        let right = self.evaluate(&unary.expr)?;

        match unary.operator.r#type {
            Type::Minus => Ok(Object::from(-Self::number_operand(&unary.operator, &right)?)),
            Type::Bang => Ok(Object::from(!right.is_truthy())),
            _ => unreachable!("parser only produces '-' or '!' as unary operators"),
        }
    }

    fn visit_binary_expr(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        let Expr::Binary(binary) = expr else { unreachable!() };

        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;
        let operator = &binary.operator;

        match operator.r#type {
            Type::Plus => match (&left, &right) {
                (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Ok(Object::from(l + r)),
                (Object::Literal(Literal::String(l)), Object::Literal(Literal::String(r))) => {
                    Ok(Object::from(format!("{l}{r}")))
                }
                _ => Err(Unwind::from(RuntimeError {
                    token: operator.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                })),
            },
            Type::Minus => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Ok(Object::from(l - r))
            }
            Type::Star => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Ok(Object::from(l * r))
            }
            Type::Slash => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                if r == 0.0 {
                    return Err(Unwind::from(RuntimeError {
                        token: operator.clone(),
                        message: "Cannot divide by zero.".to_string(),
                    }));
                }
                Ok(Object::from(l / r))
            }
            Type::Greater => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Ok(Object::from(l > r))
            }
            Type::GreaterEqual => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Ok(Object::from(l >= r))
            }
            Type::Less => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Ok(Object::from(l < r))
            }
            Type::LessEqual => {
                let (l, r) = Self::number_operands(operator, &left, &right)?;
                Ok(Object::from(l <= r))
            }
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!("parser only produces binary operators here"),
        }
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        let Expr::Grouping(grouping) = expr else { unreachable!() };

        self.evaluate(&grouping.expr)
    }

    fn visit_variable_expr(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        let Expr::Variable(variable) = expr else { unreachable!() };

        Ok(self.lookup_variable(&variable.name)?)
    }

    fn visit_assign_expr(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        let Expr::Assign(assign) = expr else { unreachable!() };

        let value = self.evaluate(&assign.value)?;

        match self.locals.get(&assign.name) {
            Some(distance) => self.environment.borrow_mut().assign_at(*distance, &assign.name, value.clone()),
            None => self.globals.borrow_mut().assign(&assign.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        let Expr::Call(call) = expr else { unreachable!() };

        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        match callee {
            Object::Function(function) => {
                Self::check_arity(&call.paren, function.arity(), arguments.len())?;
                Ok(function.call(self, arguments)?)
            }
            Object::NativeFunction(native) => {
                Self::check_arity(&call.paren, native.arity(), arguments.len())?;
                Ok(native.call(self, arguments)?)
            }
            Object::Class(class) => {
                let arity = class.borrow().arity();
                Self::check_arity(&call.paren, arity, arguments.len())?;

                let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(&class))));
                let instance_object = Object::from(Rc::clone(&instance));

                if let Some(initializer) = class.borrow().find_method("init") {
                    initializer.bind(instance_object.clone()).call(self, arguments)?;
                }

                Ok(instance_object)
            }
            _ => Err(Unwind::from(RuntimeError {
                token: call.paren.clone(),
                message: "Can only call functions and classes.".to_string(),
            })),
        }
    }

    fn visit_get_expr(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        let Expr::Get(get) = expr else { unreachable!() };

        let object = self.evaluate(&get.object)?;

        if let Object::Instance(instance) = &object {
            return Ok(instance.borrow().get(&get.name, &object)?);
        }

        Err(Unwind::from(RuntimeError { token: get.name.clone(), message: "Only instances have properties.".to_string() }))
    }

    fn visit_set_expr(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        let Expr::Set(set) = expr else { unreachable!() };

        let object = self.evaluate(&set.object)?;

        let Object::Instance(instance) = object else {
            return Err(Unwind::from(RuntimeError {
                token: set.name.clone(),
                message: "Only instances have fields.".to_string(),
            }));
        };

        let value = self.evaluate(&set.value)?;
        instance.borrow_mut().set(&set.name, value.clone());

        Ok(value)
    }

    fn visit_this_expr(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        let Expr::This(this) = expr else { unreachable!() };

        Ok(self.lookup_variable(&this.keyword)?)
    }
}

impl Interpreter {
    fn check_arity(paren: &Token, expected: usize, got: usize) -> Result<(), RuntimeError> {
        if expected != got {
            return Err(RuntimeError { token: paren.clone(), message: format!("Expected {expected} arguments but got {got}.") });
        }
        Ok(())
    }
}

impl StmtVisitor<Result<(), Unwind>> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Expression(data) = stmt else { unreachable!() };

        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Print(data) = stmt else { unreachable!() };

        let value = self.evaluate(&data.expr)?;
        println!("{value}");
        Ok(())
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Var(data) = stmt else { unreachable!() };

        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Block(data) = stmt else { unreachable!() };

        let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        self.execute_block(&data.statements, scope)
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::If(data) = stmt else { unreachable!() };

        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::While(data) = stmt else { unreachable!() };

        while self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.body)?;
        }
        Ok(())
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Function(data) = stmt else { unreachable!() };

        let function = Function {
            name: data.name.clone(),
            params: data.params.clone(),
            body: Rc::new(data.body.clone()),
            closure: Rc::clone(&self.environment),
            is_initializer: false,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Return(data) = stmt else { unreachable!() };

        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::from(Literal::Nil),
        };

        Err(Unwind::Return(value))
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Class(data) = stmt else { unreachable!() };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        let mut methods = HashMap::new();
        for method in &data.methods {
            let Stmt::Function(method_data) = method else { unreachable!() };

            let function = Function {
                name: method_data.name.clone(),
                params: method_data.params.clone(),
                body: Rc::new(method_data.body.clone()),
                closure: Rc::clone(&self.environment),
                is_initializer: method_data.name.lexeme == "init",
            };

            methods.insert(method_data.name.lexeme.clone(), function);
        }

        let class = Rc::new(RefCell::new(Class::new(data.name.lexeme.clone(), methods)));

        self.environment.borrow_mut().assign(&data.name, Object::from(class))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::token::Location;

    fn token(r#type: Type, lexeme: &str) -> Token {
        Token::new(r#type, lexeme.to_string(), None, Location::new(1, 0))
    }

    fn eval(interpreter: &mut Interpreter, expr: &Expr) -> Object {
        match expr.accept(interpreter) {
            Ok(value) => value,
            Err(Unwind::Error(error)) => panic!("unexpected runtime error: {}", error.message),
            Err(Unwind::Return(_)) => panic!("unexpected return outside a call"),
        }
    }

    #[test]
    fn evaluate_literal() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Literal(Literal::Number(12.0));
        assert_eq!(eval(&mut interpreter, &expr), Object::from(12.0));
    }

    #[test]
    fn evaluate_unary_negate() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Unary(crate::expr::UnaryData {
            operator: token(Type::Minus, "-"),
            expr: Box::new(Expr::Literal(Literal::Number(12.0))),
        });
        assert_eq!(eval(&mut interpreter, &expr), Object::from(-12.0));
    }

    #[test]
    fn evaluate_binary_arithmetic() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Binary(crate::expr::BinaryData {
            left: Box::new(Expr::Literal(Literal::Number(1.0))),
            operator: token(Type::Plus, "+"),
            right: Box::new(Expr::Binary(crate::expr::BinaryData {
                left: Box::new(Expr::Literal(Literal::Number(2.0))),
                operator: token(Type::Star, "*"),
                right: Box::new(Expr::Literal(Literal::Number(3.0))),
            })),
        });
        assert_eq!(eval(&mut interpreter, &expr), Object::from(7.0));
    }

    #[test]
    fn string_concatenation() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Binary(crate::expr::BinaryData {
            left: Box::new(Expr::Literal(Literal::String("Hello, ".to_string()))),
            operator: token(Type::Plus, "+"),
            right: Box::new(Expr::Literal(Literal::String("world".to_string()))),
        });
        assert_eq!(eval(&mut interpreter, &expr), Object::from("Hello, world"));
    }

    #[test]
    fn division_by_zero_errors() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Binary(crate::expr::BinaryData {
            left: Box::new(Expr::Literal(Literal::Number(1.0))),
            operator: token(Type::Slash, "/"),
            right: Box::new(Expr::Literal(Literal::Number(0.0))),
        });
        match expr.accept(&mut interpreter) {
            Err(Unwind::Error(error)) => assert_eq!(error.message, "Cannot divide by zero."),
            other => panic!("expected a divide-by-zero error, got a value instead: {:?}", other.is_ok()),
        }
    }

    #[test]
    fn logical_or_short_circuits() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Logical(crate::expr::LogicalData {
            left: Box::new(Expr::Literal(Literal::Bool(true))),
            operator: token(Type::Or, "or"),
            right: Box::new(Expr::Literal(Literal::Bool(false))),
        });
        assert_eq!(eval(&mut interpreter, &expr), Object::from(true));
    }
}
