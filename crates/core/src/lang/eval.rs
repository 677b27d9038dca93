use std::{cell::RefCell, rc::Rc};

use thiserror::Error;

use crate::lang::{
    ast::{Block, Expr, Infix, Prefix, Program, Stmt},
    builtins::Builtin,
    env::Environment,
    value::Value,
};
use crate::scrollback::ConsoleLevel;

#[derive(Error, Debug, PartialEq)]
pub enum EvalError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("type mismatch: {left} {op} {right}")]
    TypeMismatch {
        left: String,
        op: String,
        right: String,
    },
    #[error("unknown operator: {0}")]
    UnknownOperator(String),
    #[error("not a function: {0}")]
    NotAFunction(String),
    #[error("cannot index {container} with {index}")]
    InvalidIndex { container: String, index: String },
    #[error("cannot read property {property} of {value}")]
    InvalidPropertyAccess { property: String, value: String },
    #[error("wrong number of arguments: expected {expected}, got {got}")]
    WrongArity { expected: usize, got: usize },
    #[error("cannot get length of {0}")]
    NoLength(String),
}

/// Receiver for console output emitted while a submission evaluates. The
/// evaluator never touches global state; whoever runs it decides where the
/// captured calls go.
pub trait ConsoleSink {
    fn emit(&mut self, level: ConsoleLevel, args: &[Value]);
}

/// A sink that drops everything, for contexts without a printer.
pub struct NullSink;

impl ConsoleSink for NullSink {
    fn emit(&mut self, _level: ConsoleLevel, _args: &[Value]) {}
}

// Distinguishes a block's trailing value from an explicit `return` that has
// to unwind the enclosing function.
enum Flow {
    Normal(Value),
    Return(Value),
}

pub struct Evaluator {
    environment: Rc<RefCell<Environment>>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {
            environment: Rc::new(RefCell::new(Environment::new())),
        }
    }

    /// Evaluates a program against the persistent environment. The result is
    /// the last statement's value, `undefined` for an empty program.
    pub fn eval(
        &mut self,
        program: &Program,
        sink: &mut dyn ConsoleSink,
    ) -> Result<Value, EvalError> {
        let mut result = Value::Undefined;

        for statement in program {
            match self.eval_statement(statement, sink)? {
                Flow::Return(value) => return Ok(value),
                Flow::Normal(value) => result = value,
            }
        }

        Ok(result)
    }

    fn eval_statement(
        &mut self,
        statement: &Stmt,
        sink: &mut dyn ConsoleSink,
    ) -> Result<Flow, EvalError> {
        match statement {
            Stmt::Expression(expression) => {
                Ok(Flow::Normal(self.eval_expression(expression, sink)?))
            }
            Stmt::Return(Some(expression)) => {
                Ok(Flow::Return(self.eval_expression(expression, sink)?))
            }
            Stmt::Return(None) => Ok(Flow::Return(Value::Undefined)),
        }
    }

    fn eval_block(&mut self, block: &Block, sink: &mut dyn ConsoleSink) -> Result<Flow, EvalError> {
        let mut result = Value::Undefined;

        for statement in block {
            match self.eval_statement(statement, sink)? {
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal(value) => result = value,
            }
        }

        Ok(Flow::Normal(result))
    }

    fn eval_expression(
        &mut self,
        expression: &Expr,
        sink: &mut dyn ConsoleSink,
    ) -> Result<Value, EvalError> {
        match expression {
            Expr::Undefined => Ok(Value::Undefined),
            Expr::Null => Ok(Value::Null),
            Expr::Bool(boolean) => Ok(Value::Bool(*boolean)),
            Expr::Num(num) => Ok(Value::Num(*num)),
            Expr::Str(string) => Ok(Value::Str(string.clone())),
            Expr::Identifier(name) => self.eval_identifier(name),
            Expr::Array(elements) => {
                let elements = elements
                    .iter()
                    .map(|el| self.eval_expression(el, sink))
                    .collect::<Result<Vec<Value>, EvalError>>()?;
                Ok(Value::Array(elements))
            }
            Expr::Object(pairs) => {
                let mut evaluated = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    evaluated.push((key.clone(), self.eval_expression(value, sink)?));
                }
                Ok(Value::Object(evaluated))
            }
            Expr::Assign { name, value } => {
                let value = self.eval_expression(value, sink)?;
                self.environment.borrow_mut().assign(name, value.clone());
                Ok(value)
            }
            Expr::Prefix(prefix, right) => {
                let right = self.eval_expression(right, sink)?;
                self.eval_prefix_expression(*prefix, right)
            }
            Expr::Infix(left, infix, right) => self.eval_infix_expression(left, *infix, right, sink),
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval_expression(condition, sink)?;
                if condition.is_truthy() {
                    match self.eval_block(consequence, sink)? {
                        Flow::Normal(value) | Flow::Return(value) => Ok(value),
                    }
                } else if let Some(alternative) = alternative {
                    match self.eval_block(alternative, sink)? {
                        Flow::Normal(value) | Flow::Return(value) => Ok(value),
                    }
                } else {
                    Ok(Value::Undefined)
                }
            }
            Expr::Function { parameters, body } => Ok(Value::Function {
                parameters: parameters.clone(),
                body: body.clone(),
                environment: Rc::clone(&self.environment),
            }),
            Expr::Call {
                function,
                arguments,
            } => {
                let function = self.eval_expression(function, sink)?;
                let arguments = arguments
                    .iter()
                    .map(|arg| self.eval_expression(arg, sink))
                    .collect::<Result<Vec<Value>, EvalError>>()?;
                self.eval_call(function, arguments, sink)
            }
            Expr::Index { object, index } => {
                let object = self.eval_expression(object, sink)?;
                let index = self.eval_expression(index, sink)?;
                self.eval_index(object, index)
            }
            Expr::Member { object, property } => {
                let object = self.eval_expression(object, sink)?;
                match object {
                    Value::Object(pairs) => Ok(pairs
                        .into_iter()
                        .find(|(key, _)| key == property)
                        .map(|(_, value)| value)
                        .unwrap_or(Value::Undefined)),
                    other => Err(EvalError::InvalidPropertyAccess {
                        property: property.clone(),
                        value: other.to_string(),
                    }),
                }
            }
        }
    }

    fn eval_identifier(&self, name: &str) -> Result<Value, EvalError> {
        if let Some(value) = self.environment.borrow().get(name) {
            return Ok(value);
        }
        if let Some(builtin) = Builtin::lookup(name) {
            return Ok(Value::Builtin(builtin));
        }
        Err(EvalError::IdentifierNotFound(name.to_string()))
    }

    fn eval_prefix_expression(&self, prefix: Prefix, right: Value) -> Result<Value, EvalError> {
        match prefix {
            Prefix::Not => Ok(Value::Bool(!right.is_truthy())),
            Prefix::Minus => match right {
                Value::Num(num) => Ok(Value::Num(-num)),
                other => Err(EvalError::UnknownOperator(format!("-{other}"))),
            },
        }
    }

    fn eval_infix_expression(
        &mut self,
        left: &Expr,
        infix: Infix,
        right: &Expr,
        sink: &mut dyn ConsoleSink,
    ) -> Result<Value, EvalError> {
        // && and || short-circuit and yield the deciding operand
        if let Infix::And | Infix::Or = infix {
            let left = self.eval_expression(left, sink)?;
            let take_right = match infix {
                Infix::And => left.is_truthy(),
                _ => !left.is_truthy(),
            };
            return if take_right {
                self.eval_expression(right, sink)
            } else {
                Ok(left)
            };
        }

        let left = self.eval_expression(left, sink)?;
        let right = self.eval_expression(right, sink)?;

        match infix {
            Infix::Equal => Ok(Value::Bool(left == right)),
            Infix::NotEqual => Ok(Value::Bool(left != right)),
            Infix::Plus => match (&left, &right) {
                (Value::Num(l), Value::Num(r)) => Ok(Value::Num(l + r)),
                (Value::Str(_), _) | (_, Value::Str(_)) => {
                    Ok(Value::Str(format!("{left}{right}")))
                }
                _ => Err(Self::type_mismatch(&left, infix, &right)),
            },
            Infix::Minus | Infix::Multiply | Infix::Divide | Infix::Modulo => {
                match (&left, &right) {
                    (Value::Num(l), Value::Num(r)) => {
                        Ok(Value::Num(Self::eval_arithmetic(*l, infix, *r)))
                    }
                    _ => Err(Self::type_mismatch(&left, infix, &right)),
                }
            }
            Infix::LessThan
            | Infix::GreaterThan
            | Infix::LessThanEqual
            | Infix::GreaterThanEqual => match (&left, &right) {
                (Value::Num(l), Value::Num(r)) => Ok(Value::Bool(Self::compare(*l, infix, *r))),
                (Value::Str(l), Value::Str(r)) => Ok(Value::Bool(Self::compare(l, infix, r))),
                _ => Err(Self::type_mismatch(&left, infix, &right)),
            },
            Infix::And | Infix::Or => unreachable!("short-circuited above"),
        }
    }

    fn eval_arithmetic(left: f64, infix: Infix, right: f64) -> f64 {
        match infix {
            Infix::Minus => left - right,
            Infix::Multiply => left * right,
            Infix::Divide => left / right,
            Infix::Modulo => left % right,
            _ => unreachable!(),
        }
    }

    fn compare<T: PartialOrd>(left: T, infix: Infix, right: T) -> bool {
        match infix {
            Infix::LessThan => left < right,
            Infix::GreaterThan => left > right,
            Infix::LessThanEqual => left <= right,
            Infix::GreaterThanEqual => left >= right,
            _ => unreachable!(),
        }
    }

    fn type_mismatch(left: &Value, infix: Infix, right: &Value) -> EvalError {
        EvalError::TypeMismatch {
            left: left.to_string(),
            op: infix.to_string(),
            right: right.to_string(),
        }
    }

    fn eval_call(
        &mut self,
        function: Value,
        arguments: Vec<Value>,
        sink: &mut dyn ConsoleSink,
    ) -> Result<Value, EvalError> {
        match function {
            Value::Function {
                parameters,
                body,
                environment,
            } => {
                let mut enclosed = Environment::new_enclosed(environment);

                // missing arguments bind to undefined; extras are dropped
                for (i, name) in parameters.iter().enumerate() {
                    let value = arguments.get(i).cloned().unwrap_or(Value::Undefined);
                    enclosed.define(name.clone(), value);
                }

                let current = Rc::clone(&self.environment);
                self.environment = Rc::new(RefCell::new(enclosed));
                let evaluated = self.eval_block(&body, sink);
                self.environment = current;

                match evaluated? {
                    Flow::Normal(value) | Flow::Return(value) => Ok(value),
                }
            }
            Value::Builtin(builtin) => self.eval_builtin(builtin, arguments, sink),
            other => Err(EvalError::NotAFunction(other.to_string())),
        }
    }

    fn eval_builtin(
        &mut self,
        builtin: Builtin,
        arguments: Vec<Value>,
        sink: &mut dyn ConsoleSink,
    ) -> Result<Value, EvalError> {
        match builtin {
            Builtin::Console(level) => {
                sink.emit(level, &arguments);
                Ok(Value::Undefined)
            }
            Builtin::TypeOf => {
                let argument = Self::single_argument(&arguments)?;
                Ok(Value::Str(argument.type_name().to_string()))
            }
            Builtin::Len => {
                let argument = Self::single_argument(&arguments)?;
                match argument {
                    Value::Str(string) => Ok(Value::Num(string.chars().count() as f64)),
                    Value::Array(elements) => Ok(Value::Num(elements.len() as f64)),
                    Value::Object(pairs) => Ok(Value::Num(pairs.len() as f64)),
                    other => Err(EvalError::NoLength(other.type_name().to_string())),
                }
            }
        }
    }

    fn single_argument(arguments: &[Value]) -> Result<&Value, EvalError> {
        match arguments {
            [argument] => Ok(argument),
            _ => Err(EvalError::WrongArity {
                expected: 1,
                got: arguments.len(),
            }),
        }
    }

    fn eval_index(&self, object: Value, index: Value) -> Result<Value, EvalError> {
        match (&object, &index) {
            (Value::Array(elements), Value::Num(num)) => {
                if num.fract() != 0.0 || *num < 0.0 {
                    return Ok(Value::Undefined);
                }
                Ok(elements
                    .get(*num as usize)
                    .cloned()
                    .unwrap_or(Value::Undefined))
            }
            (Value::Str(string), Value::Num(num)) => {
                if num.fract() != 0.0 || *num < 0.0 {
                    return Ok(Value::Undefined);
                }
                Ok(string
                    .chars()
                    .nth(*num as usize)
                    .map(|ch| Value::Str(ch.to_string()))
                    .unwrap_or(Value::Undefined))
            }
            (Value::Object(pairs), Value::Str(key)) => Ok(pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value.clone())
                .unwrap_or(Value::Undefined)),
            _ => Err(EvalError::InvalidIndex {
                container: object.type_name().to_string(),
                index: index.to_string(),
            }),
        }
    }
}
