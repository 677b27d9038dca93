use std::fmt;

pub type Program = Vec<Stmt>;
pub type Block = Vec<Stmt>;

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Expression(Expr),
    Return(Option<Expr>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Undefined,
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Identifier(String),
    Array(Vec<Expr>),
    Object(Vec<(String, Expr)>),
    Assign {
        name: String,
        value: Box<Expr>,
    },
    Prefix(Prefix, Box<Expr>),
    Infix(Box<Expr>, Infix, Box<Expr>),
    If {
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },
    Function {
        parameters: Vec<String>,
        body: Block,
    },
    Call {
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: String,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Prefix {
    Not,
    Minus,
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Not => write!(f, "!"),
            Prefix::Minus => write!(f, "-"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Infix {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
    Equal,
    NotEqual,
    And,
    Or,
}

impl fmt::Display for Infix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Infix::Plus => "+",
            Infix::Minus => "-",
            Infix::Multiply => "*",
            Infix::Divide => "/",
            Infix::Modulo => "%",
            Infix::LessThan => "<",
            Infix::GreaterThan => ">",
            Infix::LessThanEqual => "<=",
            Infix::GreaterThanEqual => ">=",
            Infix::Equal => "==",
            Infix::NotEqual => "!=",
            Infix::And => "&&",
            Infix::Or => "||",
        };
        write!(f, "{op}")
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &Block) -> fmt::Result {
    write!(f, "{{ ")?;
    for (i, stmt) in block.iter().enumerate() {
        if i > 0 {
            write!(f, "; ")?;
        }
        write!(f, "{stmt}")?;
    }
    write!(f, " }}")
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expression(expr) => write!(f, "{expr}"),
            Stmt::Return(Some(expr)) => write!(f, "return {expr}"),
            Stmt::Return(None) => write!(f, "return"),
        }
    }
}

// Source-text reconstruction, used to render function values and to describe
// expressions in error messages.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Undefined => write!(f, "undefined"),
            Expr::Null => write!(f, "null"),
            Expr::Bool(boolean) => write!(f, "{boolean}"),
            Expr::Num(num) => write!(f, "{num}"),
            Expr::Str(string) => write!(f, "\"{string}\""),
            Expr::Identifier(name) => write!(f, "{name}"),
            Expr::Array(elements) => {
                let elements = elements
                    .iter()
                    .map(|el| el.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{elements}]")
            }
            Expr::Object(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "{{{pairs}}}")
            }
            Expr::Assign { name, value } => write!(f, "{name} = {value}"),
            Expr::Prefix(prefix, right) => write!(f, "({prefix}{right})"),
            Expr::Infix(left, infix, right) => write!(f, "({left} {infix} {right})"),
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if ({condition}) ")?;
                write_block(f, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else ")?;
                    write_block(f, alternative)?;
                }
                Ok(())
            }
            Expr::Function { parameters, body } => {
                write!(f, "fn({}) ", parameters.join(", "))?;
                write_block(f, body)
            }
            Expr::Call {
                function,
                arguments,
            } => {
                let arguments = arguments
                    .iter()
                    .map(|arg| arg.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "{function}({arguments})")
            }
            Expr::Index { object, index } => write!(f, "{object}[{index}]"),
            Expr::Member { object, property } => write!(f, "{object}.{property}"),
        }
    }
}
