use std::fmt;
use std::rc::Rc;

/// A parsed top-level program: declarations in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var { name: Rc<str>, init: Expr },
    Fun { name: Rc<str>, fun: FunLit },
    Class { name: Rc<str>, class: ClassLit },
    Stmt(Stmt),
    /// Placeholder for a region the parser gave up on.
    Bad,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Vec<Decl>),
    Expr(Expr),
    If {
        cond: Expr,
        then: Box<Stmt>,
        alt: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    For {
        init: Box<Decl>,
        cond: Expr,
        post: Box<Stmt>,
        body: Box<Stmt>,
    },
    Assign {
        target: Expr,
        value: Expr,
    },
    Say(Expr),
    Return(Expr),
    Break,
    Continue,
    Try {
        body: Box<Stmt>,
        catch: Option<CatchClause>,
        finally: Option<Box<Stmt>>,
    },
    Throw(Expr),
    Bad,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub name: Rc<str>,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Rc<str>),
    SelfLit,
    Null,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Fun(FunLit),
    Class(ClassLit),
    Vector(Vec<Expr>),
    Map(Vec<(Expr, Expr)>),
    Infix {
        op: InfixOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Prefix {
        op: PrefixOp,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Property {
        object: Box<Expr>,
        name: Rc<str>,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        object: Box<Expr>,
        start: Box<Expr>,
        end: Box<Expr>,
    },
}

/// Function literal; the body is shared so closures over the same literal
/// do not deep-copy it.
#[derive(Debug, Clone, PartialEq)]
pub struct FunLit {
    pub params: Vec<Rc<str>>,
    pub body: Rc<Stmt>,
}

/// Class literal: named initializers and methods, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassLit {
    pub inits: Vec<(Rc<str>, FunLit)>,
    pub methods: Vec<(Rc<str>, FunLit)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Is,
    Isnt,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Neg,
    Pos,
    Not,
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Lt => "<",
            InfixOp::Le => "<=",
            InfixOp::Gt => ">",
            InfixOp::Ge => ">=",
            InfixOp::Eq => "==",
            InfixOp::Ne => "!=",
            InfixOp::Is => "===",
            InfixOp::Isnt => "!==",
            InfixOp::And => "and",
            InfixOp::Or => "or",
        };
        f.write_str(op)
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            PrefixOp::Neg => "-",
            PrefixOp::Pos => "+",
            PrefixOp::Not => "!",
        };
        f.write_str(op)
    }
}

// The Display impls reconstruct surface syntax for the `--debug` AST dump.
// Infix and prefix expressions are parenthesized so grouping is visible.

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, decl) in self.decls.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", decl)?;
        }
        Ok(())
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decl::Var { name, init } => write!(f, "var {} = {};", name, init),
            Decl::Fun { name, fun } => write!(f, "fun {}{}", name, fun_signature(fun)),
            Decl::Class { name, class } => write!(f, "class {} {}", name, class_body(class)),
            Decl::Stmt(stmt) => write!(f, "{}", stmt),
            Decl::Bad => write!(f, "__bad_decl"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Block(decls) => {
                write!(f, "{{")?;
                for (i, decl) in decls.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", decl)?;
                }
                write!(f, "}}")
            }
            Stmt::Expr(expr) => write!(f, "{};", expr),
            Stmt::If { cond, then, alt } => match alt {
                Some(alt) => write!(f, "if ({}) {} else {}", cond, then, alt),
                None => write!(f, "if ({}) {}", cond, then),
            },
            Stmt::While { cond, body } => write!(f, "while ({}) {}", cond, body),
            Stmt::DoWhile { body, cond } => write!(f, "do {} while ({});", body, cond),
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => write!(f, "for ({} {}; {}) {}", init, cond, ForPost(post), body),
            Stmt::Assign { target, value } => write!(f, "{} = {};", target, value),
            Stmt::Say(expr) => write!(f, "say {};", expr),
            Stmt::Return(expr) => write!(f, "return {};", expr),
            Stmt::Break => write!(f, "break;"),
            Stmt::Continue => write!(f, "continue;"),
            Stmt::Try {
                body,
                catch,
                finally,
            } => {
                write!(f, "try {}", body)?;
                if let Some(clause) = catch {
                    write!(f, " catch ({}) {}", clause.name, clause.body)?;
                }
                if let Some(fin) = finally {
                    write!(f, " finally {}", fin)?;
                }
                Ok(())
            }
            Stmt::Throw(expr) => write!(f, "throw {};", expr),
            Stmt::Bad => write!(f, "__bad_stmt"),
        }
    }
}

/// A `for` post step prints without its statement semicolon.
struct ForPost<'a>(&'a Stmt);

impl fmt::Display for ForPost<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Stmt::Assign { target, value } => write!(f, "{} = {}", target, value),
            Stmt::Expr(expr) => write!(f, "{}", expr),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::SelfLit => write!(f, "self"),
            Expr::Null => write!(f, "null"),
            Expr::Boolean(value) => write!(f, "{}", value),
            Expr::Number(value) => write!(f, "{}", value),
            Expr::String(value) => write!(f, "\"{}\"", value),
            Expr::Fun(fun) => write!(f, "fun{}", fun_signature(fun)),
            Expr::Class(class) => write!(f, "class {}", class_body(class)),
            Expr::Vector(elems) => {
                write!(f, "vec{{")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, "}}")
            }
            Expr::Map(pairs) => {
                write!(f, "map{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Expr::Infix { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Prefix { op, right } => write!(f, "({} {})", op, right),
            Expr::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Property { object, name } => write!(f, "{}.{}", object, name),
            Expr::Index { object, index } => write!(f, "{}[{}]", object, index),
            Expr::Slice { object, start, end } => write!(f, "{}[{}:{}]", object, start, end),
        }
    }
}

fn fun_signature(fun: &FunLit) -> String {
    let params = fun
        .params
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("({}) {}", params, fun.body)
}

fn class_body(class: &ClassLit) -> String {
    let mut members = Vec::new();
    for (name, fun) in &class.inits {
        members.push(format!("init {}{}", name, fun_signature(fun)));
    }
    for (name, fun) in &class.methods {
        members.push(format!("fun {}{}", name, fun_signature(fun)));
    }
    format!("{{{}}}", members.join(" "))
}
