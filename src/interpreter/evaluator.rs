use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{CatchClause, ClassLit, Decl, Expr, FunLit, InfixOp, PrefixOp, Script, Stmt};
use crate::lexer::Lexer;
use crate::value::{
    Class, Exception, Function, Instance, MapKey, MapTable, Method, Value, identical,
};

use super::builtins;
use super::control_flow::Unwind;
use super::environment::Environment;
use super::error::{RuntimeError, ScriptError};
use super::parser::Parser;

/// One interpreter instance: a seeded global scope, the hidden classes
/// backing primitive method dispatch, and the stack of active callees.
pub struct Interpreter {
    env: Environment,
    call_stack: Vec<Value>,
    classes: builtins::BaseClasses,
    out: Box<dyn Write>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Routes `say` output somewhere other than stdout; used by embedders
    /// and tests.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        let env = Environment::new();
        let classes = builtins::BaseClasses::new();
        builtins::install(&env, &classes);
        Self {
            env,
            call_stack: Vec::new(),
            classes,
            out,
        }
    }

    /// Scans, parses and evaluates `source` against this interpreter's
    /// state. Parse diagnostics are reported as a batch; nothing runs when
    /// any are present.
    pub fn run(&mut self, source: &str) -> Result<(), ScriptError> {
        let (script, errors) = Parser::new(Lexer::new(source)).parse();
        if !errors.is_empty() {
            return Err(ScriptError::Parse(errors));
        }
        self.eval_script(&script).map_err(ScriptError::Runtime)
    }

    /// Executes top-level declarations in order. A control signal escaping
    /// the script is a runtime error with a fixed message.
    pub fn eval_script(&mut self, script: &Script) -> Result<(), RuntimeError> {
        for decl in &script.decls {
            if let Err(unwind) = self.exec_decl(decl) {
                return Err(match unwind {
                    Unwind::Throw(exception) => RuntimeError::Uncaught(exception),
                    Unwind::Return(_) => RuntimeError::ReturnOutsideFunction,
                    Unwind::Break => RuntimeError::BreakOutsideLoop,
                    Unwind::Continue => RuntimeError::ContinueOutsideLoop,
                });
            }
        }
        Ok(())
    }

    /// Builds an `Exception` unwind carrying the current call-stack
    /// snapshot, innermost callee first.
    pub fn throw(&self, message: impl Into<String>) -> Unwind {
        Unwind::Throw(Rc::new(Exception {
            message: message.into(),
            stack_trace: self.call_stack.iter().rev().cloned().collect(),
        }))
    }

    /// The class backing `value` for `class_of`: a base class, an
    /// instance's own class, else `null`.
    pub fn class_of_value(&self, value: &Value) -> Value {
        match value {
            Value::Instance(instance) => Value::Class(instance.class.clone()),
            _ => match self.classes.for_value(value) {
                Some(class) => Value::Class(class),
                None => Value::Null,
            },
        }
    }

    /* == declarations ====================================================== */

    fn exec_decl(&mut self, decl: &Decl) -> Result<(), Unwind> {
        match decl {
            Decl::Var { name, init } => {
                let value = self.eval_expr(init)?;
                self.declare(name.clone(), value)
            }
            Decl::Fun { name, fun } => {
                let function = self.make_function(Some(name.clone()), fun);
                self.declare(name.clone(), function)
            }
            Decl::Class { name, class } => {
                let value = self.make_class(Some(name.clone()), class);
                self.declare(name.clone(), value)
            }
            Decl::Stmt(stmt) => self.exec_stmt(stmt),
            Decl::Bad => Err(self.throw("malformed declaration")),
        }
    }

    fn declare(&mut self, name: Rc<str>, value: Value) -> Result<(), Unwind> {
        self.env
            .declare(name, value)
            .map_err(|error| self.throw(error.to_string()))
    }

    /* == statements ======================================================== */

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        match stmt {
            Stmt::Block(decls) => self.exec_block(decls),
            Stmt::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(())
            }
            Stmt::If { cond, then, alt } => {
                if self.eval_expr(cond)?.is_truthy() {
                    self.exec_stmt(then)
                } else if let Some(alt) = alt {
                    self.exec_stmt(alt)
                } else {
                    Ok(())
                }
            }
            Stmt::While { cond, body } => absorb_break(self.while_iterations(cond, body)),
            Stmt::DoWhile { body, cond } => absorb_break(self.do_while_iterations(body, cond)),
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => self.exec_for(init, cond, post, body),
            Stmt::Assign { target, value } => self.exec_assign(target, value),
            Stmt::Say(expr) => {
                let value = self.eval_expr(expr)?;
                let _ = writeln!(self.out, "{}", value);
                Ok(())
            }
            Stmt::Return(expr) => Err(Unwind::Return(self.eval_expr(expr)?)),
            Stmt::Break => Err(Unwind::Break),
            Stmt::Continue => Err(Unwind::Continue),
            Stmt::Try {
                body,
                catch,
                finally,
            } => self.exec_try(body, catch.as_ref(), finally.as_deref()),
            Stmt::Throw(expr) => {
                let value = self.eval_expr(expr)?;
                Err(self.throw(value.stringify()))
            }
            Stmt::Bad => Err(self.throw("malformed statement")),
        }
    }

    fn exec_block(&mut self, decls: &[Decl]) -> Result<(), Unwind> {
        let saved = self.env.clone();
        self.env = Environment::with_outer(saved.clone());
        let result = self.exec_decls(decls);
        self.env = saved;
        result
    }

    fn exec_decls(&mut self, decls: &[Decl]) -> Result<(), Unwind> {
        for decl in decls {
            self.exec_decl(decl)?;
        }
        Ok(())
    }

    fn while_iterations(&mut self, cond: &Expr, body: &Stmt) -> Result<(), Unwind> {
        while self.eval_expr(cond)?.is_truthy() {
            self.loop_iteration(body)?;
        }
        Ok(())
    }

    fn do_while_iterations(&mut self, body: &Stmt, cond: &Expr) -> Result<(), Unwind> {
        loop {
            self.loop_iteration(body)?;
            if !self.eval_expr(cond)?.is_truthy() {
                return Ok(());
            }
        }
    }

    /// The init binding lives in a fresh scope that encloses the loop.
    fn exec_for(
        &mut self,
        init: &Decl,
        cond: &Expr,
        post: &Stmt,
        body: &Stmt,
    ) -> Result<(), Unwind> {
        let saved = self.env.clone();
        self.env = Environment::with_outer(saved.clone());
        let result = self.for_iterations(init, cond, post, body);
        self.env = saved;
        absorb_break(result)
    }

    fn for_iterations(
        &mut self,
        init: &Decl,
        cond: &Expr,
        post: &Stmt,
        body: &Stmt,
    ) -> Result<(), Unwind> {
        self.exec_decl(init)?;
        while self.eval_expr(cond)?.is_truthy() {
            self.loop_iteration(body)?;
            self.exec_stmt(post)?;
        }
        Ok(())
    }

    /// One loop pass: `continue` ends the pass, everything else unwinds.
    fn loop_iteration(&mut self, body: &Stmt) -> Result<(), Unwind> {
        match self.exec_stmt(body) {
            Err(Unwind::Continue) => Ok(()),
            other => other,
        }
    }

    /// Only exceptions are caught here; `return`/`break`/`continue` pass
    /// through untouched. A try-body exception with no catch clause stays
    /// live; the last exception standing, preferring finally over catch
    /// over try, is re-raised after the finally body runs.
    fn exec_try(
        &mut self,
        body: &Stmt,
        catch: Option<&CatchClause>,
        finally: Option<&Stmt>,
    ) -> Result<(), Unwind> {
        let try_exception = match self.exec_stmt(body) {
            Ok(()) => None,
            Err(Unwind::Throw(exception)) => Some(exception),
            Err(signal) => return Err(signal),
        };

        let mut pending = None;
        if let Some(exception) = try_exception {
            match catch {
                Some(clause) => {
                    if let Err(unwind) = self.exec_catch(clause, exception) {
                        match unwind {
                            Unwind::Throw(exception) => pending = Some(exception),
                            signal => return Err(signal),
                        }
                    }
                }
                None => pending = Some(exception),
            }
        }

        if let Some(finally) = finally {
            match self.exec_stmt(finally) {
                Ok(()) => {}
                Err(Unwind::Throw(exception)) => pending = Some(exception),
                Err(signal) => return Err(signal),
            }
        }

        match pending {
            Some(exception) => Err(Unwind::Throw(exception)),
            None => Ok(()),
        }
    }

    /// Runs the catch body in a fresh scope binding the exception value.
    fn exec_catch(&mut self, clause: &CatchClause, exception: Rc<Exception>) -> Result<(), Unwind> {
        let saved = self.env.clone();
        self.env = Environment::with_outer(saved.clone());
        let result = match self
            .env
            .declare(clause.name.clone(), Value::Exception(exception))
        {
            Ok(()) => self.exec_stmt(&clause.body),
            Err(error) => Err(self.throw(error.to_string())),
        };
        self.env = saved;
        result
    }

    fn exec_assign(&mut self, target: &Expr, value_expr: &Expr) -> Result<(), Unwind> {
        let value = self.eval_expr(value_expr)?;
        match target {
            Expr::Ident(name) => self
                .env
                .assign(name, value)
                .map_err(|error| self.throw(error.to_string())),
            Expr::Property { object, name } => self.assign_property(object, name, value),
            Expr::Index { object, index } => self.assign_index(object, index, value),
            _ => Err(self.throw("can't assign to")),
        }
    }

    /// Field stores only work through a literal `self` receiver; the key is
    /// created if absent.
    fn assign_property(
        &mut self,
        object: &Expr,
        name: &Rc<str>,
        value: Value,
    ) -> Result<(), Unwind> {
        if matches!(object, Expr::SelfLit) {
            return match self.env.self_value() {
                Some(Value::Instance(instance)) => {
                    instance.fields.borrow_mut().insert(name.clone(), value);
                    Ok(())
                }
                Some(_) => Err(self.throw("not done yet")),
                None => Err(self.throw("'self' is undefined")),
            };
        }
        self.eval_expr(object)?;
        Err(self.throw("not done yet"))
    }

    fn assign_index(&mut self, object: &Expr, index: &Expr, value: Value) -> Result<(), Unwind> {
        let object = self.eval_expr(object)?;
        let index = self.eval_expr(index)?;
        match object {
            Value::Vector(elems) => {
                let length = elems.borrow().len();
                let i = self.check_index(&index, length)?;
                elems.borrow_mut()[i] = value;
                Ok(())
            }
            Value::Map(table) => {
                let key =
                    MapKey::from_value(&index).ok_or_else(|| self.throw("unhashable type"))?;
                table.borrow_mut().set(key, value);
                Ok(())
            }
            Value::Instance(_) => Err(self.throw("not done yet")),
            _ => Err(self.throw("index assign is not supported")),
        }
    }

    /* == expressions ======================================================= */

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, Unwind> {
        match expr {
            Expr::Ident(name) => self
                .env
                .get(name)
                .ok_or_else(|| self.throw("variable not exists")),
            Expr::SelfLit => self
                .env
                .self_value()
                .ok_or_else(|| self.throw("'self' is undefined")),
            Expr::Null => Ok(Value::Null),
            Expr::Boolean(value) => Ok(Value::Boolean(*value)),
            Expr::Number(value) => Ok(Value::Number(*value)),
            Expr::String(value) => Ok(Value::String(Rc::from(value.as_ref()))),
            Expr::Fun(fun) => Ok(self.make_function(None, fun)),
            Expr::Class(class) => Ok(self.make_class(None, class)),
            Expr::Vector(elems) => {
                let mut values = Vec::with_capacity(elems.len());
                for elem in elems {
                    values.push(self.eval_expr(elem)?);
                }
                Ok(Value::Vector(Rc::new(RefCell::new(values))))
            }
            Expr::Map(pairs) => {
                let mut table = MapTable::new();
                for (key_expr, value_expr) in pairs {
                    let key = self.eval_expr(key_expr)?;
                    let value = self.eval_expr(value_expr)?;
                    let key =
                        MapKey::from_value(&key).ok_or_else(|| self.throw("unhashable type"))?;
                    table.set(key, value);
                }
                Ok(Value::Map(Rc::new(RefCell::new(table))))
            }
            Expr::Infix { op, left, right } => self.eval_infix(*op, left, right),
            Expr::Prefix { op, right } => self.eval_prefix(*op, right),
            Expr::Call { callee, args } => self.eval_call(callee, args),
            Expr::Property { object, name } => self.eval_property(object, name),
            Expr::Index { object, index } => self.eval_index(object, index),
            Expr::Slice { object, start, end } => self.eval_slice(object, start, end),
        }
    }

    fn make_function(&self, name: Option<Rc<str>>, fun: &FunLit) -> Value {
        Value::Function(Rc::new(Function {
            name,
            params: fun.params.clone(),
            body: fun.body.clone(),
            closure: self.env.clone(),
        }))
    }

    fn make_class(&self, name: Option<Rc<str>>, class: &ClassLit) -> Value {
        let mut inits = IndexMap::new();
        let mut methods = IndexMap::new();
        for (member, fun) in &class.inits {
            inits.insert(member.clone(), self.make_function(Some(member.clone()), fun));
        }
        for (member, fun) in &class.methods {
            methods.insert(member.clone(), self.make_function(Some(member.clone()), fun));
        }
        Value::Class(Rc::new(Class {
            name,
            inits,
            methods,
        }))
    }

    fn eval_prefix(&mut self, op: PrefixOp, right: &Expr) -> Result<Value, Unwind> {
        let value = self.eval_expr(right)?;
        match op {
            PrefixOp::Not => Ok(Value::Boolean(!value.is_truthy())),
            PrefixOp::Neg | PrefixOp::Pos => match value {
                Value::Number(n) => Ok(Value::Number(if op == PrefixOp::Neg { -n } else { n })),
                other => Err(self.throw(format!(
                    "expected 'number', got '{}'",
                    other.type_name()
                ))),
            },
        }
    }

    fn eval_infix(&mut self, op: InfixOp, left: &Expr, right: &Expr) -> Result<Value, Unwind> {
        // `or`/`and` are value-preserving and do not evaluate the right
        // operand unless required.
        match op {
            InfixOp::Or => {
                let left = self.eval_expr(left)?;
                if left.is_truthy() {
                    return Ok(left);
                }
                return self.eval_expr(right);
            }
            InfixOp::And => {
                let left = self.eval_expr(left)?;
                if left.is_truthy() {
                    return self.eval_expr(right);
                }
                return Ok(left);
            }
            _ => {}
        }

        let left = self.eval_expr(left)?;
        let right = self.eval_expr(right)?;
        match op {
            InfixOp::Is => Ok(Value::Boolean(identical(&left, &right))),
            InfixOp::Isnt => Ok(Value::Boolean(!identical(&left, &right))),
            _ => self.binary_op(op, left, right),
        }
    }

    fn binary_op(&self, op: InfixOp, left: Value, right: Value) -> Result<Value, Unwind> {
        match left {
            Value::Boolean(l) => match op {
                InfixOp::Eq => Ok(Value::Boolean(matches!(right, Value::Boolean(r) if r == l))),
                InfixOp::Ne => Ok(Value::Boolean(!matches!(right, Value::Boolean(r) if r == l))),
                _ => Err(self.throw("unsupported operator for type")),
            },
            Value::Number(l) => self.number_op(op, l, right),
            Value::String(l) => self.string_op(op, &l, right),
            _ => Err(self.throw("unsupported type")),
        }
    }

    fn number_op(&self, op: InfixOp, l: f64, right: Value) -> Result<Value, Unwind> {
        let r = match right {
            Value::Number(r) => r,
            // `==`/`!=` across types answer without error
            _ => {
                return match op {
                    InfixOp::Eq => Ok(Value::Boolean(false)),
                    InfixOp::Ne => Ok(Value::Boolean(true)),
                    _ => Err(self.throw("expected number")),
                };
            }
        };
        let value = match op {
            InfixOp::Add => Value::Number(l + r),
            InfixOp::Sub => Value::Number(l - r),
            InfixOp::Mul => Value::Number(l * r),
            InfixOp::Div => Value::Number(l / r),
            InfixOp::Lt => Value::Boolean(l < r),
            InfixOp::Le => Value::Boolean(l <= r),
            InfixOp::Gt => Value::Boolean(l > r),
            InfixOp::Ge => Value::Boolean(l >= r),
            InfixOp::Eq => Value::Boolean(l == r),
            InfixOp::Ne => Value::Boolean(l != r),
            _ => return Err(self.throw("unsupported operator for type")),
        };
        Ok(value)
    }

    fn string_op(&self, op: InfixOp, l: &Rc<str>, right: Value) -> Result<Value, Unwind> {
        match op {
            InfixOp::Add => match right {
                Value::String(r) => Ok(Value::String(Rc::from(format!("{}{}", l, r).as_str()))),
                _ => Err(self.throw("expected string")),
            },
            InfixOp::Eq => Ok(Value::Boolean(
                matches!(&right, Value::String(r) if r.as_ref() == l.as_ref()),
            )),
            InfixOp::Ne => Ok(Value::Boolean(
                !matches!(&right, Value::String(r) if r.as_ref() == l.as_ref()),
            )),
            _ => Err(self.throw("unsupported operator for type")),
        }
    }

    fn eval_call(&mut self, callee: &Expr, args: &[Expr]) -> Result<Value, Unwind> {
        let callee = self.eval_expr(callee)?;
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }

        match callee {
            Value::Method(method) => {
                let value =
                    self.run_call(method.function.clone(), Some(method.receiver.clone()), values)?;
                if method.is_init {
                    Ok(method.receiver.clone())
                } else {
                    Ok(value)
                }
            }
            callee @ (Value::Function(_) | Value::Native(_)) => self.run_call(callee, None, values),
            _ => Err(self.throw("call not callable")),
        }
    }

    /// The callee is on the call stack for exactly the duration of the
    /// call, however it exits; a `return` unwind is consumed here.
    fn run_call(
        &mut self,
        callee: Value,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Result<Value, Unwind> {
        self.call_stack.push(callee.clone());
        let result = self.dispatch_call(&callee, receiver, args);
        self.call_stack.pop();
        match result {
            Err(Unwind::Return(value)) => Ok(value),
            other => other,
        }
    }

    fn dispatch_call(
        &mut self,
        callee: &Value,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Result<Value, Unwind> {
        match callee {
            Value::Function(function) => {
                self.check_arity(function.params.len(), args.len())?;
                let saved = self.env.clone();
                self.env = Environment::with_outer(function.closure.clone());
                if let Some(receiver) = receiver {
                    self.env.set_self(receiver);
                }
                let mut result = Ok(());
                for (param, arg) in function.params.iter().zip(args) {
                    if let Err(error) = self.env.declare(param.clone(), arg) {
                        result = Err(self.throw(error.to_string()));
                        break;
                    }
                }
                if result.is_ok() {
                    result = self.exec_stmt(&function.body);
                }
                self.env = saved;
                result.map(|_| Value::Null)
            }
            Value::Native(native) => {
                self.check_arity(native.arity, args.len())?;
                (native.function)(self, receiver.as_ref(), &args)
            }
            _ => Err(self.throw("call not callable")),
        }
    }

    fn check_arity(&self, arity: usize, got: usize) -> Result<(), Unwind> {
        if arity != got {
            return Err(self.throw(format!("expected {} arguments, got {}", arity, got)));
        }
        Ok(())
    }

    fn eval_property(&mut self, object: &Expr, name: &Rc<str>) -> Result<Value, Unwind> {
        let value = self.eval_expr(object)?;
        match &value {
            // `Cls.init_name` binds the initializer to a fresh instance
            Value::Class(class) => {
                let Some(init) = class.inits.get(name.as_ref()) else {
                    return Err(self.throw("missing initializer"));
                };
                let instance = Value::Instance(Rc::new(Instance {
                    class: class.clone(),
                    fields: RefCell::new(HashMap::new()),
                }));
                Ok(Value::Method(Rc::new(Method {
                    function: init.clone(),
                    receiver: instance,
                    is_init: true,
                })))
            }
            // Fields are visible only through a literal `self` receiver
            Value::Instance(instance) => {
                if matches!(object, Expr::SelfLit) {
                    if let Some(field) = instance.fields.borrow().get(name.as_ref()) {
                        return Ok(field.clone());
                    }
                    if let Some(function) = instance.class.methods.get(name.as_ref()) {
                        return Ok(bind_method(function, &value));
                    }
                    return Err(self.throw("missing field or method"));
                }
                match instance.class.methods.get(name.as_ref()) {
                    Some(function) => Ok(bind_method(function, &value)),
                    None => Err(self.throw("missing property")),
                }
            }
            Value::Module(module) => module
                .store
                .get(name.as_ref())
                .cloned()
                .ok_or_else(|| self.throw("missing property")),
            _ => match self.classes.for_value(&value) {
                Some(class) => match class.methods.get(name.as_ref()) {
                    Some(function) => Ok(bind_method(function, &value)),
                    None => Err(self.throw("missing property")),
                },
                None => Err(self.throw("getting property from unsupported type")),
            },
        }
    }

    fn eval_index(&mut self, object: &Expr, index: &Expr) -> Result<Value, Unwind> {
        let object = self.eval_expr(object)?;
        let index = self.eval_expr(index)?;
        match object {
            Value::Vector(elems) => {
                let length = elems.borrow().len();
                let i = self.check_index(&index, length)?;
                let value = elems.borrow()[i].clone();
                Ok(value)
            }
            Value::Map(table) => {
                let key =
                    MapKey::from_value(&index).ok_or_else(|| self.throw("unhashable type"))?;
                let value = table.borrow().get(&key);
                value.ok_or_else(|| self.throw("missing key"))
            }
            Value::String(text) => {
                let chars: Vec<char> = text.chars().collect();
                let i = self.check_index(&index, chars.len())?;
                Ok(Value::String(Rc::from(chars[i].to_string().as_str())))
            }
            _ => Err(self.throw("type not supports index access")),
        }
    }

    /// Slices copy; they are never views into the source.
    fn eval_slice(&mut self, object: &Expr, start: &Expr, end: &Expr) -> Result<Value, Unwind> {
        let object = self.eval_expr(object)?;
        let start = self.eval_expr(start)?;
        let end = self.eval_expr(end)?;
        match object {
            Value::Vector(elems) => {
                let length = elems.borrow().len();
                let (from, to) = self.check_slice(&start, &end, length)?;
                let copy: Vec<Value> = elems.borrow()[from..to].to_vec();
                Ok(Value::Vector(Rc::new(RefCell::new(copy))))
            }
            Value::String(text) => {
                let chars: Vec<char> = text.chars().collect();
                let (from, to) = self.check_slice(&start, &end, chars.len())?;
                let copy: String = chars[from..to].iter().collect();
                Ok(Value::String(Rc::from(copy.as_str())))
            }
            _ => Err(self.throw("type not supports slice")),
        }
    }

    fn check_index(&self, index: &Value, length: usize) -> Result<usize, Unwind> {
        let Value::Number(n) = index else {
            return Err(self.throw("non number index"));
        };
        let i = *n as i64;
        if i < 0 || i as usize >= length {
            return Err(self.throw("index out of range"));
        }
        Ok(i as usize)
    }

    fn check_slice(
        &self,
        start: &Value,
        end: &Value,
        length: usize,
    ) -> Result<(usize, usize), Unwind> {
        let (Value::Number(s), Value::Number(e)) = (start, end) else {
            return Err(self.throw("non number index"));
        };
        let (from, to) = (*s as i64, *e as i64);
        if from < 0
            || from as usize >= length
            || to < 0
            || to as usize > length
            || from > to
        {
            return Err(self.throw("index out of range"));
        }
        Ok((from as usize, to as usize))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn bind_method(function: &Value, receiver: &Value) -> Value {
    Value::Method(Rc::new(Method {
        function: function.clone(),
        receiver: receiver.clone(),
        is_init: false,
    }))
}

fn absorb_break(result: Result<(), Unwind>) -> Result<(), Unwind> {
    match result {
        Err(Unwind::Break) => Ok(()),
        other => other,
    }
}
