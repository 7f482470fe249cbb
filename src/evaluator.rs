//! Expression evaluation and statement execution: components C and D of
//! the interpreter core.

use std::io::Write;

use crate::error::{Error, Result, Span};
use crate::parallel::run_sliced;
use crate::parser::{Expr, Expression, Statement};
use crate::runtime::{AsyncHandle, Environment, Value};

/// Evaluates an expression tree against `env`. `threshold` is the
/// sequential/parallel boundary for map/reduce (normally
/// [`crate::parallel::DEFAULT_MULTITHREAD_THRESHOLD`], overridable for
/// testing).
pub fn eval_expr(expr: &Expr, env: &Environment, threshold: usize) -> Result<Value> {
    match &expr.node {
        Expression::Integer(n) => Ok(Value::Int(*n)),
        Expression::Float(x) => Ok(Value::Float(*x)),
        Expression::Identifier(name) => env.get(name, expr.span),
        Expression::Neg(operand) => eval_neg(operand, env, threshold, expr.span),
        Expression::Add(l, r) => {
            binary(l, r, env, threshold, expr.span, |a, b, span| a.add(b, span))
        }
        Expression::Sub(l, r) => {
            binary(l, r, env, threshold, expr.span, |a, b, span| a.sub(b, span))
        }
        Expression::Mul(l, r) => {
            binary(l, r, env, threshold, expr.span, |a, b, span| a.mul(b, span))
        }
        Expression::Div(l, r) => {
            binary(l, r, env, threshold, expr.span, |a, b, span| a.div(b, span))
        }
        Expression::Pow(l, r) => {
            binary(l, r, env, threshold, expr.span, |a, b, span| a.pow(b, span))
        }
        Expression::Range(b, e) => eval_range(b, e, env, threshold, expr.span),
        Expression::Map { input, param, body } => {
            eval_map(input, param, body, env, threshold, expr.span)
        }
        Expression::Reduce {
            input,
            seed,
            p1,
            p2,
            body,
        } => eval_reduce(input, seed, p1, p2, body, env, threshold, expr.span),
    }
}

fn binary(
    l: &Expr,
    r: &Expr,
    env: &Environment,
    threshold: usize,
    span: Span,
    op: impl Fn(&Value, &Value, Span) -> Result<Value>,
) -> Result<Value> {
    let lv = eval_expr(l, env, threshold)?;
    let rv = eval_expr(r, env, threshold)?;
    op(&lv, &rv, span)
}

fn eval_neg(operand: &Expr, env: &Environment, threshold: usize, span: Span) -> Result<Value> {
    let v = eval_expr(operand, env, threshold)?.force()?;
    if !v.is_scalar() {
        return Err(Error::Type {
            message: "arithmetic on a non-scalar value".to_string(),
            span,
        });
    }
    match v {
        Value::None => Ok(Value::None),
        Value::Int(n) => Ok(Value::Int(-n)),
        Value::Float(x) => Ok(Value::Float(-x)),
        _ => unreachable!("checked is_scalar above"),
    }
}

fn eval_range(
    begin: &Expr,
    end: &Expr,
    env: &Environment,
    threshold: usize,
    span: Span,
) -> Result<Value> {
    let bv = eval_expr(begin, env, threshold)?.force()?;
    let ev = eval_expr(end, env, threshold)?.force()?;
    if !bv.is_scalar() || !ev.is_scalar() {
        return Err(Error::Type {
            message: "range bounds must be scalars".to_string(),
            span,
        });
    }
    let begin = bv.as_integer();
    let end = ev.as_integer();
    if end < begin {
        Ok(Value::None)
    } else {
        Ok(Value::Range { begin, end })
    }
}

fn eval_lambda1(body: &Expr, param: &str, arg: Value, threshold: usize) -> Result<Value> {
    let mut env = Environment::new();
    env.set(param.to_string(), arg);
    let result = eval_expr(body, &env, threshold)?.force()?;
    if !result.is_scalar() {
        return Err(Error::Type {
            message: "cannot return vector from lambda body".to_string(),
            span: body.span,
        });
    }
    Ok(result)
}

fn eval_lambda2(
    body: &Expr,
    p1: &str,
    p2: &str,
    a: Value,
    b: Value,
    threshold: usize,
) -> Result<Value> {
    let mut env = Environment::new();
    env.set(p1.to_string(), a);
    env.set(p2.to_string(), b);
    let result = eval_expr(body, &env, threshold)?.force()?;
    if !result.is_scalar() {
        return Err(Error::Type {
            message: "cannot return vector from lambda body".to_string(),
            span: body.span,
        });
    }
    Ok(result)
}

fn eval_map(
    input: &Expr,
    param: &str,
    body: &Expr,
    env: &Environment,
    threshold: usize,
    span: Span,
) -> Result<Value> {
    let input_val = eval_expr(input, env, threshold)?.force()?;
    if input_val.is_scalar() {
        return Err(Error::Type {
            message: "map requires a non-scalar input".to_string(),
            span,
        });
    }
    let n = input_val.size()?;
    let elements = input_val.iter_elements()?;
    let param = param.to_string();
    let body = body.clone();

    if n < threshold {
        let mut results = Vec::with_capacity(n);
        for elem in elements {
            results.push(eval_lambda1(&body, &param, elem, threshold)?);
        }
        Ok(Value::vector(results))
    } else {
        let handle = AsyncHandle::spawn(move || {
            let slices = run_sliced(elements.len(), |lo, hi| {
                let mut partial = Vec::with_capacity(hi - lo);
                for elem in &elements[lo..hi] {
                    partial.push(eval_lambda1(&body, &param, elem.clone(), threshold)?);
                }
                Ok(partial)
            })?;
            let flat: Vec<Value> = slices.into_iter().flatten().collect();
            Ok(Value::vector(flat))
        });
        Ok(Value::Async(handle))
    }
}

fn eval_reduce(
    input: &Expr,
    seed: &Expr,
    p1: &str,
    p2: &str,
    body: &Expr,
    env: &Environment,
    threshold: usize,
    span: Span,
) -> Result<Value> {
    let input_val = eval_expr(input, env, threshold)?.force()?;
    if input_val.is_scalar() {
        return Err(Error::Type {
            message: "reduce requires a non-scalar input".to_string(),
            span,
        });
    }
    let seed_val = eval_expr(seed, env, threshold)?.force()?;
    if !seed_val.is_scalar() {
        return Err(Error::Type {
            message: "reduce seed must be a scalar".to_string(),
            span,
        });
    }

    let n = input_val.size()?;
    let elements = input_val.iter_elements()?;
    let p1 = p1.to_string();
    let p2 = p2.to_string();
    let body = body.clone();

    if n < threshold {
        let mut acc = seed_val;
        for elem in elements {
            acc = eval_lambda2(&body, &p1, &p2, acc, elem, threshold)?;
        }
        Ok(Value::Async(AsyncHandle::ready(acc)))
    } else {
        let handle = AsyncHandle::spawn(move || {
            let partials = run_sliced(elements.len(), |lo, hi| {
                let mut acc = seed_val.clone();
                for elem in &elements[lo..hi] {
                    acc = eval_lambda2(&body, &p1, &p2, acc, elem.clone(), threshold)?;
                }
                Ok(acc)
            })?;
            let mut acc = seed_val.clone();
            for partial in partials {
                acc = eval_lambda2(&body, &p1, &p2, acc, partial, threshold)?;
            }
            Ok(acc)
        });
        Ok(Value::Async(handle))
    }
}

/// Executes a statement against `env`, writing `out`/`print` output to
/// `writer`. A failing statement leaves `env` with whatever bindings
/// earlier, successful statements already made.
pub fn exec_statement(
    stmt: &Statement,
    env: &mut Environment,
    threshold: usize,
    writer: &mut impl Write,
) -> Result<()> {
    match stmt {
        Statement::Var { name, expr } => {
            let value = eval_expr(expr, env, threshold)?;
            env.set(name.clone(), value);
            Ok(())
        }
        Statement::Out(expr) => {
            let value = eval_expr(expr, env, threshold)?.force()?;
            write!(writer, "{}", value.as_string()).map_err(io_error)
        }
        Statement::Print(literal) => write!(writer, "{}", literal).map_err(io_error),
    }
}

fn io_error(err: std::io::Error) -> Error {
    Error::Internal {
        message: format!("output write failed: {}", err),
    }
}
