use std::fmt;
use std::sync::{mpsc, Arc, Mutex};

use crate::error::{Error, Result, Span};

/// Sentinel returned by `as_integer` when the value is `None`.
pub const NONE_SENTINEL: i64 = i64::MIN;

/// Runtime value: a tagged sum of scalars, integer ranges, materialized
/// vectors, and asynchronous values forced on first observation.
#[derive(Clone)]
pub enum Value {
    /// Absence of a defined value
    None,
    /// 64-bit signed integer scalar
    Int(i64),
    /// IEEE-754 double scalar
    Float(f64),
    /// Closed integer range `[begin, end]`
    Range {
        /// Inclusive start of the range
        begin: i64,
        /// Inclusive end of the range
        end: i64,
    },
    /// Ordered sequence sharing an immutable buffer over the half-open
    /// window `[lo, hi)`
    Vector {
        /// Shared, never-mutated backing storage
        buf: Arc<Vec<Value>>,
        /// Inclusive start of the window
        lo: usize,
        /// Exclusive end of the window
        hi: usize,
    },
    /// Not-yet-materialized value backed by a background computation
    Async(AsyncHandle),
}

/// Shared, force-once handle to a background computation.
#[derive(Clone)]
pub struct AsyncHandle(Arc<Mutex<AsyncState>>);

enum AsyncState {
    Pending(mpsc::Receiver<Result<Value>>),
    Ready(Value),
    Failed(Error),
}

impl AsyncHandle {
    /// Spawns `work` on the rayon global thread pool and returns a handle
    /// that will deliver its result on first force.
    pub fn spawn<F>(work: F) -> Self
    where
        F: FnOnce() -> Result<Value> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        rayon::spawn(move || {
            // Receiver may already be gone if nobody ever observes this
            // value; that's not an error for the producer.
            let _ = tx.send(work());
        });
        AsyncHandle(Arc::new(Mutex::new(AsyncState::Pending(rx))))
    }

    /// Wraps an already-computed value with no background task. Used when a
    /// computation runs eagerly on the calling thread but the surrounding
    /// contract still calls for an `Async` value.
    pub fn ready(value: Value) -> Self {
        AsyncHandle(Arc::new(Mutex::new(AsyncState::Ready(value))))
    }

    /// Blocks until the background computation completes and returns its
    /// result, memoizing it for subsequent observers. Safe for concurrent
    /// callers: only the first one actually waits on the channel.
    pub fn force(&self) -> Result<Value> {
        let mut guard = self.0.lock().unwrap();
        match &*guard {
            AsyncState::Ready(v) => return Ok(v.clone()),
            AsyncState::Failed(e) => return Err(e.clone()),
            AsyncState::Pending(_) => {}
        }

        let prior = std::mem::replace(&mut *guard, AsyncState::Ready(Value::None));
        let rx = match prior {
            AsyncState::Pending(rx) => rx,
            _ => unreachable!("checked above"),
        };

        match rx.recv() {
            Ok(Ok(value)) => {
                *guard = AsyncState::Ready(value.clone());
                Ok(value)
            }
            Ok(Err(err)) => {
                *guard = AsyncState::Failed(err.clone());
                Err(err)
            }
            Err(_) => {
                let err = Error::Internal {
                    message: "async worker disconnected without producing a result".to_string(),
                };
                *guard = AsyncState::Failed(err.clone());
                Err(err)
            }
        }
    }
}

impl fmt::Debug for AsyncHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AsyncHandle(..)")
    }
}

impl Value {
    /// Creates a vector value from an owned list of elements
    pub fn vector(values: Vec<Value>) -> Self {
        let hi = values.len();
        Value::Vector {
            buf: Arc::new(values),
            lo: 0,
            hi,
        }
    }

    /// True for `None`
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// True for `Int`/`Float`/`None`. Does not force `Async` — callers that
    /// may hold an unforced value should call [`Value::force`] first.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::None)
    }

    /// True for a forced `Float`
    pub fn is_scalar_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Forces an `Async` value, returning any other value unchanged.
    pub fn force(&self) -> Result<Value> {
        match self {
            Value::Async(handle) => handle.force(),
            other => Ok(other.clone()),
        }
    }

    /// Integer view. `None` yields [`NONE_SENTINEL`].
    pub fn as_integer(&self) -> i64 {
        match self {
            Value::Int(n) => *n,
            Value::Float(f) => *f as i64,
            _ => NONE_SENTINEL,
        }
    }

    /// Float view, promoting integers.
    pub fn as_float(&self) -> f64 {
        match self {
            Value::Int(n) => *n as f64,
            Value::Float(f) => *f,
            _ => f64::NAN,
        }
    }

    /// Textual form per the language's `asString` contract. Forces `Async`
    /// values, blocking the calling thread if necessary.
    pub fn as_string(&self) -> String {
        match self {
            Value::None => "(none)".to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Range { begin, end } => {
                let parts: Vec<String> = (*begin..=*end).map(|i| i.to_string()).collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Vector { buf, lo, hi } => {
                let parts: Vec<String> = buf[*lo..*hi].iter().map(|v| v.as_string()).collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Async(handle) => match handle.force() {
                Ok(v) => v.as_string(),
                Err(_) => "(none)".to_string(),
            },
        }
    }

    /// Returns the next element of a sequence, or `None` when exhausted.
    /// Scalars always yield `None`. Forces `Async` and delegates to the
    /// forced value.
    pub fn next(&self) -> Result<Value> {
        match self {
            Value::Int(_) | Value::Float(_) | Value::None => Ok(Value::None),
            Value::Range { begin, end } => {
                if begin < end {
                    Ok(Value::Range {
                        begin: begin + 1,
                        end: *end,
                    })
                } else {
                    Ok(Value::None)
                }
            }
            Value::Vector { buf, lo, hi } => {
                if lo + 1 < *hi {
                    Ok(Value::Vector {
                        buf: buf.clone(),
                        lo: lo + 1,
                        hi: *hi,
                    })
                } else {
                    Ok(Value::None)
                }
            }
            Value::Async(handle) => handle.force()?.next(),
        }
    }

    /// Returns the current head of a sequence as a fresh scalar.
    pub fn as_scalar(&self) -> Result<Value> {
        match self {
            Value::Int(_) | Value::Float(_) | Value::None => Ok(self.clone()),
            Value::Range { begin, .. } => Ok(Value::Int(*begin)),
            Value::Vector { buf, lo, hi } => {
                if lo >= hi {
                    Ok(Value::None)
                } else {
                    Ok(buf[*lo].clone())
                }
            }
            Value::Async(handle) => handle.force()?.as_scalar(),
        }
    }

    /// Number of elements: 1 for scalars, `end - begin + 1` for ranges,
    /// `hi - lo` for vectors. Forces `Async` first.
    pub fn size(&self) -> Result<usize> {
        match self {
            Value::Int(_) | Value::Float(_) | Value::None => Ok(1),
            Value::Range { begin, end } => Ok((end - begin + 1).max(0) as usize),
            Value::Vector { lo, hi, .. } => Ok(hi - lo),
            Value::Async(handle) => handle.force()?.size(),
        }
    }

    /// Materializes a sequence into an owned vector of its elements.
    pub fn iter_elements(&self) -> Result<Vec<Value>> {
        match self {
            Value::Range { begin, end } => Ok((*begin..=*end).map(Value::Int).collect()),
            Value::Vector { buf, lo, hi } => Ok(buf[*lo..*hi].to_vec()),
            Value::Async(handle) => handle.force()?.iter_elements(),
            _ => Err(Error::Internal {
                message: "iter_elements called on a scalar".to_string(),
            }),
        }
    }

    /// Sub-sequence over `[begin, end)` sharing storage with the original.
    pub fn slice(&self, begin: usize, end: usize) -> Result<Value> {
        match self {
            Value::Range {
                begin: cur_begin,
                end: cur_end,
            } => {
                let new_begin = cur_begin + begin as i64;
                let new_end = (*cur_end).min(cur_begin + end as i64 - 1);
                Ok(Value::Range {
                    begin: new_begin,
                    end: new_end,
                })
            }
            Value::Vector { buf, lo, hi } => {
                let new_lo = (lo + begin).min(*hi);
                let new_hi = (lo + end).min(*hi);
                Ok(Value::Vector {
                    buf: buf.clone(),
                    lo: new_lo,
                    hi: new_hi,
                })
            }
            Value::Async(handle) => handle.force()?.slice(begin, end),
            _ => Err(Error::Internal {
                message: "slice called on a scalar".to_string(),
            }),
        }
    }

    fn checked_int_div(a: i64, b: i64, span: Span) -> Result<i64> {
        if b == 0 {
            Err(Error::Arithmetic {
                message: "division by zero".to_string(),
                span,
            })
        } else {
            Ok(a.wrapping_div(b))
        }
    }

    fn checked_float_div(a: f64, b: f64, span: Span) -> Result<f64> {
        if b == 0.0 {
            Err(Error::Arithmetic {
                message: "division by zero".to_string(),
                span,
            })
        } else {
            Ok(a / b)
        }
    }

    fn binary_scalar_op(
        &self,
        other: &Value,
        span: Span,
        int_op: impl Fn(i64, i64) -> Result<i64>,
        float_op: impl Fn(f64, f64) -> Result<f64>,
    ) -> Result<Value> {
        let l = self.force()?;
        let r = other.force()?;

        if !l.is_scalar() || !r.is_scalar() {
            return Err(Error::Type {
                message: "arithmetic on a non-scalar value".to_string(),
                span,
            });
        }
        if l.is_none() || r.is_none() {
            return Ok(Value::None);
        }
        if l.is_scalar_float() || r.is_scalar_float() {
            Ok(Value::Float(float_op(l.as_float(), r.as_float())?))
        } else {
            Ok(Value::Int(int_op(l.as_integer(), r.as_integer())?))
        }
    }

    /// Adds two scalars, propagating `None` and promoting to float.
    pub fn add(&self, other: &Value, span: Span) -> Result<Value> {
        self.binary_scalar_op(other, span, |a, b| Ok(a.wrapping_add(b)), |a, b| Ok(a + b))
    }

    /// Subtracts two scalars, propagating `None` and promoting to float.
    pub fn sub(&self, other: &Value, span: Span) -> Result<Value> {
        self.binary_scalar_op(other, span, |a, b| Ok(a.wrapping_sub(b)), |a, b| Ok(a - b))
    }

    /// Multiplies two scalars, propagating `None` and promoting to float.
    pub fn mul(&self, other: &Value, span: Span) -> Result<Value> {
        self.binary_scalar_op(other, span, |a, b| Ok(a.wrapping_mul(b)), |a, b| Ok(a * b))
    }

    /// Divides two scalars. Integer division truncates toward zero. Division
    /// by zero is always an arithmetic error, for both integer and float
    /// operands — the interpreter never relies on host trap/NaN behavior.
    pub fn div(&self, other: &Value, span: Span) -> Result<Value> {
        self.binary_scalar_op(
            other,
            span,
            move |a, b| Value::checked_int_div(a, b, span),
            move |a, b| Value::checked_float_div(a, b, span),
        )
    }

    /// Raises `self` to the power of `other`. Integer results that overflow
    /// `i64` fail with an overflow error rather than silently truncating.
    pub fn pow(&self, other: &Value, span: Span) -> Result<Value> {
        let l = self.force()?;
        let r = other.force()?;

        if !l.is_scalar() || !r.is_scalar() {
            return Err(Error::Type {
                message: "arithmetic on a non-scalar value".to_string(),
                span,
            });
        }
        if l.is_none() || r.is_none() {
            return Ok(Value::None);
        }

        let is_float = l.is_scalar_float() || r.is_scalar_float();
        let exp_is_negative = r.as_float() < 0.0;

        if is_float || exp_is_negative {
            return Ok(Value::Float(l.as_float().powf(r.as_float())));
        }

        let base = l.as_integer();
        let exp = r.as_integer();
        let exp_u32 = u32::try_from(exp).map_err(|_| Error::Arithmetic {
            message: "overflow".to_string(),
            span,
        })?;
        base.checked_pow(exp_u32)
            .map(Value::Int)
            .ok_or(Error::Arithmetic {
                message: "overflow".to_string(),
                span,
            })
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Int(n) => write!(f, "Int({})", n),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Range { begin, end } => write!(f, "Range({}, {})", begin, end),
            Value::Vector { lo, hi, .. } => write!(f, "Vector(lo={}, hi={})", lo, hi),
            Value::Async(h) => write!(f, "{:?}", h),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Range { begin: b1, end: e1 }, Value::Range { begin: b2, end: e2 }) => {
                b1 == b2 && e1 == e2
            }
            (
                Value::Vector { buf: b1, lo: l1, hi: h1 },
                Value::Vector { buf: b2, lo: l2, hi: h2 },
            ) => b1[*l1..*h1] == b2[*l2..*h2],
            (Value::Async(a), Value::Async(b)) => Arc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}
