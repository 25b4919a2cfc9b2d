//! Value types for the key-value store

use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Numeric scalar
///
/// Integers and floats compare by exact numeric value, so `Int(1) == Float(1.0)`
/// while an integer that no f64 can represent never equals a float.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Numeric value as a float
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Add two numbers, returns None on integer overflow
    ///
    /// Integer + integer stays an integer; anything involving a float
    /// becomes a float.
    pub fn checked_add(self, rhs: Number) -> Option<Number> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a.checked_add(b).map(Number::Int),
            (a, b) => Some(Number::Float(a.as_f64() + b.as_f64())),
        }
    }

    /// Negate, returns None for `i64::MIN`
    pub fn checked_neg(self) -> Option<Number> {
        match self {
            Number::Int(i) => i.checked_neg().map(Number::Int),
            Number::Float(f) => Some(Number::Float(-f)),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Int(i), Number::Float(f)) | (Number::Float(f), Number::Int(i)) => {
                int_eq_float(i, f)
            }
        }
    }
}

/// Exact comparison, no rounding of `i` through f64
fn int_eq_float(i: i64, f: f64) -> bool {
    // i64 covers [-2^63, 2^63)
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    f.fract() == 0.0 && (-BOUND..BOUND).contains(&f) && f as i64 == i
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Number::Int(i as i64)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Leaf value held directly by a key, a hash field or a collection member
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// UTF-8 text
    String(String),

    /// Integer or float
    Number(Number),

    /// Boolean flag
    Bool(bool),

    /// Opaque binary buffer
    Bytes(Bytes),
}

/// Set of values with deep-equality deduplication
///
/// Members keep insertion order. Values may contain floats and maps, so they
/// are not hashable and membership is a linear scan.
#[derive(Debug, Clone, Default)]
pub struct ValueSet {
    members: Vec<Value>,
}

impl ValueSet {
    pub fn new() -> Self {
        ValueSet { members: Vec::new() }
    }

    /// Insert a member, returns false if an equal member is already present
    pub fn insert(&mut self, member: Value) -> bool {
        if self.contains(&member) {
            return false;
        }
        self.members.push(member);
        true
    }

    pub fn contains(&self, member: &Value) -> bool {
        self.members.iter().any(|m| m == member)
    }

    /// Remove a member, returns true if it was present
    pub fn remove(&mut self, member: &Value) -> bool {
        match self.members.iter().position(|m| m == member) {
            Some(pos) => {
                self.members.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.members.iter()
    }
}

// Order does not matter for set equality
impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.members.iter().all(|m| other.contains(m))
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for member in iter {
            set.insert(member);
        }
        set
    }
}

/// Represents the different types of values that can be stored
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Single scalar (string, number, boolean or bytes)
    Scalar(Scalar),

    /// Hash map (field -> value)
    Hash(HashMap<String, Value>),

    /// Set of unique values
    Set(ValueSet),

    /// List of values (ordered)
    List(VecDeque<Value>),
}

impl Value {
    /// Create an empty list
    pub fn empty_list() -> Self {
        Value::List(VecDeque::new())
    }

    /// Create an empty set
    pub fn empty_set() -> Self {
        Value::Set(ValueSet::new())
    }

    /// Create an empty hash
    pub fn empty_hash() -> Self {
        Value::Hash(HashMap::new())
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Hash(_) => "hash",
            Value::Set(_) => "set",
            Value::List(_) => "list",
        }
    }

    /// Try to get as scalar
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as number
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Scalar(Scalar::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Try to get as hash reference
    pub fn as_hash(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    /// Try to get as mutable hash
    pub fn as_hash_mut(&mut self) -> Option<&mut HashMap<String, Value>> {
        match self {
            Value::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    /// Try to get as set reference
    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Try to get as mutable set
    pub fn as_set_mut(&mut self) -> Option<&mut ValueSet> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Try to get as list reference
    pub fn as_list(&self) -> Option<&VecDeque<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get as mutable list
    pub fn as_list_mut(&mut self) -> Option<&mut VecDeque<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Calculate approximate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        match self {
            Value::Scalar(Scalar::String(s)) => s.len(),
            Value::Scalar(Scalar::Bytes(b)) => b.len(),
            Value::Scalar(Scalar::Number(_)) => std::mem::size_of::<Number>(),
            Value::Scalar(Scalar::Bool(_)) => std::mem::size_of::<bool>(),
            Value::Hash(hash) => {
                let items_size: usize = hash
                    .iter()
                    .map(|(k, v)| k.len() + v.memory_usage())
                    .sum();
                items_size + std::mem::size_of::<HashMap<String, Value>>()
            }
            Value::Set(set) => {
                let items_size: usize = set.iter().map(Value::memory_usage).sum();
                items_size + std::mem::size_of::<ValueSet>()
            }
            Value::List(list) => {
                let items_size: usize = list.iter().map(Value::memory_usage).sum();
                items_size + std::mem::size_of::<VecDeque<Value>>()
            }
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Scalar(Scalar::Number(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Number::Int(i).into()
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Number::from(i).into()
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Number::Float(f).into()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Scalar(Scalar::Bytes(b))
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Scalar(Scalar::Bytes(Bytes::from(b)))
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(hash: HashMap<String, Value>) -> Self {
        Value::Hash(hash)
    }
}

impl From<ValueSet> for Value {
    fn from(set: ValueSet) -> Self {
        Value::Set(set)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list.into())
    }
}
