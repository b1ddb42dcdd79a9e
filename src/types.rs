use std::fmt;
use std::path::{Path, PathBuf};

use bigdecimal::BigDecimal;
use num_complex::Complex64;
use num_rational::BigRational;

use crate::literal;

/// The closed set of singleton kinds a field can hold.
///
/// Every kind has a canonical text form (see [`literal`](crate::literal)),
/// which is what CLI arguments are parsed from and what tagged JSON values
/// carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Signed 64-bit integer.
    Integer,
    /// Exact rational number, e.g. `2/3`.
    Rational,
    /// Arbitrary-precision decimal, e.g. `1e-4`.
    Decimal,
    /// 64-bit floating point number.
    Float,
    /// Complex number with `f64` components, e.g. `1+2j`.
    Complex,
    /// UTF-8 text.
    Text,
    /// `true` or `false`. Never interchangeable with [`Integer`](Kind::Integer).
    Boolean,
    /// Filesystem path.
    Path,
}

impl Kind {
    pub const ALL: [Kind; 8] = [
        Kind::Integer,
        Kind::Rational,
        Kind::Decimal,
        Kind::Float,
        Kind::Complex,
        Kind::Text,
        Kind::Boolean,
        Kind::Path,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Integer => "integer",
            Kind::Rational => "rational",
            Kind::Decimal => "decimal",
            Kind::Float => "float",
            Kind::Complex => "complex",
            Kind::Text => "text",
            Kind::Boolean => "boolean",
            Kind::Path => "path",
        }
    }

    /// Placeholder shown in CLI usage lines.
    pub fn metavar(self) -> &'static str {
        match self {
            Kind::Integer => "INT",
            Kind::Rational => "FRACTION",
            Kind::Decimal => "DECIMAL",
            Kind::Float => "FLOAT",
            Kind::Complex => "COMPLEX",
            Kind::Text => "TEXT",
            Kind::Boolean => "BOOL",
            Kind::Path => "PATH",
        }
    }

    /// Kinds whose literals may start with a minus sign.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Kind::Integer | Kind::Rational | Kind::Decimal | Kind::Float | Kind::Complex
        )
    }

    /// Parse text into a value of this kind.
    pub fn parse(self, text: &str) -> Result<Value, String> {
        literal::parse(self, text)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Rational(BigRational),
    Decimal(BigDecimal),
    Float(f64),
    Complex(Complex64),
    Text(String),
    Boolean(bool),
    Path(PathBuf),
    /// Homogeneous list. Only valid for sequence fields.
    List(Vec<Value>),
}

impl Value {
    /// The singleton kind of this value, or `None` for lists.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Value::Integer(_) => Some(Kind::Integer),
            Value::Rational(_) => Some(Kind::Rational),
            Value::Decimal(_) => Some(Kind::Decimal),
            Value::Float(_) => Some(Kind::Float),
            Value::Complex(_) => Some(Kind::Complex),
            Value::Text(_) => Some(Kind::Text),
            Value::Boolean(_) => Some(Kind::Boolean),
            Value::Path(_) => Some(Kind::Path),
            Value::List(_) => None,
        }
    }

    /// Name of the runtime type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.name(),
            None => "list",
        }
    }

    /// Display form with text quoted, for listing choices.
    pub fn repr(&self) -> String {
        match self {
            Value::Text(s) => format!("'{s}'"),
            Value::List(items) => format!("[{}]", join_repr(items)),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Rational(r) => write!(f, "{r}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Complex(c) => f.write_str(&literal::format_complex(c)),
            Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Join values with `, ` using [`Value::repr`].
pub(crate) fn join_repr(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::repr)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<BigRational> for Value {
    fn from(v: BigRational) -> Self {
        Value::Rational(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Complex64> for Value {
    fn from(v: Complex64) -> Self {
        Value::Complex(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<PathBuf> for Value {
    fn from(v: PathBuf) -> Self {
        Value::Path(v)
    }
}

impl From<&Path> for Value {
    fn from(v: &Path) -> Self {
        Value::Path(v.to_path_buf())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// A field's type as written by the schema author, before classification.
///
/// This can express shapes the library rejects (unions, bare containers,
/// nested lists); [`classify`](crate::classify::classify) decides.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    /// One of the supported singleton kinds.
    Singleton(Kind),
    /// A fixed set of literal choices. Empty means a bare choice marker.
    Choice(Vec<Value>),
    /// A list parameterized by its type arguments. Empty means a bare list.
    List(Vec<DeclaredType>),
    /// A union of alternatives.
    Union(Vec<DeclaredType>),
    /// Any other named type.
    Opaque(String),
}

impl DeclaredType {
    pub fn choice<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        DeclaredType::Choice(values.into_iter().map(Into::into).collect())
    }

    pub fn list_of(element: impl Into<DeclaredType>) -> Self {
        DeclaredType::List(vec![element.into()])
    }
}

impl From<Kind> for DeclaredType {
    fn from(kind: Kind) -> Self {
        DeclaredType::Singleton(kind)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Singleton(kind) => write!(f, "{kind}"),
            DeclaredType::Choice(values) => write!(f, "choice[{}]", join_repr(values)),
            DeclaredType::List(args) => {
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                if args.is_empty() {
                    f.write_str("list")
                } else {
                    write!(f, "list[{}]", args.join(", "))
                }
            }
            DeclaredType::Union(alternatives) => {
                let alternatives: Vec<String> =
                    alternatives.iter().map(ToString::to_string).collect();
                f.write_str(&alternatives.join(" | "))
            }
            DeclaredType::Opaque(name) => f.write_str(name),
        }
    }
}

/// The classified shape of a declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Singleton(Kind),
    /// Non-empty, all values of one kind.
    ChoiceSet(Vec<Value>),
    Sequence(Kind),
    Unsupported,
}

/// How many values a CLI argument takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    Single,
    ZeroOrMore,
}
