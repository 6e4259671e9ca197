use std::borrow::Cow;
use std::env;
use std::fmt;
use std::io;
use std::ops::Deref;

/// A lazily-formatted error message. Set `PANIC_ON_ERR=1` to turn the first
/// error built anywhere in the workspace into a hard panic, which is handy
/// when single-stepping a failing analysis under a debugger.
#[derive(Debug)]
pub struct ErrString(Cow<'static, str>);

impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    fn from(msg: T) -> Self {
        if env::var("PANIC_ON_ERR").as_deref().unwrap_or("") == "1" {
            panic!("{}", msg.into())
        } else {
            ErrString(msg.into())
        }
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ErrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The error kinds a residual-policy analysis can fail with.
#[derive(Debug, thiserror::Error)]
pub enum LegaleaseError {
    /// Surface syntax violates the Legalease grammar.
    #[error("parse error: {0}")]
    ParseError(ErrString),
    /// A filter used `<`, `>`, or `!=`, which the policy algebra deliberately
    /// leaves unimplemented.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(ErrString),
    /// An unknown privacy technique name appeared in a `PRIVACY` attribute.
    #[error("unsupported privacy technique: {0}")]
    UnsupportedPrivacyTech(ErrString),
    /// A column referenced by an operation is not present in a DataFrame's schema.
    #[error("schema error: {0}")]
    SchemaError(ErrString),
    /// A `Series` produced by one DataFrame was used to index a different one.
    #[error("series used to index a dataframe it was not derived from: {0}")]
    CrossFrameSeries(ErrString),
    /// A comparison `Series` (one that already carries an interval) was compared again.
    #[error("invalid reuse of an indicator series: {0}")]
    InvalidReuse(ErrString),
    /// An internal invariant was broken (double-extension of a value, mismatched
    /// attribute kinds where equality was assumed, and so on).
    #[error("invariant violation: {0}")]
    InvariantViolation(ErrString),
    /// A `policy.txt`/`meta.txt` sidecar file is missing or malformed.
    #[error(transparent)]
    IoError(#[from] io::Error),
}

pub type LegaleaseResult<T> = Result<T, LegaleaseError>;

#[macro_export]
macro_rules! legalease_err {
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::LegaleaseError::$variant(format!($fmt, $($arg),*).into())
    };
    ($variant:ident: $err:expr $(,)?) => {
        $crate::LegaleaseError::$variant($err.into())
    };
}

#[macro_export]
macro_rules! legalease_bail {
    ($($tt:tt)+) => {
        return Err($crate::legalease_err!($($tt)+))
    };
}

#[macro_export]
macro_rules! legalease_ensure {
    ($cond:expr, $($tt:tt)+) => {
        if !$cond {
            $crate::legalease_bail!($($tt)+);
        }
    };
}
