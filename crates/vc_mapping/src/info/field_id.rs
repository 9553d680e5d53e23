use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;
use core::num::NonZeroU64;
use core::sync::atomic::{AtomicU64, Ordering};

// -----------------------------------------------------------------------------
// Symbol

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// An opaque, process-unique field identifier.
///
/// Two symbols created with the same description are still distinct.
/// A symbol has no natural external key, so a field identified by one must
/// be registered with an explicit key.
///
/// # Examples
///
/// ```
/// use vc_mapping::info::Symbol;
///
/// let a = Symbol::new("cache");
/// let b = Symbol::new("cache");
/// assert_ne!(a, b);
/// assert_eq!(a.description(), "cache");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol {
    id: NonZeroU64,
    description: &'static str,
}

impl Symbol {
    /// Creates a new symbol.
    ///
    /// # Panics
    /// Panics once `u64::MAX` symbols have been created.
    pub fn new(description: &'static str) -> Self {
        let next = NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed);
        // `next` starts at 1 and only wraps after `u64::MAX` calls.
        let Some(id) = NonZeroU64::new(next) else {
            panic!("symbol identifiers exhausted");
        };
        Self { id, description }
    }

    /// Returns the description given on creation.
    #[inline]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Returns the numeric identity.
    #[inline]
    pub const fn index(&self) -> u64 {
        self.id.get()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({}#{})", self.description, self.id)
    }
}

// -----------------------------------------------------------------------------
// FieldId

/// The internal identifier of a mapped field.
///
/// Uniqueness is only required within one mapping table.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum FieldId {
    /// A field identified by its name; the name doubles as the default external key.
    Name(Cow<'static, str>),
    /// A field identified by an opaque [`Symbol`].
    Symbol(Symbol),
}

impl FieldId {
    /// Returns the name of a [`FieldId::Name`], or `None` for symbols.
    #[inline]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            FieldId::Name(name) => Some(name),
            FieldId::Symbol(_) => None,
        }
    }

    /// Returns the symbol of a [`FieldId::Symbol`].
    #[inline]
    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            FieldId::Name(_) => None,
            FieldId::Symbol(symbol) => Some(*symbol),
        }
    }

    /// Returns `true` if this is the symbol `symbol`.
    #[inline]
    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.as_symbol() == Some(symbol)
    }
}

impl From<&'static str> for FieldId {
    #[inline]
    fn from(value: &'static str) -> Self {
        FieldId::Name(Cow::Borrowed(value))
    }
}

impl From<String> for FieldId {
    #[inline]
    fn from(value: String) -> Self {
        FieldId::Name(Cow::Owned(value))
    }
}

impl From<Symbol> for FieldId {
    #[inline]
    fn from(value: Symbol) -> Self {
        FieldId::Symbol(value)
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::Name(name) => write!(f, "{name:?}"),
            FieldId::Symbol(symbol) => fmt::Debug::fmt(symbol, f),
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::Name(name) => write!(f, "`{name}`"),
            FieldId::Symbol(symbol) => write!(f, "[{}]", symbol.description),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
