//! Galois field GF(2^M) arithmetic
//!
//! ## Representations
//!
//! Field elements come in two explicit forms:
//!
//! - [`Value`]: polynomial (vector) form in `0..=N`. Addition is XOR.
//! - [`Index`]: discrete logarithm of a nonzero value with respect to the
//!   primitive element, in `0..N`. Multiplication is index addition mod N.
//!
//! Conversions go through the `exp`/`log` tables of a [`GaloisField`]. The zero
//! value has no logarithm, so [`GaloisField::to_index`] returns `None` for it.
//! Mixed-form operations (`mul`, `div`, `fma`) accept any combination of the two
//! forms through the [`Operand`] trait and short-circuit on zero.
//!
//! ## Sharing
//!
//! Tables are built once per (M, POLY, symbol type) by [`GaloisField::shared`]
//! and handed out as `Arc`s. Construction runs under the registry lock, so
//! concurrent first use never observes a partially built table.

use crate::error::FieldError;
use bytemuck::TransparentWrapper;
use log::debug;
use rustc_hash::FxHashMap as HashMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::ops::{Add, AddAssign, BitXor};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Largest supported field degree M
pub const MAX_DEGREE: u32 = 16;

/// Unsigned integer type used to store field symbols
pub trait Symbol:
    Copy
    + Eq
    + Ord
    + std::hash::Hash
    + Default
    + BitXor<Output = Self>
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
{
    const BITS: u32;

    /// Truncating conversion, callers keep `v` below `2^BITS`
    fn from_u32(v: u32) -> Self;

    fn to_u32(self) -> u32;

    #[inline(always)]
    fn to_usize(self) -> usize {
        self.to_u32() as usize
    }
}

macro_rules! impl_symbol {
    ($($ty:ty),*) => {
        $(
            impl Symbol for $ty {
                const BITS: u32 = <$ty>::BITS;

                #[inline(always)]
                fn from_u32(v: u32) -> Self {
                    v as $ty
                }

                #[inline(always)]
                fn to_u32(self) -> u32 {
                    self as u32
                }
            }
        )*
    };
}

impl_symbol!(u8, u16, u32);

/// Field element in polynomial (vector) form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Value<T>(T);

// SAFETY: `Value<T>` is `repr(transparent)` over its only field `T`.
unsafe impl<T: Symbol> TransparentWrapper<T> for Value<T> {}

impl<T: Symbol> Value<T> {
    #[inline(always)]
    pub(crate) fn new(v: T) -> Self {
        Self(v)
    }

    /// Additive identity
    #[inline(always)]
    pub fn zero() -> Self {
        Self(T::default())
    }

    /// Multiplicative identity
    #[inline(always)]
    pub fn one() -> Self {
        Self(T::from_u32(1))
    }

    #[inline(always)]
    pub fn get(self) -> T {
        self.0
    }

    #[inline(always)]
    pub fn is_zero(self) -> bool {
        self.0 == T::default()
    }
}

// Addition (XOR in characteristic 2)
impl<T: Symbol> Add for Value<T> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl<T: Symbol> AddAssign for Value<T> {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0 ^ rhs.0;
    }
}

impl<T: Symbol> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Nonzero field element as a power of the primitive element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Index<T>(T);

impl<T: Symbol> Index<T> {
    #[inline(always)]
    pub(crate) fn new(i: u32) -> Self {
        Self(T::from_u32(i))
    }

    #[inline(always)]
    pub fn get(self) -> T {
        self.0
    }

    #[inline(always)]
    fn raw(self) -> u32 {
        self.0.to_u32()
    }
}

impl<T: Symbol> fmt::Display for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pe^{}", self.0)
    }
}

/// Operand of the mixed-representation operations on [`GaloisField`]
pub trait Operand<T: Symbol>: Copy {
    /// Discrete logarithm of the operand, `None` for the zero value
    fn log_in(self, field: &GaloisField<T>) -> Option<u32>;
}

impl<T: Symbol> Operand<T> for Value<T> {
    #[inline(always)]
    fn log_in(self, field: &GaloisField<T>) -> Option<u32> {
        field.to_index(self).map(Index::raw)
    }
}

impl<T: Symbol> Operand<T> for Index<T> {
    #[inline(always)]
    fn log_in(self, _field: &GaloisField<T>) -> Option<u32> {
        Some(self.raw())
    }
}

/// Checks every symbol against `bound` and views the slice as field values
pub fn as_values<T: Symbol>(symbols: &[T], bound: u32) -> Result<&[Value<T>], FieldError> {
    check_bound(symbols, bound)?;
    Ok(Value::wrap_slice(symbols))
}

/// Mutable counterpart of [`as_values`]
pub fn as_values_mut<T: Symbol>(
    symbols: &mut [T],
    bound: u32,
) -> Result<&mut [Value<T>], FieldError> {
    check_bound(symbols, bound)?;
    Ok(Value::wrap_slice_mut(symbols))
}

fn check_bound<T: Symbol>(symbols: &[T], bound: u32) -> Result<(), FieldError> {
    match symbols.iter().position(|s| s.to_u32() > bound) {
        Some(position) => Err(FieldError::SymbolOutOfRange {
            position,
            value: symbols[position].to_u32(),
            bound,
        }),
        None => Ok(()),
    }
}

type Registry = Mutex<HashMap<(TypeId, u32, u32), Arc<dyn Any + Send + Sync>>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Lookup tables and arithmetic for one GF(2^M) parameterization
pub struct GaloisField<T: Symbol> {
    degree: u32,
    poly: u32,
    n: u32,
    exp: Box<[T]>,
    log: Box<[T]>,
    imap: Box<[T]>,
}

impl<T: Symbol> fmt::Debug for GaloisField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GaloisField")
            .field("degree", &self.degree)
            .field("poly", &format_args!("{:#x}", self.poly))
            .finish()
    }
}

impl<T: Symbol> GaloisField<T> {
    /// Build the tables for GF(2^degree) generated by `poly`
    pub fn new(degree: u32, poly: u32) -> Result<Self, FieldError> {
        if !(2..=MAX_DEGREE).contains(&degree) {
            return Err(FieldError::UnsupportedDegree(degree));
        }
        if degree > T::BITS {
            return Err(FieldError::SymbolTooNarrow {
                degree,
                bits: T::BITS,
            });
        }
        if poly >> degree != 1 {
            return Err(FieldError::DegreeMismatch { poly, degree });
        }

        let q = 1u32 << degree;
        let n = q - 1;
        let unset = T::from_u32(n);
        let mut exp = vec![T::default(); q as usize];
        let mut log = vec![unset; q as usize];

        let mut a = 1u32;
        for i in 0..n {
            // Revisiting a value before N steps means x has order below N
            if a == 0 || log[a as usize] != unset {
                return Err(FieldError::NotPrimitive { poly });
            }
            exp[i as usize] = T::from_u32(a);
            log[a as usize] = T::from_u32(i);

            a <<= 1;
            if a & q != 0 {
                a ^= poly;
            }
        }
        if a != 1 {
            return Err(FieldError::NotPrimitive { poly });
        }
        exp[n as usize] = T::from_u32(1);

        let mut field = Self {
            degree,
            poly,
            n,
            exp: exp.into_boxed_slice(),
            log: log.into_boxed_slice(),
            imap: Box::default(),
        };

        // r and r+1 share r^2 + r, keep the even one
        let mut imap = vec![T::default(); q as usize];
        for r in (2..q).step_by(2) {
            let r = Value::new(T::from_u32(r));
            let c = field.mul(r, r) + r;
            imap[c.0.to_usize()] = r.0;
        }
        field.imap = imap.into_boxed_slice();

        debug!("Built GF(2^{}) tables for polynomial {:#x}", degree, poly);
        Ok(field)
    }

    /// Shared field for (degree, poly, T), building the tables on first use
    pub fn shared(degree: u32, poly: u32) -> Result<Arc<Self>, FieldError> {
        let registry = REGISTRY.get_or_init(Default::default);
        let mut fields = registry.lock().unwrap_or_else(PoisonError::into_inner);

        let key = (TypeId::of::<T>(), degree, poly);
        if let Some(field) = fields.get(&key) {
            if let Ok(field) = Arc::clone(field).downcast::<Self>() {
                return Ok(field);
            }
        }

        let field = Arc::new(Self::new(degree, poly)?);
        fields.insert(key, field.clone());
        Ok(field)
    }

    /// Field degree M
    #[inline]
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Generator polynomial POLY
    #[inline]
    pub fn poly(&self) -> u32 {
        self.poly
    }

    /// Number of elements Q = 2^M
    #[inline]
    pub fn size(&self) -> u32 {
        self.n + 1
    }

    /// Number of nonzero elements N = Q - 1
    #[inline]
    pub fn order(&self) -> u32 {
        self.n
    }

    /// Checked construction of a value
    pub fn value(&self, v: T) -> Result<Value<T>, FieldError> {
        if v.to_u32() > self.n {
            return Err(FieldError::ValueOutOfRange {
                value: v.to_u32(),
                degree: self.degree,
            });
        }
        Ok(Value::new(v))
    }

    /// Checked construction of an index
    pub fn index(&self, i: u32) -> Result<Index<T>, FieldError> {
        if i >= self.n {
            return Err(FieldError::IndexOutOfRange {
                index: i,
                order: self.n,
            });
        }
        Ok(Index::new(i))
    }

    /// pe^e for any exponent
    #[inline]
    pub fn primitive_power(&self, e: u64) -> Index<T> {
        Index::new((e % self.n as u64) as u32)
    }

    /// View symbols as values of this field
    pub fn values<'a>(&self, symbols: &'a [T]) -> Result<&'a [Value<T>], FieldError> {
        as_values(symbols, self.n)
    }

    /// Logarithm of `a`, `None` for zero
    #[inline(always)]
    pub fn to_index(&self, a: Value<T>) -> Option<Index<T>> {
        if a.is_zero() {
            None
        } else {
            Some(Index(self.log[a.0.to_usize()]))
        }
    }

    #[inline(always)]
    pub fn to_value(&self, a: Index<T>) -> Value<T> {
        Value(self.exp[a.0.to_usize()])
    }

    #[inline(always)]
    fn add_mod(&self, a: u32, b: u32) -> u32 {
        let sum = a + b;
        if sum >= self.n {
            sum - self.n
        } else {
            sum
        }
    }

    #[inline(always)]
    fn sub_mod(&self, a: u32, b: u32) -> u32 {
        if a >= b {
            a - b
        } else {
            a + self.n - b
        }
    }

    #[inline(always)]
    pub fn add(&self, a: Value<T>, b: Value<T>) -> Value<T> {
        a + b
    }

    /// a * b in any mix of representations
    #[inline(always)]
    pub fn mul<A: Operand<T>, B: Operand<T>>(&self, a: A, b: B) -> Value<T> {
        match (a.log_in(self), b.log_in(self)) {
            (Some(x), Some(y)) => Value(self.exp[self.add_mod(x, y) as usize]),
            _ => Value::zero(),
        }
    }

    /// a / b, `None` when b is zero
    #[inline(always)]
    pub fn checked_div<A: Operand<T>, B: Operand<T>>(&self, a: A, b: B) -> Option<Value<T>> {
        let y = b.log_in(self)?;
        Some(match a.log_in(self) {
            Some(x) => Value(self.exp[self.sub_mod(x, y) as usize]),
            None => Value::zero(),
        })
    }

    /// a / b; dividing by zero is a caller bug
    #[inline(always)]
    pub fn div<A: Operand<T>, B: Operand<T>>(&self, a: A, b: B) -> Value<T> {
        let quotient = self.checked_div(a, b);
        debug_assert!(quotient.is_some(), "division by zero in GF(2^{})", self.degree);
        quotient.unwrap_or_default()
    }

    /// 1 / a; a must be nonzero
    #[inline]
    pub fn rcp<A: Operand<T>>(&self, a: A) -> Value<T> {
        self.div(Index::<T>::new(0), a)
    }

    /// a * b + c, returning c untouched when a or b is zero
    #[inline(always)]
    pub fn fma<A: Operand<T>, B: Operand<T>>(&self, a: A, b: B, c: Value<T>) -> Value<T> {
        match (a.log_in(self), b.log_in(self)) {
            (Some(x), Some(y)) => Value(self.exp[self.add_mod(x, y) as usize]) + c,
            _ => c,
        }
    }

    #[inline(always)]
    pub fn mul_index(&self, a: Index<T>, b: Index<T>) -> Index<T> {
        Index::new(self.add_mod(a.raw(), b.raw()))
    }

    #[inline(always)]
    pub fn div_index(&self, a: Index<T>, b: Index<T>) -> Index<T> {
        Index::new(self.sub_mod(a.raw(), b.raw()))
    }

    #[inline]
    pub fn rcp_index(&self, a: Index<T>) -> Index<T> {
        Index::new(self.sub_mod(0, a.raw()))
    }

    /// a^e, negative exponents allowed
    #[inline]
    pub fn pow_index(&self, a: Index<T>, e: i64) -> Index<T> {
        let exponent = (a.raw() as i64 * e).rem_euclid(self.n as i64);
        Index::new(exponent as u32)
    }

    /// Root r of r^2 + r = c, `None` when the quadratic does not split
    ///
    /// The other root is r + 1. `c = 0` yields `None` since its roots are the
    /// trivial 0 and 1.
    #[inline]
    pub fn artin_schreier_root(&self, c: Value<T>) -> Option<Value<T>> {
        let r = Value(self.imap[c.0.to_usize()]);
        if r.is_zero() {
            None
        } else {
            Some(r)
        }
    }
}
