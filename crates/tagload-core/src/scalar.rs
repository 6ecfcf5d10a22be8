//! # Scalar Fields and Default Literals
//!
//! A scalar is any leaf field a default literal can be parsed into. The
//! [`Scalar`] trait is object-safe so the walkers can hold a
//! `&mut dyn Scalar` without knowing the concrete type.
//!
//! ## Width Rules
//!
//! Integer literals are parsed directly into the declared type, so the
//! declared bit width is the range limit. Float literals that overflow the
//! declared width to infinity are rejected unless the literal itself spells
//! an infinity.

use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use thiserror::Error;

/// Declared type of a scalar field, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    Char,
    String,
}

impl ScalarType {
    /// The Rust spelling of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::String => "String",
        }
    }

    /// Returns true for the integer and float types.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::Char | Self::String)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A default literal could not be parsed into its declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    /// The literal is not a valid spelling of the type.
    #[error("invalid {ty} literal: {reason}")]
    Invalid {
        /// Declared type of the field.
        ty: ScalarType,
        /// Parser diagnostic.
        reason: String,
    },

    /// The literal is well-formed but does not fit the declared width.
    #[error("value out of range for {ty}")]
    OutOfRange {
        /// Declared type of the field.
        ty: ScalarType,
    },
}

/// A leaf field that can report zero-ness and accept a default literal.
pub trait Scalar {
    /// The declared type of the field.
    fn scalar_type(&self) -> ScalarType;

    /// Returns true if the field holds its type's zero value.
    fn is_zero(&self) -> bool;

    /// Parse `literal` into the declared type and overwrite the field.
    ///
    /// # Errors
    ///
    /// Returns [`LiteralError`] if the literal is malformed or out of range.
    /// The field is left untouched on error.
    fn assign_literal(&mut self, literal: &str) -> Result<(), LiteralError>;
}

fn parse_integer<T>(literal: &str, ty: ScalarType) -> Result<T, LiteralError>
where
    T: FromStr<Err = ParseIntError>,
{
    literal.parse::<T>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => LiteralError::OutOfRange { ty },
        _ => LiteralError::Invalid {
            ty,
            reason: e.to_string(),
        },
    })
}

fn spells_infinity(literal: &str) -> bool {
    let unsigned = literal.trim_start_matches(|c| c == '+' || c == '-');
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

macro_rules! integer_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            fn scalar_type(&self) -> ScalarType {
                ScalarType::$variant
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn assign_literal(&mut self, literal: &str) -> Result<(), LiteralError> {
                *self = parse_integer::<$ty>(literal, ScalarType::$variant)?;
                Ok(())
            }
        }
    )*};
}

integer_scalar! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

macro_rules! float_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            fn scalar_type(&self) -> ScalarType {
                ScalarType::$variant
            }

            fn is_zero(&self) -> bool {
                *self == 0.0
            }

            fn assign_literal(&mut self, literal: &str) -> Result<(), LiteralError> {
                let ty = ScalarType::$variant;
                let value = literal.parse::<$ty>().map_err(|e| LiteralError::Invalid {
                    ty,
                    reason: e.to_string(),
                })?;
                if value.is_infinite() && !spells_infinity(literal) {
                    return Err(LiteralError::OutOfRange { ty });
                }
                *self = value;
                Ok(())
            }
        }
    )*};
}

float_scalar! {
    f32 => F32,
    f64 => F64,
}

impl Scalar for bool {
    fn scalar_type(&self) -> ScalarType {
        ScalarType::Bool
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn assign_literal(&mut self, literal: &str) -> Result<(), LiteralError> {
        *self = literal.parse().map_err(|e: std::str::ParseBoolError| LiteralError::Invalid {
            ty: ScalarType::Bool,
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

impl Scalar for char {
    fn scalar_type(&self) -> ScalarType {
        ScalarType::Char
    }

    fn is_zero(&self) -> bool {
        *self == '\0'
    }

    fn assign_literal(&mut self, literal: &str) -> Result<(), LiteralError> {
        let mut chars = literal.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                *self = c;
                Ok(())
            }
            _ => Err(LiteralError::Invalid {
                ty: ScalarType::Char,
                reason: format!("expected exactly one character, got {literal:?}"),
            }),
        }
    }
}

impl Scalar for String {
    fn scalar_type(&self) -> ScalarType {
        ScalarType::String
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn assign_literal(&mut self, literal: &str) -> Result<(), LiteralError> {
        literal.clone_into(self);
        Ok(())
    }
}

/// Pointer-to-scalar: zero iff `None`, and a default literal produces `Some`.
impl<T: Scalar + Default> Scalar for Option<T> {
    fn scalar_type(&self) -> ScalarType {
        match self {
            Some(value) => value.scalar_type(),
            None => T::default().scalar_type(),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn assign_literal(&mut self, literal: &str) -> Result<(), LiteralError> {
        let mut value = T::default();
        value.assign_literal(literal)?;
        *self = Some(value);
        Ok(())
    }
}
