use std::collections::HashMap;
use std::sync::OnceLock;

/// A reserved word of the Gluon language.
///
/// The vocabulary is closed: declaration structure words, an annotation set
/// written with a leading `@`, and the built-in scalar type names. Discriminants
/// are the keyword codes handed to the parser; `0` is reserved to mean "not a
/// keyword", so codes start at 1. The type keywords occupy the contiguous
/// range [`Keyword::Byte`]..=[`Keyword::Void`] so the generator can classify
/// them with a range check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Keyword {
    Class = 1,
    Const,
    Constructor,
    Destructor,
    Get,
    Implements,
    Interface,
    Keys,
    Legacy,
    Methods,
    Mixin,
    Params,
    Properties,
    Return,
    Set,
    Values,

    AtConstGet,
    AtConstSet,
    AtIn,
    AtInout,
    AtNonull,
    AtOut,
    AtOwn,
    AtProtected,
    AtVirtual,
    AtWarnUnused,

    Byte,
    Ubyte,
    Char,
    Short,
    Ushort,
    Int,
    Uint,
    Long,
    Ulong,
    Llong,
    Ullong,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Int128,
    Uint128,
    Size,
    Ssize,
    Intptr,
    Uintptr,
    Ptrdiff,
    Time,
    Float,
    Double,
    Ldouble,
    Bool,
    Void,
}

// Every keyword, in discriminant order. Drives the lookup map construction and
// must stay parallel to SPELLINGS.
const ALL: [Keyword; 58] = [
    Keyword::Class,
    Keyword::Const,
    Keyword::Constructor,
    Keyword::Destructor,
    Keyword::Get,
    Keyword::Implements,
    Keyword::Interface,
    Keyword::Keys,
    Keyword::Legacy,
    Keyword::Methods,
    Keyword::Mixin,
    Keyword::Params,
    Keyword::Properties,
    Keyword::Return,
    Keyword::Set,
    Keyword::Values,
    Keyword::AtConstGet,
    Keyword::AtConstSet,
    Keyword::AtIn,
    Keyword::AtInout,
    Keyword::AtNonull,
    Keyword::AtOut,
    Keyword::AtOwn,
    Keyword::AtProtected,
    Keyword::AtVirtual,
    Keyword::AtWarnUnused,
    Keyword::Byte,
    Keyword::Ubyte,
    Keyword::Char,
    Keyword::Short,
    Keyword::Ushort,
    Keyword::Int,
    Keyword::Uint,
    Keyword::Long,
    Keyword::Ulong,
    Keyword::Llong,
    Keyword::Ullong,
    Keyword::Int8,
    Keyword::Uint8,
    Keyword::Int16,
    Keyword::Uint16,
    Keyword::Int32,
    Keyword::Uint32,
    Keyword::Int64,
    Keyword::Uint64,
    Keyword::Int128,
    Keyword::Uint128,
    Keyword::Size,
    Keyword::Ssize,
    Keyword::Intptr,
    Keyword::Uintptr,
    Keyword::Ptrdiff,
    Keyword::Time,
    Keyword::Float,
    Keyword::Double,
    Keyword::Ldouble,
    Keyword::Bool,
    Keyword::Void,
];

// Source spellings, indexed by keyword code minus one.
const SPELLINGS: [&str; 58] = [
    "class",
    "const",
    "constructor",
    "destructor",
    "get",
    "implements",
    "interface",
    "keys",
    "legacy",
    "methods",
    "mixin",
    "params",
    "properties",
    "return",
    "set",
    "values",
    "@const_get",
    "@const_set",
    "@in",
    "@inout",
    "@nonull",
    "@out",
    "@own",
    "@protected",
    "@virtual",
    "@warn_unused",
    "byte",
    "ubyte",
    "char",
    "short",
    "ushort",
    "int",
    "uint",
    "long",
    "ulong",
    "llong",
    "ullong",
    "int8",
    "uint8",
    "int16",
    "uint16",
    "int32",
    "uint32",
    "int64",
    "uint64",
    "int128",
    "uint128",
    "size",
    "ssize",
    "intptr",
    "uintptr",
    "ptrdiff",
    "time",
    "float",
    "double",
    "ldouble",
    "bool",
    "void",
];

// Native C spellings for the type keywords, indexed from Keyword::Byte.
const NATIVE_TYPES: [&str; 32] = [
    "signed char",
    "unsigned char",
    "char",
    "short",
    "unsigned short",
    "int",
    "unsigned int",
    "long",
    "unsigned long",
    "long long",
    "unsigned long long",
    "int8_t",
    "uint8_t",
    "int16_t",
    "uint16_t",
    "int32_t",
    "uint32_t",
    "int64_t",
    "uint64_t",
    "int128_t",
    "uint128_t",
    "size_t",
    "ssize_t",
    "intptr_t",
    "uintptr_t",
    "ptrdiff_t",
    "time_t",
    "float",
    "double",
    "long double",
    "bool",
    "void",
];

const_assert_eq!(ALL.len(), SPELLINGS.len());
const_assert_eq!(
    NATIVE_TYPES.len(),
    Keyword::Void as usize - Keyword::Byte as usize + 1
);

impl Keyword {
    /// Looks up a spelling in the reserved-word table.
    ///
    /// The table is built once, on first use, and lives for the rest of the
    /// process; it is read-only afterwards and safe for concurrent readers.
    pub fn lookup(text: &str) -> Option<Keyword> {
        static MAP: OnceLock<HashMap<&'static str, Keyword>> = OnceLock::new();
        let map = MAP.get_or_init(|| {
            ALL.iter().zip(SPELLINGS.iter()).map(|(kw, s)| (*s, *kw)).collect()
        });
        map.get(text).copied()
    }

    /// The spelling as written in Gluon source.
    pub fn as_str(self) -> &'static str {
        SPELLINGS[self as usize - 1]
    }

    /// The numeric keyword code. `0` never names a keyword.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// True when the keyword names a built-in scalar type.
    pub fn is_type(self) -> bool {
        (self as u8) >= (Keyword::Byte as u8) && (self as u8) <= (Keyword::Void as u8)
    }

    /// The native C spelling for a built-in scalar type keyword, used by the
    /// binding generator. `None` for keywords outside the type range.
    pub fn native_type(self) -> Option<&'static str> {
        if !self.is_type() {
            return None;
        }
        Some(NATIVE_TYPES[self as usize - Keyword::Byte as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::Keyword;

    #[test]
    fn lookup_round_trips_spellings() {
        assert_eq!(Keyword::lookup("class"), Some(Keyword::Class));
        assert_eq!(Keyword::lookup("@warn_unused"), Some(Keyword::AtWarnUnused));
        assert_eq!(Keyword::lookup("uint128"), Some(Keyword::Uint128));
        assert_eq!(Keyword::AtNonull.as_str(), "@nonull");
        assert_eq!(Keyword::Void.as_str(), "void");
    }

    #[test]
    fn lookup_rejects_non_keywords() {
        assert_eq!(Keyword::lookup("klass"), None);
        assert_eq!(Keyword::lookup("@bogus"), None);
        assert_eq!(Keyword::lookup(""), None);
        // The annotation prefix alone is not a keyword.
        assert_eq!(Keyword::lookup("@"), None);
    }

    #[test]
    fn type_range_is_contiguous() {
        assert!(Keyword::Byte.is_type());
        assert!(Keyword::Void.is_type());
        assert!(Keyword::Time.is_type());
        assert!(!Keyword::Values.is_type());
        assert!(!Keyword::AtWarnUnused.is_type());
        assert!(!Keyword::Class.is_type());
    }

    #[test]
    fn native_types_follow_the_table() {
        assert_eq!(Keyword::Byte.native_type(), Some("signed char"));
        assert_eq!(Keyword::Ullong.native_type(), Some("unsigned long long"));
        assert_eq!(Keyword::Ldouble.native_type(), Some("long double"));
        assert_eq!(Keyword::Bool.native_type(), Some("bool"));
        assert_eq!(Keyword::Void.native_type(), Some("void"));
        assert_eq!(Keyword::Methods.native_type(), None);
    }
}
