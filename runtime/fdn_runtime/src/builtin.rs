//! Builtin type codes.

/// The fixed set of builtin concrete types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BuiltinCode {
    /// Undefined.
    Null = 0,
    Boolean = 1,
    Number = 2,
    String = 3,
    Name = 4,
    /// Binary data.
    Data = 5,
    /// Caseless string-keyed map.
    Array = 6,
    /// Ordered set of indices.
    Set = 7,
    /// String list.
    List = 8,
    /// Generic list of values.
    ProperList = 9,
    Any = 10,
}

impl BuiltinCode {
    /// Every code, in index order.
    pub const ALL: [BuiltinCode; 11] = [
        BuiltinCode::Null,
        BuiltinCode::Boolean,
        BuiltinCode::Number,
        BuiltinCode::String,
        BuiltinCode::Name,
        BuiltinCode::Data,
        BuiltinCode::Array,
        BuiltinCode::Set,
        BuiltinCode::List,
        BuiltinCode::ProperList,
        BuiltinCode::Any,
    ];

    /// Number of builtin codes.
    pub const COUNT: usize = Self::ALL.len();

    /// Lowercase code name, used when describing a bare builtin node.
    pub const fn name(self) -> &'static str {
        match self {
            BuiltinCode::Null => "undefined",
            BuiltinCode::Boolean => "boolean",
            BuiltinCode::Number => "number",
            BuiltinCode::String => "string",
            BuiltinCode::Name => "name",
            BuiltinCode::Data => "data",
            BuiltinCode::Array => "array",
            BuiltinCode::Set => "set",
            BuiltinCode::List => "list",
            BuiltinCode::ProperList => "properlist",
            BuiltinCode::Any => "any",
        }
    }

    /// Name of the registered Named type bound to this code.
    pub const fn qualified_name(self) -> &'static str {
        match self {
            BuiltinCode::Null => "builtin.Null",
            BuiltinCode::Boolean => "builtin.Boolean",
            BuiltinCode::Number => "builtin.Number",
            BuiltinCode::String => "builtin.String",
            BuiltinCode::Name => "builtin.Name",
            BuiltinCode::Data => "builtin.Data",
            BuiltinCode::Array => "builtin.Array",
            BuiltinCode::Set => "builtin.Set",
            BuiltinCode::List => "builtin.List",
            BuiltinCode::ProperList => "builtin.ProperList",
            BuiltinCode::Any => "builtin.Any",
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}
