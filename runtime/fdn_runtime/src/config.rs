//! Registry configuration.

/// Calling convention requested for a handler's call layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Abi {
    /// The platform's default C convention.
    #[default]
    Default,
    Cdecl,
    Stdcall,
    Fastcall,
    Win64,
    SysV,
}

impl Abi {
    pub const fn name(self) -> &'static str {
        match self {
            Abi::Default => "default",
            Abi::Cdecl => "cdecl",
            Abi::Stdcall => "stdcall",
            Abi::Fastcall => "fastcall",
            Abi::Win64 => "win64",
            Abi::SysV => "sysv",
        }
    }
}

/// Tunables for a [`TypeRegistry`](crate::TypeRegistry).
///
/// ```text
/// let config = RegistryConfig::default()
///     .with_max_resolve_depth(64)
///     .with_default_abi(Abi::SysV);
/// let registry = TypeRegistry::with_config(config);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Longest chain of alias, named, optional or base-type links followed
    /// before giving up with `RecursionLimit`.
    pub max_resolve_depth: usize,
    /// Convention used by `call_layout_default`.
    pub default_abi: Abi,
}

impl RegistryConfig {
    /// Default resolution depth.
    pub const DEFAULT_MAX_RESOLVE_DEPTH: usize = 256;

    #[must_use]
    pub fn with_max_resolve_depth(mut self, depth: usize) -> Self {
        self.max_resolve_depth = depth;
        self
    }

    #[must_use]
    pub fn with_default_abi(mut self, abi: Abi) -> Self {
        self.default_abi = abi;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            max_resolve_depth: Self::DEFAULT_MAX_RESOLVE_DEPTH,
            default_abi: Abi::Default,
        }
    }
}
