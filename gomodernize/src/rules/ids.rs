//! Centralized Rule IDs for gomodernize.

/// Modernize: `HasPrefix`/`TrimPrefix` pairs replaceable by `CutPrefix`
pub const RULE_ID_CUTPREFIX: &str = "GMZ-M001";
