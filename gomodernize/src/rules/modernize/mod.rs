use crate::config::Config;
use crate::rules::Rule;

mod cutprefix;
mod fresh_name;

pub use fresh_name::fresh_name;

/// Category of the `CutPrefix` modernization.
pub const CAT_CUTPREFIX: &str = "stringscutprefix";

/// Returns the modernization rules enabled by `config`.
#[must_use]
pub fn get_modernize_rules(config: &Config) -> Vec<Box<dyn Rule>> {
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(cutprefix::CutPrefixRule)];
    rules
        .into_iter()
        .filter(|rule| !config.gomodernize.ignores(rule.code()))
        .collect()
}
