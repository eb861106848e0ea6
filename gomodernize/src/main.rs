//! Main binary entry point for gomodernize.
//!
//! This binary delegates to the shared `entry_point::run_with_args()` function
//! so it behaves exactly like the `gomodernize` binary of the CLI crate.

use anyhow::Result;

fn main() -> Result<()> {
    let code = gomodernize::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
