//! Commands module - implementations behind the CLI.

mod fix;
mod init;

pub use fix::{apply_fixes, fix_until_stable, run_fix, select_fixes, FileFix, FixReport};
pub use init::{run_init, run_init_in};
