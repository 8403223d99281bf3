// ABOUTME: Entry point for the SwiftDash command-line dashboard
// ABOUTME: Calls the library run function

use std::process::ExitCode;

fn main() -> ExitCode {
    swiftdash_lib::run()
}
