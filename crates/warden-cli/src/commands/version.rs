//! Version command.

pub fn run() {
    println!("warden {}", env!("CARGO_PKG_VERSION"));
}
