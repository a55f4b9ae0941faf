fn main() {
    if !(cfg!(target_os = "linux") && cfg!(target_arch = "x86_64")) {
        panic!(
            "{} only traces linux/x86-64 processes",
            env!("CARGO_PKG_NAME")
        );
    }
}
