// Checks on the non-library entry points: the build script, the host binary
// and the wasm start function.
const BUILD_SCRIPT: &str = include_str!("../build.rs");
const HOST_MAIN: &str = include_str!("../src/main.rs");
const LIB: &str = include_str!("../src/lib.rs");

// The build script runs inside every cargo build, including the one wasm-pack
// starts; spawning wasm-pack from it would wait on cargo's own build lock.
#[test]
fn build_script_does_not_spawn_wasm_pack() {
    assert!(!BUILD_SCRIPT.contains("Command::new"));
    assert!(!BUILD_SCRIPT.contains("std::process"));
}

#[test]
fn build_script_copies_static_into_dist() {
    assert!(BUILD_SCRIPT.contains("Path::new(\"static\")"));
    assert!(BUILD_SCRIPT.contains("Path::new(\"dist\")"));
}

// cargo only sets TARGET for build scripts.
#[test]
fn host_binary_does_not_read_build_script_env() {
    assert!(!HOST_MAIN.contains("\"TARGET\""));
    assert!(HOST_MAIN.contains("\"wasm-pack\""));
}

#[test]
fn wasm_start_installs_panic_hook_before_logging() {
    let hook = LIB.find("console_error_panic_hook::set_once()").expect("panic hook");
    let logging = LIB.find("telemetry::init").expect("telemetry init");
    assert!(hook < logging);
}
