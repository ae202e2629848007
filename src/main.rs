#[cfg(any(target_arch = "wasm32", test))]
mod config;
#[cfg(any(target_arch = "wasm32", test))]
mod controller;
#[cfg(any(target_arch = "wasm32", test))]
mod logging;
#[cfg(any(target_arch = "wasm32", test))]
mod observer;
#[cfg(any(target_arch = "wasm32", test))]
mod runtime;
#[cfg(any(target_arch = "wasm32", test))]
mod scheduler;
#[cfg(any(target_arch = "wasm32", test))]
mod surface;
#[cfg(any(target_arch = "wasm32", test))]
mod throttle;
#[cfg(any(target_arch = "wasm32", test))]
mod tracker;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod frontend;
#[cfg(test)]
mod testing;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This project is frontend-only. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
