//! Entry point for generating the Swift and Kotlin bindings for `vouch`.

fn main() {
    uniffi::uniffi_bindgen_main();
}
