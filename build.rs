fn main() {
    // The compiled-in default product UID is read with `option_env!` in
    // `config.rs`; rebuild when it changes.
    println!("cargo:rerun-if-env-changed=PRODUCT_UID");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
