fn main() {
    // toml-cfg reads cfg.toml at compile time
    println!("cargo:rerun-if-changed=cfg.toml");
}
