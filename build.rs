fn main() {
    // Board builds pick up the ESP-IDF environment; host builds have nothing to do.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
