// gsunit command-line entry point.
// Usage: gsunit [--color auto|always|never] <selftest|compare|check> ...

fn main() {
    gsunit::cli::run();
}
