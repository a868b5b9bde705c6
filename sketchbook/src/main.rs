fn main() {
    if let Err(e) = sketchbook::run_cli() {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}
