fn main() {
    if let Err(e) = gremlab_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
