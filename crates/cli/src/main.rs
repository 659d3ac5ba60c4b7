fn main() -> Result<(), Box<dyn std::error::Error>> {
    annoscan_cli::run()
}
