fn main() {
    if let Err(e) = trading_calendar_lib::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
