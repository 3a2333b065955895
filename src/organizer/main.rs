mod cli;

use log::error;

fn main() {
    if let Err(e) = cli::run() {
        if !e.is_user_error() {
            error!("event=cli_failed error={:?}", e);
        }
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
