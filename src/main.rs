// src/main.rs

use cibatch::{cli, exec, logging};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("cibatch error: {err:?}");
        std::process::exit(exec::INTERNAL_ERROR_EXIT_CODE);
    }

    match cibatch::run(args).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("cibatch error: {err:?}");
            std::process::exit(exec::INTERNAL_ERROR_EXIT_CODE);
        }
    }
}
