use clap::Parser;
use logistics_semaphore::cli::Args;
use logistics_semaphore::commands;
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        // Ctrl-C only cancels the token; the running command decides how to wind down
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install Ctrl-C handler: {}", e);
                std::future::pending::<()>().await;
            }
            cancellation_token.cancel();
        };

        let command = commands::run(args, cancellation_token.clone());
        tokio::pin!(command);

        tokio::select! {
            result = &mut command => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived Ctrl-C, shutting down...");
                command.await
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
