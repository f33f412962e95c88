use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    larder_cli::run().await
}
