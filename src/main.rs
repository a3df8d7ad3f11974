#[tokio::main]
async fn main() {
    if let Err(err) = druginfo_mcp::mcp::server::run_stdio().await {
        eprintln!("druginfo-mcp: {}", err);
        std::process::exit(1);
    }
}
