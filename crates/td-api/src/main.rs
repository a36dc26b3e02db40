#[tokio::main]
async fn main() {
    if let Err(err) = td_api::run().await {
        eprintln!("td-api failed to start: {err}");
        std::process::exit(1);
    }
}
