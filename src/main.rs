#[tokio::main]
async fn main() {
    connect_backend::run().await;
}
