use blog_platform::server::{self, Service};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run(Service::Blog).await
}
