#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lesson_schedule_api::run().await
}
