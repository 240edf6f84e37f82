use salon_scheduler_api::Application;
use salon_scheduler_infra::{setup_context, Config, SalonContext};
use salon_scheduler_sdk::SalonSDK;

pub struct TestApp {
    pub config: Config,
    /// Shares the repos with the running application, used to seed entities
    pub ctx: SalonContext,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, SalonSDK, String) {
    let mut ctx = setup_context().await;
    ctx.config.port = 0; // Random port
    ctx.config.disable_job_schedulers = true;

    let config = ctx.config.clone();
    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { config, ctx };
    let sdk = SalonSDK::new(address.clone());
    (app, sdk, address)
}
