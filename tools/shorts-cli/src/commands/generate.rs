//! Submit a composition and fetch the generated video.

use shorts_common::config::AppConfig;
use shorts_submission::{GenerationController, HttpRenderService};

use super::InputArgs;

pub async fn run(input: InputArgs, config: &AppConfig, download: bool) -> anyhow::Result<()> {
    let (composition, settings) = input.load(config)?;
    let service = HttpRenderService::new(&config.service)?;

    println!(
        "Submitting {} image(s) to {}",
        composition.len(),
        service.endpoint()
    );

    let mut controller = GenerationController::new(service);
    let notice = controller
        .submit(&composition, &settings)
        .await
        .map_err(|refused| anyhow::anyhow!("{refused}"))?;
    println!("{notice}");

    if notice.is_error() {
        if let Some(detail) = controller.session().error_message() {
            tracing::debug!(detail, "Generation failed");
        }
        anyhow::bail!("Video generation failed");
    }

    let action = match controller.retrieve_artifact() {
        Ok(action) => action,
        Err(notice) => anyhow::bail!("{notice}"),
    };
    println!("  Video URL: {}", action.url);

    if download {
        let path = controller
            .service()
            .fetch_artifact(&action, &config.download_dir)
            .await?;
        println!("  Saved to: {}", path.display());
    }

    Ok(())
}
