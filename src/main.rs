use std::time::Duration;

use charagen::{
    build_prompt, logger, prompt_subject, save_artifacts, AspectRatio, CharacterInput,
    CharacterSlot, Config, GenerationClient, GenerationRequest, HttpFetcher, IllustrationForm,
    JsonPointerParser, DEFAULT_COLLECTION_NAME, DEFAULT_IMAGE_COUNT,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();
    let mut logger_config = logger::LoggerConfig::development();
    if let Some(level) = config.log_level {
        logger_config = logger_config.with_level(level);
    }
    logger::init_with_config(logger_config)?;

    if env_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }
    logger::log_config_info(&config);

    let mut builder = GenerationClient::builder(config.generation.clone());
    if let Some(pointer) = &config.images_pointer {
        builder = builder.with_parser(JsonPointerParser::new(pointer.clone()));
    }
    let client = match builder.build() {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Failed to set up the generation client: {}", e);
            return Err(e.into());
        }
    };
    log::info!("📣 {}", client.mode().status_message());

    let form = IllustrationForm::new(
        "two knights duel at sunset in a misty forest",
        AspectRatio::Wide,
    )
    .with_character(
        CharacterSlot::First,
        CharacterInput::with_pose_text("holds a sword overhead"),
    )
    .with_character(
        CharacterSlot::Second,
        CharacterInput::with_pose_text("raises a large shield"),
    );

    let fields = match form.prompt_fields() {
        Ok(fields) => fields,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e.into());
        }
    };
    let prompt = build_prompt(&fields);
    log::info!("📝 Prompt built:\n{}", prompt);

    let request = GenerationRequest::with_ratio(
        prompt.clone(),
        DEFAULT_IMAGE_COUNT,
        fields.aspect_ratio,
        DEFAULT_COLLECTION_NAME,
    )?;
    log::info!(
        "🎨 Generating {} image(s) / {} for: {}",
        request.image_count(),
        request.aspect_ratio(),
        prompt_subject(&prompt).unwrap_or("(no subject)")
    );

    let result = client.generate(&request).await;
    if !result.is_success() {
        let message = result.message().unwrap_or("generation failed").to_string();
        log::error!("❌ {}", message);
        return Err(message.into());
    }

    for artifact in result.artifacts() {
        match artifact.url() {
            Some(url) => log::info!("🖼️  {} -> {}", artifact.suggested_file_name, url),
            None => log::info!("🖼️  {} (inline image data)", artifact.suggested_file_name),
        }
    }

    if let Some(dir) = &config.output_dir {
        let fetcher = HttpFetcher::new(
            Duration::from_secs(60),
            config.generation.use_system_proxy,
        )?;
        let paths = save_artifacts(dir, result.artifacts(), &fetcher).await?;
        log::info!("💾 Saved {} file(s)", paths.len());
    }

    Ok(())
}
