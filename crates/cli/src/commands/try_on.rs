//! Virtual try-on command.

use std::path::PathBuf;

use verse_storefront::error::AppError;
use verse_storefront::tryon::{CUSTOM_GARMENT_DESCRIPTION, Media, TryOnImage, TryOnRequest};

use super::{Context, find_product};

/// Arguments for `verse try-on`.
pub struct TryOnInput {
    pub person: PathBuf,
    pub garment: Option<PathBuf>,
    pub product: Option<String>,
    pub description: Option<String>,
    pub video: bool,
    pub out: PathBuf,
}

/// `verse try-on`
pub async fn run(ctx: &Context, input: TryOnInput) -> Result<(), AppError> {
    let client = ctx.try_on()?;
    let person_image = TryOnImage::from_path(&input.person).await?;

    let (garment_image, default_description) = match (&input.garment, &input.product) {
        (Some(path), _) => (
            TryOnImage::from_path(path).await?,
            CUSTOM_GARMENT_DESCRIPTION.to_string(),
        ),
        (None, Some(handle)) => {
            let product = find_product(&ctx.catalog()?, handle).await?;
            (client.garment_from_product(&product).await?, product.title)
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "either --garment or --product is required".to_string(),
            ));
        }
    };

    println!("Generating try-on, this can take a minute...");
    let result = client
        .try_on(TryOnRequest {
            person_image,
            garment_image,
            description: input.description.unwrap_or(default_description),
            generate_video: input.video,
        })
        .await?;

    tokio::fs::create_dir_all(&input.out)
        .await
        .map_err(verse_storefront::tryon::TryOnError::from)?;
    let image_path = write_media(&input.out, "tryon", &result.image).await?;
    println!("Image saved to {}", image_path.display());
    if let Some(video) = &result.video {
        let video_path = write_media(&input.out, "tryon", video).await?;
        println!("Video saved to {}", video_path.display());
    }
    Ok(())
}

async fn write_media(dir: &std::path::Path, stem: &str, media: &Media) -> Result<PathBuf, AppError> {
    let path = dir.join(format!("{stem}.{}", media.extension()));
    tokio::fs::write(&path, &media.bytes)
        .await
        .map_err(verse_storefront::tryon::TryOnError::from)?;
    Ok(path)
}
