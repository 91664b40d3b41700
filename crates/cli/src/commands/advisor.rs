//! Size, style, tracking and chat commands.

use verse_storefront::advisor::{
    BodyType, FitPreference, ProductContext, SizeProfile, SizeQuery, TrackingResult,
};
use verse_storefront::error::AppError;

use super::{Context, find_product};

/// Measurements given on the command line.
pub struct SizeInput {
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub body_type: Option<BodyType>,
    pub fit: Option<FitPreference>,
}

impl SizeInput {
    /// Fill gaps from the saved profile.
    fn resolve(self, saved: Option<SizeQuery>) -> Result<SizeQuery, AppError> {
        let height = self
            .height
            .or_else(|| saved.map(|q| q.height_cm))
            .ok_or_else(|| AppError::BadRequest("--height is required".to_string()))?;
        let weight = self
            .weight
            .or_else(|| saved.map(|q| q.weight_kg))
            .ok_or_else(|| AppError::BadRequest("--weight is required".to_string()))?;
        Ok(SizeQuery {
            height_cm: height,
            weight_kg: weight,
            body_type: self
                .body_type
                .or_else(|| saved.map(|q| q.body_type))
                .unwrap_or_default(),
            fit_preference: self
                .fit
                .or_else(|| saved.map(|q| q.fit_preference))
                .unwrap_or_default(),
        })
    }
}

/// `verse size`
pub async fn size(ctx: &Context, input: SizeInput) -> Result<(), AppError> {
    let profiles = ctx.size_profiles()?;
    let saved = profiles.load().map(|profile| profile.query());
    let query = input.resolve(saved)?;

    let recommendation = ctx.advisor()?.size_recommendation(&query).await?;

    println!("Recommended size: {}", recommendation.size);
    if !recommendation.alternatives.is_empty() {
        println!("Also consider:    {}", recommendation.alternatives.join(", "));
    }
    println!("Confidence:       {:.0}%", recommendation.confidence * 100.0);
    if let Some(bmi) = recommendation.bmi {
        println!("BMI:              {bmi:.1}");
    }
    println!();
    println!("{}", recommendation.reasoning);

    // Not fatal: only the next prefill is lost
    if let Err(e) = profiles.save(&SizeProfile::new(&query, &recommendation)) {
        tracing::warn!(error = %e, "Failed to save size profile");
    }
    Ok(())
}

/// `verse size --forget`
pub fn forget_size(ctx: &Context) -> Result<(), AppError> {
    ctx.size_profiles()?.clear()?;
    println!("Size profile cleared.");
    Ok(())
}

/// `verse style <question>`
pub async fn style(ctx: &Context, question: &str, handle: Option<&str>) -> Result<(), AppError> {
    let context = match handle {
        Some(handle) => {
            let product = find_product(&ctx.catalog()?, handle).await?;
            Some(ProductContext {
                title: Some(product.title),
                ..ProductContext::default()
            })
        }
        None => None,
    };

    let advice = ctx.advisor()?.style_advice(question, context.as_ref()).await?;
    println!("{advice}");
    Ok(())
}

/// `verse track`
pub async fn track(ctx: &Context, order_id: &str, phone: &str) -> Result<(), AppError> {
    match ctx.advisor()?.track_order(order_id, phone).await? {
        TrackingResult::Found(order) => {
            println!("Order {}: {}", order.order_id, order.status);
            if let Some(eta) = &order.estimated_delivery {
                println!("Estimated delivery: {eta}");
            }
            for event in &order.timeline {
                println!("  {:<12} {:<24} {}", event.date, event.status, event.location);
            }
            if let Some(update) = &order.natural_language_update {
                println!();
                println!("{update}");
            }
        }
        TrackingResult::NotFound {
            message,
            suggestion,
        } => {
            println!("{message}");
            if let Some(suggestion) = suggestion {
                println!("{suggestion}");
            }
        }
    }
    Ok(())
}

/// `verse chat <prompt>`
pub async fn chat(ctx: &Context, prompt: &str) -> Result<(), AppError> {
    let cart = ctx.cart()?.load();
    let context = serde_json::json!({
        "cartItems": cart.item_count(),
        "cartTotal": cart.total().to_string(),
    });
    let reply = ctx.advisor()?.chat(prompt, Some(&context)).await?;
    println!("{}", reply.response);
    Ok(())
}
