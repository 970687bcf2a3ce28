use anyhow::Result;
use roomcraft_core::collaborator::{DimensionEstimator, check_estimate};
use roomcraft_core::config::DesignConfig;
use roomcraft_infrastructure::OpenAiDimensionEstimator;

pub async fn run(config: &DesignConfig, product_type: &str, subtype: &str, room_area: f64) -> Result<()> {
    let estimator = OpenAiDimensionEstimator::try_from_env(&config.estimator)?;
    let estimate = estimator.estimate(product_type, subtype, room_area).await?;
    let dims = check_estimate(estimate, &config.estimate_bounds)?;

    println!(
        "{subtype}: {:.1} x {:.1} x {:.1} ft, {:.1} sqft",
        dims.width, dims.depth, dims.height, dims.area
    );
    if room_area > 0.0 {
        println!("Takes {:.1}% of the floor", dims.area / room_area * 100.0);
    }
    Ok(())
}
