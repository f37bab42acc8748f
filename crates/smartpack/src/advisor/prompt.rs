use super::ProductBrief;
use crate::reports::ReportBrief;

pub(super) const SYSTEM_PROMPT: &str = "You are a packaging engineer who helps small e-commerce \
businesses cut packaging cost, material waste, and shipping emissions. Answer only with JSON \
matching the supplied schema.";

const SAMPLE_LIMIT: usize = 5;

pub(super) fn optimization_prompt(products: &[ProductBrief]) -> Result<String, serde_json::Error> {
    let catalog = serde_json::to_string_pretty(products)?;

    Ok(format!(
        "Review the packaging of these products and recommend improvements.

Products:
{catalog}

For every product assess:
- volume utilisation and void space of the current box
- the smallest box that still protects the product
- lower-impact material substitutes
- the cost effect of those changes
- waste and CO2 reduction
- how much the available data supports the recommendation

Keep estimates realistic:
- dimension reductions between 5% and 25%
- cost savings between 10% and 40%
- waste reduction between 15% and 50%
- confidenceScore between 70 and 95, lower when data is missing

Set status to \"optimized\" when savings exceed 15%, \"warning\" for 5-15% savings or data \
concerns, and \"optimal\" below 5%. Use the product id as productId and explain each \
recommendation in reasoning."
    ))
}

pub(super) fn report_prompt(brief: &ReportBrief) -> Result<String, serde_json::Error> {
    let products = serde_json::to_string_pretty(
        &brief.products.iter().take(SAMPLE_LIMIT).collect::<Vec<_>>(),
    )?;
    let optimizations = serde_json::to_string_pretty(
        &brief.optimizations.iter().take(SAMPLE_LIMIT).collect::<Vec<_>>(),
    )?;
    let sections = if brief.requested_sections.is_empty() {
        "All sections".to_string()
    } else {
        brief.requested_sections.join(", ")
    };
    let date_range = brief.date_range.as_deref().unwrap_or("all time");
    let metrics = &brief.metrics;

    Ok(format!(
        "Write a {report_type} packaging optimization report for {company}.

Data summary:
- Total products: {total_products}
- Total cost savings: ${savings:.2}
- Average waste reduction: {waste:.1}%
- Total CO2 reduction: {co2:.1} kg

Sample products:
{products}

Sample optimizations:
{optimizations}

Requested sections: {sections}
Date range: {date_range}

Include an executive summary of the key results, an analysis of the optimization outcomes, \
the environmental impact, a cost-benefit view, strategic recommendations, and industry \
benchmarks where they help. Quote the numbers above rather than inventing new ones.",
        report_type = brief.report_type,
        company = brief.company_name,
        total_products = metrics.total_products,
        savings = metrics.total_savings,
        waste = metrics.avg_waste_reduction,
        co2 = metrics.total_co2_reduction,
    ))
}
