//! Analysis pipeline: prompt, completion, split, decode.
//!
//! One analysis is one completion call. Parse problems in the reply never
//! fail the analysis; they are carried on the result as warnings. Only the
//! provider call and the image payload can fail.

use super::client::{ChatCompletion, CompletionRequest};
use super::payload::ImagePayload;
use super::prompts::{build_enhanced_prompt, AnalysisTypeConfig, MAX_TOKENS, TEMPERATURE, USER_INSTRUCTION};
use super::provider::Provider;
use crate::config::Settings;
use crate::error::AnalysisError;
use crate::response::{self, AnalysisResult, CoordinatePolicy, TokenUsage};
use futures::future::join_all;

/// Turn a raw completion into an `AnalysisResult` stamped with the current
/// time. Duration is left at zero for the caller to fill in.
pub fn process_response(
    analysis_type_id: &str,
    provider: Provider,
    model: &str,
    raw: &str,
    usage: TokenUsage,
    policy: CoordinatePolicy,
) -> AnalysisResult {
    let split = response::split(raw);
    let decoded = response::decode_with_policy(split.annotations_json.as_deref(), policy);

    if !decoded.is_clean() {
        log::warn!(
            "[PIPELINE] '{}': {} warnings, {} annotations kept",
            analysis_type_id,
            decoded.warnings.len(),
            decoded.annotations.len()
        );
    }

    AnalysisResult {
        analysis_type_id: analysis_type_id.to_string(),
        provider,
        model: model.to_string(),
        content: split.textual,
        annotations: decoded.annotations,
        warnings: decoded.warnings,
        usage,
        duration_ms: 0,
        timestamp: chrono::Utc::now(),
    }
}

pub fn build_request(analysis: &AnalysisTypeConfig, image: &ImagePayload, provider: Provider) -> CompletionRequest {
    CompletionRequest {
        provider,
        model: provider.model().to_string(),
        system_prompt: build_enhanced_prompt(analysis),
        user_instruction: USER_INSTRUCTION.to_string(),
        image: image.clone(),
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

/// Run one analysis type against a prepared image.
pub async fn run_analysis<C>(
    client: &C,
    analysis: &AnalysisTypeConfig,
    image: &ImagePayload,
    provider: Provider,
    settings: &Settings,
) -> Result<AnalysisResult, AnalysisError>
where
    C: ChatCompletion + ?Sized,
{
    let request = build_request(analysis, image, provider);
    let model = request.model.clone();

    log::info!("[PIPELINE] '{}' via {} ({})", analysis.id, provider, model);
    let start = std::time::Instant::now();

    let response = client.complete(request).await.map_err(|e| {
        log::error!("[PIPELINE] '{}' failed: {}", analysis.id, e);
        e
    })?;

    let duration_ms = start.elapsed().as_millis() as u64;
    log::info!(
        "[PIPELINE] '{}' completed in {}ms ({} chars, {} tokens)",
        analysis.id,
        duration_ms,
        response.text.len(),
        response.usage.total_tokens
    );

    let mut result = process_response(
        &analysis.id,
        provider,
        &model,
        &response.text,
        response.usage,
        settings.coordinate_policy,
    );
    result.duration_ms = duration_ms;
    Ok(result)
}

/// Run several analysis types concurrently. Results come back in the order
/// of `analyses`, each independently successful or not, so feeding them to
/// the overlay in order assigns colors in request order.
pub async fn run_analyses<C>(
    client: &C,
    analyses: &[AnalysisTypeConfig],
    image: &ImagePayload,
    provider: Provider,
    settings: &Settings,
) -> Vec<Result<AnalysisResult, AnalysisError>>
where
    C: ChatCompletion + ?Sized,
{
    log::info!("[PIPELINE] Running {} analyses", analyses.len());
    join_all(
        analyses
            .iter()
            .map(|analysis| run_analysis(client, analysis, image, provider, settings)),
    )
    .await
}

/// Validate raw screenshot bytes, then run every analysis with the
/// configured provider. A bad image fails before any call is made.
pub async fn analyze_image<C>(
    client: &C,
    analyses: &[AnalysisTypeConfig],
    bytes: &[u8],
    mime_type: &str,
    settings: &Settings,
) -> Result<Vec<Result<AnalysisResult, AnalysisError>>, AnalysisError>
where
    C: ChatCompletion + ?Sized,
{
    let image = ImagePayload::prepare(bytes, mime_type, settings.max_image_bytes)?;
    Ok(run_analyses(client, analyses, &image, settings.provider, settings).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseWarning;

    const RAW: &str = "1. Header\n- Role : banner\n---ANNOTATIONS---\n\
{\"annotations\":[{\"id\":\"zone_1\",\"type\":\"issue\",\"title\":\"Header\",\
\"description\":\"Role : banner\",\"x\":10,\"y\":20,\"width\":30,\"height\":15}]}";

    #[test]
    fn process_response_splits_and_decodes() {
        let usage = TokenUsage {
            input_tokens: 3,
            output_tokens: 4,
            total_tokens: 7,
        };
        let result = process_response("nav", Provider::OpenAi, "gpt-4o", RAW, usage, CoordinatePolicy::Clamp);
        assert_eq!(result.content, "1. Header\n- Role : banner");
        assert_eq!(result.annotations.len(), 1);
        assert_eq!(result.annotations[0].x, 10.0);
        assert!(result.warnings.is_empty());
        assert_eq!(result.usage, usage);
    }

    #[test]
    fn unparseable_reply_still_yields_a_result() {
        let raw = "1. Header\n---ANNOTATIONS---\n{ broken";
        let result = process_response(
            "nav",
            Provider::Anthropic,
            "claude",
            raw,
            TokenUsage::default(),
            CoordinatePolicy::Clamp,
        );
        assert_eq!(result.content, "1. Header");
        assert!(result.annotations.is_empty());
        assert!(matches!(result.warnings.as_slice(), [ParseWarning::InvalidJson(_)]));
    }

    #[test]
    fn request_carries_prompt_and_limits() {
        let analysis = AnalysisTypeConfig::new("nav", "Navigation", "Audit navigation.");
        let image = ImagePayload {
            mime_type: "image/png",
            data_base64: "AAAA".into(),
            size_bytes: 3,
            width: 1,
            height: 1,
        };
        let request = build_request(&analysis, &image, Provider::Anthropic);
        assert_eq!(request.model, "claude-3-5-sonnet-latest");
        assert!(request.system_prompt.starts_with("Audit navigation."));
        assert_eq!(request.max_tokens, 4000);
        assert_eq!(request.user_instruction, USER_INSTRUCTION);
    }
}
