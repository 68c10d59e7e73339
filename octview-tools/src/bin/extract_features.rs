//! Extract structured clinical features from free-text rationale via an LLM
//!
//! For every sampled record with a rationale, asks an OpenAI-compatible
//! chat-completions endpoint to emit `{"features": [{id, label,
//! description}]}` and writes the collected results as
//! `extracted_features.json`, keyed by the record id the web app joins on.
//! Per-record failures are logged and skipped, never fatal.

use anyhow::{Context, Result};
use clap::Parser;
use octview_tools::{extract_json_object, read_records};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "extract-features", about = "Extract clinical features from rationale text")]
struct Args {
    /// Sampled dataset JSON (from sample-dataset)
    #[arg(long)]
    input: PathBuf,

    /// Output path for the extracted feature records
    #[arg(long, default_value = "extracted_features.json")]
    output: PathBuf,

    /// Chat-completions endpoint
    #[arg(long, default_value = "https://api.openai.com/v1/chat/completions")]
    endpoint: String,

    /// Model name
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout_seconds: u64,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

fn build_prompt(input_text: &str) -> String {
    format!(
        r#"Extract medical findings from this text.

Output format (copy exactly):
{{
  "features": [
    {{"id": "f1", "label": "RPE elevation", "description": "shallow dome-shaped elevation of the RPE"}},
    {{"id": "f2", "label": "subretinal fluid", "description": "small overlying hyporeflective space"}}
  ]
}}
Text: {}

Copy the JSON format above and replace with actual findings.
"#,
        input_text
    )
}

async fn query_llm(client: &reqwest::Client, args: &Args, input_text: &str) -> Result<String> {
    let request = ChatRequest {
        model: args.model.clone(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: "You are an ophthalmology medical data extractor. \
                          Output only the requested format."
                    .to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: build_prompt(input_text),
            },
        ],
        temperature: 0.0,
        max_tokens: 500,
    };

    let response: ChatResponse = client
        .post(&args.endpoint)
        .bearer_auth(&args.api_key)
        .json(&request)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("Failed to decode chat response")?;

    let content = response
        .choices
        .first()
        .map(|c| c.message.content.trim().to_string())
        .unwrap_or_default();
    if content.is_empty() {
        anyhow::bail!("empty completion");
    }
    Ok(content)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_seconds))
        .build()?;

    let records = read_records(&args.input)?;
    info!("Extracting features for {} records", records.len());

    let mut results: Vec<Value> = Vec::new();
    let mut skipped = 0usize;

    for record in &records {
        let id = record.get("id").and_then(|v| v.as_i64());
        let rationale = record
            .get("rationale_o4_hf")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        let (Some(id), false) = (id, rationale.is_empty()) else {
            warn!("Skipping record without id or rationale: {:?}", id);
            skipped += 1;
            continue;
        };

        let reply = match query_llm(&client, &args, rationale).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Record {}: LLM call failed: {}", id, e);
                skipped += 1;
                continue;
            }
        };

        let Some(extracted) = extract_json_object(&reply) else {
            warn!("Record {}: no JSON object in reply", id);
            skipped += 1;
            continue;
        };

        let features: Value = serde_json::from_str(&extracted)?;
        if features.get("features").and_then(|f| f.as_array()).is_none() {
            warn!("Record {}: reply JSON has no features array", id);
            skipped += 1;
            continue;
        }

        info!(
            "Record {}: extracted {} features",
            id,
            features["features"].as_array().map(|a| a.len()).unwrap_or(0)
        );
        results.push(json!({
            "id": id,
            "original_text": rationale,
            "extracted_features": features,
        }));
    }

    let content = serde_json::to_string_pretty(&results)?;
    std::fs::write(&args.output, content)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(
        "Wrote {} feature records to {} ({} skipped)",
        results.len(),
        args.output.display(),
        skipped
    );

    Ok(())
}
